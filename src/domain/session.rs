//! Per-request identity and entitlement snapshot.
//!
//! The session is a closed sum type produced once per request by a
//! [`SessionResolver`](crate::application::repos::SessionResolver); every
//! downstream decision switches on this type, never on provider-specific
//! payload shapes. A subscription marker can only exist on an authenticated
//! session, so the invariant holds by construction.

/// Identity and entitlement of one inbound request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Anonymous,
    Authenticated(Identity),
}

/// The signed-in visitor as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    /// Non-empty marker of a paid, active subscription.
    pub subscription: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(identity) => Some(identity),
        }
    }

    /// The active subscription marker, if the visitor has one.
    pub fn subscription(&self) -> Option<&str> {
        self.identity()
            .and_then(|identity| identity.subscription.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(subscription: Option<&str>) -> Identity {
        Identity {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            subscription: subscription.map(str::to_string),
        }
    }

    #[test]
    fn anonymous_session_has_no_entitlements() {
        let session = Session::Anonymous;
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
        assert!(session.subscription().is_none());
    }

    #[test]
    fn authenticated_session_without_subscription() {
        let session = Session::Authenticated(identity(None));
        assert!(session.is_authenticated());
        assert!(session.subscription().is_none());
    }

    #[test]
    fn subscription_implies_authentication() {
        let session = Session::Authenticated(identity(Some("fake-active-subscription")));
        assert!(session.is_authenticated());
        assert_eq!(session.subscription(), Some("fake-active-subscription"));
    }
}
