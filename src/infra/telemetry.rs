use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "varco_gate_full_render_total",
            Unit::Count,
            "Full posts rendered for subscribed sessions."
        );
        describe_counter!(
            "varco_gate_preview_redirect_total",
            Unit::Count,
            "Full-post requests redirected to the preview route."
        );
        describe_counter!(
            "varco_gate_preview_upgrade_total",
            Unit::Count,
            "Preview pages delivered with a client navigation to the full post."
        );
        describe_counter!(
            "varco_subscribe_sign_in_total",
            Unit::Count,
            "Subscribe actions handed off to the identity provider."
        );
        describe_counter!(
            "varco_subscribe_checkout_total",
            Unit::Count,
            "Subscribe actions that started a checkout."
        );
        describe_counter!(
            "varco_subscribe_repeat_total",
            Unit::Count,
            "Subscribe actions from sessions that already had a subscription."
        );
    });
}
