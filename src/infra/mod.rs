//! Infrastructure adapters and runtime bootstrap.

pub mod billing;
pub mod cms;
pub mod error;
pub mod http;
pub mod session;
pub mod telemetry;
