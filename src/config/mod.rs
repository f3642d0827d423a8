//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use clap::{Args, Parser, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "varco";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PUBLIC_PORT: u16 = 3000;
const DEFAULT_SESSION_COOKIE: &str = "varco.session-token";

/// Command-line arguments for the varco binary.
#[derive(Debug, Parser)]
#[command(name = "varco", version, about = "varco gated-content server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "VARCO_CONFIG_FILE", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the public listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the public listener port.
    #[arg(long = "server-public-port", value_name = "PORT")]
    pub public_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the identity provider base URL.
    #[arg(long = "session-provider-url", value_name = "URL")]
    pub session_provider_url: Option<String>,

    /// Override the identity provider sign-in URL.
    #[arg(long = "session-sign-in-url", value_name = "URL")]
    pub session_sign_in_url: Option<String>,

    /// Override the session cookie name.
    #[arg(long = "session-cookie-name", value_name = "NAME")]
    pub session_cookie_name: Option<String>,

    /// Override the content store API base URL.
    #[arg(long = "content-api-url", value_name = "URL")]
    pub content_api_url: Option<String>,

    /// Override the content store access token.
    #[arg(long = "content-access-token", value_name = "TOKEN")]
    pub content_access_token: Option<String>,

    /// Override the billing checkout endpoint URL.
    #[arg(long = "billing-checkout-url", value_name = "URL")]
    pub billing_checkout_url: Option<String>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub session: SessionSettings,
    pub content: ContentSettings,
    pub billing: BillingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub public_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub provider_url: Option<Url>,
    pub sign_in_url: Option<Url>,
    pub cookie_name: String,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub api_url: Option<Url>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BillingSettings {
    pub checkout_url: Option<Url>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse the command line and load settings with the configured precedence.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("VARCO").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_serve_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    session: RawSessionSettings,
    content: RawContentSettings,
    billing: RawBillingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    public_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSessionSettings {
    provider_url: Option<String>,
    sign_in_url: Option<String>,
    cookie_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    api_url: Option<String>,
    access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBillingSettings {
    checkout_url: Option<String>,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.public_port {
            self.server.public_port = Some(port);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.session_provider_url.as_ref() {
            self.session.provider_url = Some(url.clone());
        }
        if let Some(url) = overrides.session_sign_in_url.as_ref() {
            self.session.sign_in_url = Some(url.clone());
        }
        if let Some(name) = overrides.session_cookie_name.as_ref() {
            self.session.cookie_name = Some(name.clone());
        }
        if let Some(url) = overrides.content_api_url.as_ref() {
            self.content.api_url = Some(url.clone());
        }
        if let Some(token) = overrides.content_access_token.as_ref() {
            self.content.access_token = Some(token.clone());
        }
        if let Some(url) = overrides.billing_checkout_url.as_ref() {
            self.billing.checkout_url = Some(url.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            session,
            content,
            billing,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let session = build_session_settings(session)?;
        let content = build_content_settings(content)?;
        let billing = build_billing_settings(billing)?;

        Ok(Self {
            server,
            logging,
            session,
            content,
            billing,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let public_port = server.public_port.unwrap_or(DEFAULT_PUBLIC_PORT);
    if public_port == 0 {
        return Err(LoadError::invalid(
            "server.public_port",
            "port must be greater than zero",
        ));
    }

    let public_addr = parse_socket_addr(&host, public_port)
        .map_err(|reason| LoadError::invalid("server.public_addr", reason))?;

    Ok(ServerSettings { public_addr })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_session_settings(session: RawSessionSettings) -> Result<SessionSettings, LoadError> {
    let provider_url = parse_optional_url(session.provider_url, "session.provider_url")?;
    let sign_in_url = parse_optional_url(session.sign_in_url, "session.sign_in_url")?;

    let cookie_name = session
        .cookie_name
        .and_then(non_empty)
        .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());

    Ok(SessionSettings {
        provider_url,
        sign_in_url,
        cookie_name,
    })
}

fn build_content_settings(content: RawContentSettings) -> Result<ContentSettings, LoadError> {
    let api_url = parse_optional_url(content.api_url, "content.api_url")?;
    let access_token = content.access_token.and_then(non_empty);

    Ok(ContentSettings {
        api_url,
        access_token,
    })
}

fn build_billing_settings(billing: RawBillingSettings) -> Result<BillingSettings, LoadError> {
    let checkout_url = parse_optional_url(billing.checkout_url, "billing.checkout_url")?;
    Ok(BillingSettings { checkout_url })
}

fn parse_optional_url(value: Option<String>, key: &'static str) -> Result<Option<Url>, LoadError> {
    value
        .and_then(non_empty)
        .map(|raw| Url::parse(&raw).map_err(|err| LoadError::invalid(key, err.to_string())))
        .transpose()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    format!("{host}:{port}")
        .parse()
        .map_err(|err| format!("failed to parse `{host}:{port}`: {err}"))
}
