use std::{process, sync::Arc};

use tokio::net::TcpListener;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use url::Url;
use varco::{
    application::{
        error::AppError,
        gate::GateService,
        repos::{CheckoutGateway, ContentRepo, SessionResolver},
    },
    config,
    infra::{
        billing::CheckoutClient,
        cms::CmsContentRepo,
        error::InfraError,
        http::{self, HttpState},
        session::ProviderSessionResolver,
        telemetry,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    run_serve(settings).await
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let provider_url = require_url(
        settings.session.provider_url.clone(),
        "session provider url is not configured",
    )?;
    let sign_in_url = require_url(
        settings.session.sign_in_url.clone(),
        "session sign-in url is not configured",
    )?;
    let api_url = require_url(
        settings.content.api_url.clone(),
        "content store api url is not configured",
    )?;
    let checkout_url = require_url(
        settings.billing.checkout_url.clone(),
        "billing checkout url is not configured",
    )?;

    let client = reqwest::Client::builder()
        .build()
        .map_err(|err| AppError::unexpected(format!("failed to build http client: {err}")))?;

    let sessions: Arc<dyn SessionResolver> =
        Arc::new(ProviderSessionResolver::new(client.clone(), provider_url));
    let content: Arc<dyn ContentRepo> = Arc::new(CmsContentRepo::new(
        client.clone(),
        api_url,
        settings.content.access_token.clone(),
    ));
    let billing: Arc<dyn CheckoutGateway> = Arc::new(CheckoutClient::new(client, checkout_url));

    let state = HttpState {
        gate: Arc::new(GateService::new(content)),
        sessions,
        billing,
        sign_in_url,
        session_cookie: settings.session.cookie_name.clone(),
    };

    let router = http::build_router(state);

    let listener = TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "varco::serve",
        addr = %settings.server.public_addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

fn require_url(value: Option<Url>, missing: &'static str) -> Result<Url, AppError> {
    value
        .ok_or_else(|| InfraError::configuration(missing))
        .map_err(AppError::from)
}
