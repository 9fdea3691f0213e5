pub mod config;
pub mod error;
pub mod obfuscate_errors;
pub mod panic_handler;
pub mod routes;
pub mod service;
pub mod shared_state;
pub mod tracing_config;

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{routing::IntoMakeService, Router};
use hyper::server::conn::AddrIncoming;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::{event, Level};

use track_store_db::DieselProjectStore;

pub use error::Error;

use crate::{
    obfuscate_errors::ObfuscateErrorLayer,
    service::ProjectService,
    shared_state::{AppState, InnerState},
};

pub struct Server {
    pub host: String,
    pub port: u16,
    pub server: axum::Server<AddrIncoming, IntoMakeService<Router>>,
}

pub fn build_app(state: AppState) -> Router {
    let production = state.production;

    routes::configure_routes(Router::new())
        .with_state(state)
        .layer(
            // Global middlewares
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(move |err| {
                    panic_handler::handle_panic(production, err)
                }))
                .layer(ObfuscateErrorLayer::new(production))
                .compression()
                .decompression()
                .set_x_request_id(MakeRequestUuid)
                .propagate_x_request_id()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO)),
                )
                .into_inner(),
        )
}

pub async fn run_server(config: config::Config) -> Result<Server, anyhow::Error> {
    let db = track_store_db::connect(config.database_url.as_str(), 32)?;

    let production = config.env != "development" && !cfg!(debug_assertions);

    let store = Arc::new(DieselProjectStore::new(db));
    let state = Arc::new(InnerState {
        production,
        service: ProjectService::new(store),
    });

    let app = build_app(state);

    let bind_ip: IpAddr = config.host.parse()?;
    let addr = SocketAddr::from((bind_ip, config.port));
    let builder = axum::Server::bind(&addr);
    event!(Level::INFO, "Listening on {}:{}", config.host, config.port);

    let server = builder.serve(app.into_make_service());

    Ok(Server {
        host: config.host,
        port: addr.port(),
        server,
    })
}
