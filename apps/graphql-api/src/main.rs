use std::sync::Arc;

use anyhow::Result;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::State,
    response::{self, IntoResponse},
    routing::get,
};
use resolver::{AppSchema, build_schema};
use schematic::{Config, ConfigLoader, validate::not_empty};
use serde::Serialize;
use service::Service;
use tokio::net::TcpListener;
use track_api::{Url, get_base_http_client};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod models;
mod resolver;
mod service;

#[derive(Serialize, Config)]
#[config(env)]
struct AppConfig {
    #[setting(
        validate = not_empty,
        env = "TRACK_API_BASE_URL",
        default = "https://odyssey-lift-off-rest-api.herokuapp.com/"
    )]
    track_api_base_url: String,
    #[setting(env = "PORT", default = 4000)]
    port: u16,
}

#[derive(Clone)]
struct AppState {
    schema: AppSchema,
    service: Arc<Service>,
}

async fn graphiql() -> impl IntoResponse {
    response::Html(GraphiQLSource::build().endpoint("/").finish())
}

async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state
        .service
        .execute(&state.schema, req.into_inner())
        .await
        .into()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,track_api=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    let config = ConfigLoader::<AppConfig>::new().load()?.config;
    tracing::info!("Configuration loaded successfully");

    let base_url = Url::parse(&config.track_api_base_url)?;
    tracing::info!("Using track service at {}", base_url);

    tracing::debug!("Initializing service");
    let client = get_base_http_client(None)?;
    let service = Arc::new(Service::new(client, base_url).await);

    tracing::debug!("Building GraphQL schema");
    let schema = build_schema(service.clone());

    if args.get(1).is_some_and(|arg| arg == "schema") {
        tracing::info!("Schema argument detected, printing SDL and exiting");
        println!("{}", schema.sdl());
        return Ok(());
    }

    tracing::debug!("Creating API router");
    let app = Router::new()
        .route("/", get(graphiql).post(graphql_handler))
        .with_state(AppState { schema, service });
    tracing::debug!("Router setup complete");

    tracing::debug!("Binding TCP listener");
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let server_result = axum::serve(listener, app).await;

    match &server_result {
        Ok(_) => tracing::info!("Server shutdown gracefully"),
        Err(e) => tracing::error!("Server error: {}", e),
    }

    server_result.map_err(Into::into)
}
