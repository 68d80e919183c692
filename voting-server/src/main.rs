use dotenvy::dotenv;
use env_logger::Env;
use log::error;
use std::{process, sync::Arc};
use voting_server::{
    config::Config,
    http::{self, AppState},
    identity::grpc_identity::GrpcIdentity,
    session_store::redis_store::RedisStore,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().unwrap_or_else(|error| {
        error!("Invalid configuration: {error}");
        process::exit(1);
    });

    let identity = GrpcIdentity::connect_lazy(&config.identity_url).unwrap_or_else(|error| {
        error!("Invalid identity service endpoint {}: {error}", config.identity_url);
        process::exit(1);
    });

    let store = match RedisStore::connect(&config.redis_url).await {
        Ok(store) => store,
        Err(error) => {
            error!("Error connecting to Redis: {error}");
            process::exit(1);
        }
    };

    let state = AppState::new(
        Arc::new(identity),
        Arc::new(store),
        config.auth_timeout,
        config.subscriber_queue,
    );

    if let Err(error) = http::listen(config.http_address, http::router(state)).await {
        error!("Could not bind HTTP server: {error}");
        process::exit(1);
    }
}
