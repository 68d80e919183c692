use crate::{
    authorization_gateway::AuthorizationGateway,
    broadcast_hub::BroadcastHub,
    identity::IdentityService,
    session_service::SessionService,
    session_store::{SessionStore, key_value_store::KeyValueStore},
};
use axum::{
    Router,
    http::{HeaderMap, Method, header},
    routing::{get, post},
};
use hyper::{Request, body::Incoming};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server,
};
use log::{error, info};
use std::{io, net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_service::Service;

mod login;
mod logout;
mod register;
mod sessions;
mod ws;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub gateway: Arc<AuthorizationGateway>,
    pub hub: Arc<BroadcastHub>,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        durable: Arc<dyn KeyValueStore>,
        auth_timeout: Duration,
        subscriber_queue: usize,
    ) -> Self {
        let gateway = Arc::new(AuthorizationGateway::new(identity, auth_timeout));
        let store = Arc::new(SessionStore::new(durable));
        let hub = Arc::new(BroadcastHub::new(subscriber_queue));
        let sessions = Arc::new(SessionService::new(gateway.clone(), store, hub.clone()));

        AppState {
            sessions,
            gateway,
            hub,
        }
    }
}

/// Raw `Authorization` header, if present and valid text.
pub(crate) fn credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/login", post(login::login))
        .route("/register", post(register::register))
        .route("/logout", post(logout::logout))
        .route(
            "/sessions",
            get(sessions::list_sessions)
                .post(sessions::create_session)
                .patch(sessions::cast_vote),
        )
        .route(
            "/sessions/{id}",
            get(sessions::get_session).patch(sessions::cast_vote_on),
        )
        .route("/ws", get(ws::subscribe))
        .layer(cors)
        .with_state(state)
}

/// Serves `app` with hyper so WebSocket upgrades go through the same
/// connection builder as plain requests.
pub async fn listen(address: SocketAddr, app: Router) -> io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("HTTP server listening on {address}");

    loop {
        let (socket, _remote_addr) = match listener.accept().await {
            Ok(listener) => listener,
            Err(error) => {
                error!("Could not get socket from accepted HTTP connection: {error}");
                continue;
            }
        };

        let tower_service = app.clone();
        tokio::spawn(async move {
            let socket = TokioIo::new(socket);
            let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                tower_service.clone().call(request)
            });

            let builder = server::conn::auto::Builder::new(TokioExecutor::new());
            if let Err(err) = builder
                .serve_connection_with_upgrades(socket, hyper_service)
                .await
            {
                error!("Failed to serve connection: {err:#}");
            }
        });
    }
}
