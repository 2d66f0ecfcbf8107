use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::server::conn::Http;
use hyper::Body;
use routerify::{RequestServiceBuilder, Router};
use serde_json::json;
use tokio::net::TcpSocket;
use tokio::select;

use self::error::ApiError;
use crate::global::GlobalState;

pub mod auth;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod request_context;
pub mod v1;

pub fn routes(global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    let weak = Arc::downgrade(global);
    Router::builder()
        .data(weak)
        // Our error handler
        .err_handler_with_info(common::http::error_handler::<ApiError>)
        // The CORS middleware adds the CORS headers to the response
        .middleware(middleware::cors::cors_middleware(global))
        // The auth middleware checks the Authorization (or token) header, and if it's valid, it adds the user
        // to the request context. Requests without a token pass through as anonymous, a token that does not
        // verify is rejected with a 401.
        .middleware(middleware::auth::auth_middleware(global))
        .scope("/v1", v1::routes(global))
        .any(|_| async move {
            Ok(make_response!(
                hyper::StatusCode::NOT_FOUND,
                json!({
                    "message": "not found",
                    "success": false,
                })
            ))
        })
        .build()
        .expect("failed to build router")
}

pub async fn run(global: Arc<GlobalState>) -> anyhow::Result<()> {
    let config = &global.config.api;

    tracing::info!("Listening on {}", config.bind_address);
    let socket = if config.bind_address.is_ipv6() {
        TcpSocket::new_v6()?
    } else {
        TcpSocket::new_v4()?
    };

    socket.set_reuseaddr(true)?;
    socket.bind(config.bind_address)?;
    let listener = socket.listen(1024)?;

    // The router only holds a Weak reference to the global state, a keep-alive
    // connection must not keep it alive once we start shutting down.
    let request_service =
        RequestServiceBuilder::new(routes(&global)).expect("failed to build request service");

    loop {
        select! {
            _ = global.ctx.done() => {
                return Ok(());
            },
            r = listener.accept() => {
                let (socket, addr) = r?;

                let service = request_service.build(addr);

                tracing::debug!("Accepted connection from {}", addr);

                tokio::spawn(async move {
                    Http::new().serve_connection(socket, service).await.ok();
                });
            },
        }
    }
}
