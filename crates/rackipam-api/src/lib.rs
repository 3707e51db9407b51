pub mod rest;
pub mod security;

use axum::{middleware, Router};
use rackipam_core::db::Db;
use rackipam_provision::ProvisioningService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    listen_addr: SocketAddr,
    service: Arc<ProvisioningService<Db>>,
    api_key: Option<String>,
    instance_id: String,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub service: Arc<ProvisioningService<Db>>,
    pub api_key: Option<Arc<String>>,
    pub instance_id: String,
}

impl AppState {
    pub fn new(service: Arc<ProvisioningService<Db>>, api_key: Option<String>) -> Self {
        Self {
            db: service.store().clone(),
            service,
            api_key: api_key.map(Arc::new),
            instance_id: String::new(),
        }
    }
}

/// Full application router: REST routes under `/api/v1`, API key check and
/// request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", rest::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security::api_key_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl ApiServer {
    pub fn new(
        listen_addr: SocketAddr,
        service: Arc<ProvisioningService<Db>>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            listen_addr,
            service,
            api_key,
            instance_id: String::new(),
        }
    }

    pub fn with_instance_id(mut self, id: &str) -> Self {
        self.instance_id = id.to_string();
        self
    }

    pub async fn run(self, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let mut state = AppState::new(self.service, self.api_key);
        state.instance_id = self.instance_id;

        let listener = tokio::net::TcpListener::bind(self.listen_addr).await?;
        info!("REST API listening on {}", self.listen_addr);

        let mut shutdown = shutdown;
        axum::serve(listener, app(state))
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
            })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rackipam_core::config::ProvisioningConfig;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    pub struct TestApp {
        pub router: Router,
        pub state: AppState,
        _dir: TempDir,
    }

    impl TestApp {
        pub fn new(api_key: Option<&str>) -> Self {
            let dir = TempDir::new().unwrap();
            let db = Db::open(&dir.path().join("test.redb")).unwrap();
            let service = Arc::new(ProvisioningService::new(db, ProvisioningConfig::default()));
            let mut state = AppState::new(service, api_key.map(str::to_string));
            state.instance_id = "test-ipam".to_string();
            Self {
                router: app(state.clone()),
                state,
                _dir: dir,
            }
        }

        pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let builder = Request::builder().method(method).uri(uri);
            let request = match body {
                Some(json) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(json.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            self.dispatch(request).await
        }

        pub async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            (status, value)
        }
    }
}
