use std::future::Future;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use log::{error, info};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub mod docs;
pub mod flag;
pub mod middleware;
pub mod routes;
pub mod store;

use crate::middleware::AccessLogLayer;
use crate::store::{FlagStore, MemoryStore};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Flag not found: {0}")]
    NotFound(String),

    #[error("Flag already exists: {0}")]
    Conflict(String),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct FlagServer {
    bind_address: String,
    port: u16,
    enable_cors: bool,
    enable_access_log: bool,
    store: Arc<dyn FlagStore>,
}

impl FlagServer {
    pub fn builder() -> FlagServerBuilder {
        FlagServerBuilder::new()
    }

    pub fn debug_info(&self) -> String {
        format!(
            "FlagServer {{ address: {}, cors: {}, access_log: {} }}",
            self.address(),
            self.enable_cors,
            self.enable_access_log
        )
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// The store shared by every handler of this server.
    pub fn store(&self) -> Arc<dyn FlagStore> {
        self.store.clone()
    }

    /// Router for the configured port.
    pub fn router(&self) -> Router {
        self.router_for(self.port)
    }

    fn router_for(&self, port: u16) -> Router {
        use crate::routes::{create_flag, delete_flag, get_flag, list_flags, update_flag};

        let mut router = Router::new()
            .route("/flags", get(list_flags).post(create_flag))
            .route(
                "/flags/:name",
                get(get_flag).put(update_flag).delete(delete_flag),
            )
            .with_state(self.store.clone())
            .merge(docs::router(&local_url(port)));

        if self.enable_access_log {
            router = router.layer(AccessLogLayer::new());
        }

        if self.enable_cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }

    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = self.address();
        TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `signal` resolves.
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let port = listener.local_addr()?.port();
        let app = self.router_for(port);

        info!("Feature flag service running at {}/", local_url(port));
        info!("API docs available at {}{}", local_url(port), docs::DOCS_PATH);

        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await?;

        info!("Feature flag service stopped");
        Ok(())
    }
}

pub struct FlagServerBuilder {
    bind_address: String,
    port: u16,
    enable_cors: bool,
    enable_access_log: bool,
    store: Option<Arc<dyn FlagStore>>,
}

impl FlagServerBuilder {
    fn new() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            enable_cors: true,
            enable_access_log: true,
            store: None,
        }
    }

    pub fn with_bind_address(mut self, bind_address: &str) -> Self {
        self.bind_address = bind_address.to_string();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.enable_cors = enabled;
        self
    }

    pub fn with_access_log(mut self, enabled: bool) -> Self {
        self.enable_access_log = enabled;
        self
    }

    /// Use `store` instead of a fresh seeded [`MemoryStore`].
    pub fn with_store(mut self, store: Arc<dyn FlagStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> FlagServer {
        FlagServer {
            bind_address: self.bind_address,
            port: self.port,
            enable_cors: self.enable_cors,
            enable_access_log: self.enable_access_log,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryStore::seeded())),
        }
    }
}

fn local_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
