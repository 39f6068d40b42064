use handscope_engine::AnalysisConfig;
use std::convert::Infallible;
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;
use warp::filters::BoxedFilter;
use warp::multipart::FormData;
use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

use crate::handlers::{self, Endpoint};
use crate::middleware::with_request_logging;
use crate::staging::UploadStager;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    upload_dir: PathBuf,
    max_upload_bytes: u64,
    analysis: AnalysisConfig,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            upload_dir: upload_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            analysis: AnalysisConfig::default(),
        }
    }

    pub fn for_tests() -> Self {
        let dir = std::env::temp_dir().join("handscope_web_uploads");
        Self::new("127.0.0.1", 0, dir)
    }

    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn with_max_upload_bytes(mut self, bytes: u64) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    pub fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }
}

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    analysis: Arc<AnalysisConfig>,
    stager: Arc<UploadStager>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        if !config.upload_dir().exists() {
            fs::create_dir_all(config.upload_dir())
                .map_err(|err| ServerError::ConfigError(err.to_string()))?;
        }

        let analysis = Arc::new(config.analysis().clone());
        let stager = Arc::new(UploadStager::new(config.upload_dir()));
        Ok(Self {
            config,
            analysis,
            stager,
        })
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests()).expect("test context")
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn analysis(&self) -> Arc<AnalysisConfig> {
        Arc::clone(&self.analysis)
    }

    pub fn stager(&self) -> Arc<UploadStager> {
        Arc::clone(&self.stager)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let bind_addr = Self::bind_addr(context.config())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(Self::routes(&context))
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        info!(%addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    /// Every route with CORS open to any origin and request logging.
    pub fn routes(
        context: &AppContext,
    ) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
        let cors = warp::cors()
            .allow_any_origin()
            .allow_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_headers(vec!["content-type"]);

        let routes = Self::index_route()
            .or(Self::health_route())
            .unify()
            .or(Self::analysis_route(context, Endpoint::OpenRaise))
            .unify()
            .or(Self::analysis_route(context, Endpoint::Shove))
            .unify()
            .with(cors);

        with_request_logging(routes)
    }

    fn index_route() -> BoxedFilter<(Response,)> {
        warp::path::end()
            .and(warp::get())
            .map(|| handlers::index().into_response())
            .boxed()
    }

    fn health_route() -> BoxedFilter<(Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    fn analysis_route(context: &AppContext, endpoint: Endpoint) -> BoxedFilter<(Response,)> {
        let max_bytes = context.config().max_upload_bytes();

        // A request that is not multipart at all is answered like one without a
        // file. warp checks `max_length` against Content-Length, so a chunked
        // multipart upload is refused with 411.
        let form = Self::multipart_body(true)
            .and(warp::multipart::form().max_length(max_bytes))
            .map(Some)
            .or(Self::multipart_body(false).map(|| None::<FormData>))
            .unify();

        warp::path(endpoint.path())
            .and(warp::path::end())
            .and(warp::post())
            .and(form)
            .and(Self::with_context(context.clone()))
            .and_then(
                move |form: Option<FormData>, context: AppContext| async move {
                    let response = handlers::analyze(context, endpoint, form).await;
                    Ok::<_, Infallible>(response)
                },
            )
            .boxed()
    }

    /// Passes only when the request is (or, with `expected == false`, is not)
    /// `multipart/form-data`.
    fn multipart_body(expected: bool) -> impl Filter<Extract = (), Error = Rejection> + Clone {
        warp::header::optional::<String>("content-type")
            .and_then(move |content_type: Option<String>| async move {
                let multipart = content_type
                    .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"));
                if multipart == expected {
                    Ok(())
                } else {
                    Err(warp::reject::not_found())
                }
            })
            .untuple_one()
    }

    fn with_context(
        context: AppContext,
    ) -> impl Filter<Extract = (AppContext,), Error = Infallible> + Clone {
        warp::any().map(move || context.clone())
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
