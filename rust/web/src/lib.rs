//! HTTP boundary of the hand-history analyzer.
//!
//! Accepts a multipart upload (`file`, `params`, `player_name`), stages the
//! transcript, runs the engine once per request and answers with one
//! frequency record per parameter set.

pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod params;
pub mod server;
pub mod staging;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse, UploadError};
pub use handlers::Endpoint;
pub use logging::{init_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use middleware::{log_response, with_request_logging};
pub use params::{AnalysisRequest, FrequencyRecord, FrequencyResponse, ParameterGroup, ParameterSet};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use staging::UploadStager;
