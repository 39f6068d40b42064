use std::time::Instant;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::reply::{Reply, Response};
use warp::Filter;

#[derive(Debug, Clone)]
struct RequestStart {
    path: String,
    method: String,
    at: Instant,
}

/// Logs every matched request on arrival and its status on completion
pub fn with_request_logging<F, T>(
    filter: F,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone
where
    F: Filter<Extract = (T,), Error = Rejection> + Clone + Send + Sync + 'static,
    T: Reply,
{
    warp::any()
        .and(warp::path::full())
        .and(warp::method())
        .map(|path: warp::path::FullPath, method: warp::http::Method| {
            tracing::info!(
                path = %path.as_str(),
                method = %method,
                "incoming request"
            );
            RequestStart {
                path: path.as_str().to_string(),
                method: method.to_string(),
                at: Instant::now(),
            }
        })
        .and(filter)
        .map(|start: RequestStart, reply: T| {
            let response = reply.into_response();
            let duration_ms = start.at.elapsed().as_millis();
            tracing::info!(duration_ms = duration_ms, "request completed");
            log_response(response.status(), &start.path, &start.method, duration_ms);
            response
        })
}

/// Log response with status code
pub fn log_response(status: StatusCode, path: &str, method: &str, duration_ms: u128) {
    if status.is_client_error() {
        tracing::warn!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "client error"
        );
    } else if status.is_server_error() {
        tracing::error!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "server error"
        );
    } else {
        tracing::info!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "response sent"
        );
    }
}
