use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    Error,
};
use log::{info, warn};
use std::time::Instant;

/// Logs one line per request with its status and latency.
///
/// The `Authorization` header is never logged; only whether it was present.
pub async fn log_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let start_time = Instant::now();
    let method = req.method().to_string();
    let path = req.path().to_string();
    let has_credentials = req.headers().contains_key(AUTHORIZATION);

    let res = next.call(req).await?;
    let status = res.status();
    let line = summary(&method, &path, status, has_credentials, start_time.elapsed().as_millis());

    if status.is_server_error() {
        warn!("{}", line);
    } else {
        info!("{}", line);
    }

    Ok(res)
}

fn summary(method: &str, path: &str, status: StatusCode, has_credentials: bool, millis: u128) -> String {
    format!(
        "{} {} -> {} ({}ms, credentials: {})",
        method,
        path,
        status.as_u16(),
        millis,
        if has_credentials { "yes" } else { "no" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_reports_credential_presence_only() {
        let line = summary("POST", "/api/refresh", StatusCode::UNAUTHORIZED, true, 3);
        assert_eq!(line, "POST /api/refresh -> 401 (3ms, credentials: yes)");
    }
}
