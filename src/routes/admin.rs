use actix_web::{web, HttpResponse};

use crate::configuration::ApplicationSettings;
use crate::error::{AppError, AuthError};
use crate::middleware::FileserverHits;
use crate::store::Store;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<FileserverHits>) -> HttpResponse {
    let body = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>
"#,
        hits.get()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /admin/reset
///
/// Deletes every user (and with them all chirps and refresh tokens) and resets
/// the hit counter. Only available when the platform is `dev`.
pub async fn reset(
    app_config: web::Data<ApplicationSettings>,
    store: web::Data<dyn Store>,
    hits: web::Data<FileserverHits>,
) -> Result<HttpResponse, AppError> {
    if !app_config.is_dev() {
        tracing::warn!(platform = %app_config.platform, "Reset attempted outside dev platform");
        return Err(AuthError::Forbidden("This operation is forbidden".to_string()).into());
    }

    let deleted = store.delete_all_users().await?;
    hits.reset();

    tracing::info!(deleted_users = deleted, "Database reset");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("OK"))
}
