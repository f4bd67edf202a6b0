/// Chirp Routes
///
/// Creating, listing, reading and deleting chirps. Writes require an access
/// token; reads are public.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::store::Store;
use crate::validators::validate_chirp_body;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

/// POST /api/chirps
///
/// # Errors
/// - 400: Chirp longer than 140 characters
/// - 401: Missing or invalid access token
pub async fn create_chirp(
    user: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let body = validate_chirp_body(&form.body)?;

    let chirp = store.create_chirp(user.user_id, &body).await?;

    tracing::info!(chirp_id = %chirp.id, user_id = %user.user_id, "Chirp created");
    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps
pub async fn list_chirps(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let chirps = store.list_chirps().await?;
    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
///
/// # Errors
/// - 404: No such chirp
pub async fn get_chirp(
    path: web::Path<Uuid>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();

    let chirp = store
        .find_chirp(chirp_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("chirp".to_string()))?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{chirp_id}
///
/// Only the author may delete a chirp.
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 403: Caller is not the author
/// - 404: No such chirp
pub async fn delete_chirp(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();

    let chirp = store
        .find_chirp(chirp_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("chirp".to_string()))?;

    if chirp.user_id != user.user_id {
        tracing::warn!(chirp_id = %chirp_id, user_id = %user.user_id, "Chirp does not belong to caller");
        return Err(AuthError::Forbidden("You can only delete your own chirps".to_string()).into());
    }

    if !store.delete_chirp(chirp_id).await? {
        // Deleted concurrently
        return Err(DatabaseError::NotFound("chirp".to_string()).into());
    }

    tracing::info!(chirp_id = %chirp_id, user_id = %user.user_id, "Chirp deleted");
    Ok(HttpResponse::NoContent().finish())
}
