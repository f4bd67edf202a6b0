use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{
    middleware::{from_fn, Logger},
    web, App, HttpServer,
};
use std::net::TcpListener;
use std::sync::Arc;

use crate::configuration::Settings;
use crate::error::{AppError, DatabaseError, ValidationError};
use crate::middleware::{count_fileserver_hit, log_request, FileserverHits};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, health_check, list_chirps, login, metrics,
    refresh, reset, revoke, update_user,
};
use crate::store::Store;

pub fn run(
    listener: TcpListener,
    store: Arc<dyn Store>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let store: web::Data<dyn Store> = web::Data::from(store);
    let jwt_config = web::Data::new(settings.jwt.clone());
    let app_config = web::Data::new(settings.application.clone());
    let hits_data = web::Data::new(FileserverHits::new());
    let static_dir = settings.application.static_dir.clone();

    let server = HttpServer::new(move || {
        // Malformed JSON bodies get the same error envelope as everything else
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            tracing::warn!(error = %err, "Rejected request body");
            AppError::Validation(ValidationError::InvalidFormat("request body".to_string())).into()
        });
        // Chirp ids are the only path parameters; one that is not a UUID names no chirp
        let path_config = web::PathConfig::default().error_handler(|err, req| {
            tracing::debug!(error = %err, path = %req.path(), "Rejected path parameter");
            AppError::Database(DatabaseError::NotFound("chirp".to_string())).into()
        });

        App::new()
            // Global middleware
            .wrap(Logger::default())
            .wrap(from_fn(log_request))

            // Shared state
            .app_data(json_config)
            .app_data(path_config)
            .app_data(store.clone())
            .app_data(jwt_config.clone())
            .app_data(app_config.clone())
            .app_data(hits_data.clone())

            .route("/api/healthz", web::get().to(health_check))

            // Accounts and sessions
            .route("/api/users", web::post().to(create_user))
            .route("/api/users", web::put().to(update_user))
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))

            // Chirps
            .route("/api/chirps", web::get().to(list_chirps))
            .route("/api/chirps", web::post().to(create_chirp))
            .route("/api/chirps/{chirp_id}", web::get().to(get_chirp))
            .route("/api/chirps/{chirp_id}", web::delete().to(delete_chirp))

            // Admin
            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            // Static file serving, counted
            .service(
                web::scope("/app")
                    .wrap(from_fn(count_fileserver_hit))
                    .service(fs::Files::new("", &static_dir).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
