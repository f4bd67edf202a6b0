use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web, Error,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of requests served by the static file server
#[derive(Debug, Default)]
pub struct FileserverHits {
    hits: AtomicU64,
}

impl FileserverHits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

/// Counts every request that reaches the static file server.
///
/// The counter is read from app data, so it is shared with `/admin/metrics`.
pub async fn count_fileserver_hit(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    match req.app_data::<web::Data<FileserverHits>>() {
        Some(hits) => hits.increment(),
        None => tracing::warn!("File server hit counter is not registered"),
    }

    next.call(req).await
}
