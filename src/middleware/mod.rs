/// Middleware module
///
/// Request logging and file-server hit counting, both as `from_fn` middleware.

mod metrics;
mod request_logger;

pub use metrics::{count_fileserver_hit, FileserverHits};
pub use request_logger::log_request;
