//! HTTP API for blockscope scans.
//!
//! Routes:
//!   POST /api/v1/scan                 - scan inline source (JSON) or an uploaded file (multipart)
//!   GET  /api/v1/scans                - list stored scans
//!   GET  /api/v1/scans/{id}           - one stored scan
//!   GET  /api/v1/scans/{id}/findings  - findings of one stored scan
//!   GET  /health                      - liveness

pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

pub use handlers::AppState;
pub use routes::create_router;
pub use store::{InMemoryScanStore, ScanStore, StoredFinding, StoredScan};
