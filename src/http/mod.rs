//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, request span)
//!     → admin routes (/api/admin/*) or status routes (/api/health, /api/info)
//!     → JSON response, errors mapped by GatewayError
//! ```

pub mod request;
pub mod server;
pub mod status;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
