//! Proxy reload subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/admin/reload
//!     → command.rs (spawn configured program, bounded wait)
//!     → exit status 0 → success
//!     → anything else → ReloadFailed / ReloadTimeout / Io
//! ```
//!
//! # Design Decisions
//! - No retries; the caller decides
//! - Reloads never overlap
//! - Timed-out children are killed, not abandoned

pub mod command;

pub use command::{ReloadCommand, ReloadOutcome};
