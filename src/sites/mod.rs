//! Config file gateway.
//!
//! # Data Flow
//! ```text
//! logical name ("locations/static.conf")
//!     → name.rs (textual validation, no filesystem access)
//!     → store.rs (resolve under root, containment check, whole-file I/O)
//! ```
//!
//! # Design Decisions
//! - `..` is rejected textually before anything else
//! - Resolved paths must stay under the canonical root (symlink escapes)
//! - Optional per-name write lock; otherwise last writer wins

pub mod name;
pub mod store;

pub use name::{SiteLayout, SiteName};
pub use store::{SiteFile, SiteStore};
