//! Request routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → target.rs (read `?url=`, validate, resolve port)
//!     → TargetUrl handed to the outbound request builder
//! ```
//!
//! # Design Decisions
//! - The destination comes from the request itself, not from a route table
//! - The inbound path is ignored; only the query names the target

pub mod target;

pub use target::{Scheme, TargetUrl, TARGET_PARAM};
