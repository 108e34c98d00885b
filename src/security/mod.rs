//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → headers.rs (strip hop-by-hop before forwarding)
//!
//! Outbound response:
//!     → headers.rs (CORS block, overlaid by target headers)
//! ```
//!
//! # Design Decisions
//! - Permissive CORS: every response advertises `Access-Control-Allow-Origin: *`
//! - No caller authentication and no origin allow-list

pub mod headers;
