//! geosync-rs
//! ==========
//!
//! Workspace umbrella crate. Re-exports [`geosync_core`] so the demos under
//! `demos/` can be run from the repository root:
//!
//! ```text
//! cargo run --example country_allow_list -- DE,CH,AT
//! ```
pub use geosync_core::*;
