//! Route handlers for the REST API
//!
//! - `export`: archive export and liveness message
//! - `system`: health and OpenAPI

mod export;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use export::*;
pub use system::*;
