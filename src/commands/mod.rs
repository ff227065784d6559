pub mod detail;
pub mod serve;
pub mod sync;

// Re-export command functions for convenience
pub use detail::detail;
pub use serve::{serve, ServeParams};
pub use sync::sync_once;
