pub mod handlers;
pub mod router;
pub mod services;

// Re-export all services for external use
pub use services::*;
