// Service exports
pub mod backend;
pub mod cache;
pub mod session;

pub use backend::{BackendClient, BackendError, HappeningSource};
pub use cache::{SearchCache, CacheKey, CacheStats};
pub use session::Session;
