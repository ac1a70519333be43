//! studio-core: Shared infrastructure for the studio workspace.
pub mod error;
pub mod middleware;
pub mod observability;
pub mod retry;

pub use error::AppError;
