// Repository module structure
pub mod errors;
pub mod week;
mod health_records;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use health_records::{HealthRecordRepositoryTrait, HealthRecordStore};
pub use week::{current_week_bounds, week_bounds, week_start};

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use health_records::tests;
