// HealthPressure Domain
// Classification rules and statistics built on top of the record store

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Re-export the data layer for convenience
pub use health_pressure_data::{database, models, repository};
