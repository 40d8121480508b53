// Domain entities and value objects
pub mod classification;
pub mod history;
pub mod statistics;

// Re-export common types for easier imports
pub use classification::{BloodPressureCategory, BmiCategory, UnknownCategory, FALLBACK_COLOR};
pub use history::WeekGroup;
pub use statistics::Statistics;

// Storage models are returned unchanged by the domain layer
pub use health_pressure_data::models::{NewPerson, NewReading, Person, Reading};
