// Storage models for the two persisted tables
pub mod person;
pub mod reading;

pub use person::{NewPerson, Person};
pub use reading::{NewReading, Reading};
