// HealthPressure Data
// This crate owns the persisted people and readings tables

// Database connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
