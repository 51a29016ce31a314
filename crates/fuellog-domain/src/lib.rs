//! Domain services and repository traits for fuel logging

pub mod repository;
pub mod service;

pub use repository::LogStorage;
