//! Storage backends for the fuel log collection

pub mod json_file_storage;
pub mod memory_storage;

pub use json_file_storage::JsonFileStorage;
pub use memory_storage::MemoryStorage;
