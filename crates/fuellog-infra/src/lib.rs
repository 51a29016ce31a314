//! Infrastructure layer - CSV interchange, storage backends, weather lookup

pub mod csv_codec;
pub mod persistence;
pub mod transfer;
pub mod weather;

pub use csv_codec::{parse_csv, parse_csv_at, to_csv, DecodeReport};
pub use persistence::{JsonFileStorage, MemoryStorage};
