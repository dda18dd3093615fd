//! I/O module
//!
//! Handles the CSV files that hold facility state between runs.
//!
//! # Components
//!
//! - `csv_format` - Record layouts and conversion to and from domain types
//! - `record_reader` - CSV reader with an iterator interface and line tracking
//! - `store` - Loading and saving a whole facility from a data directory

pub mod csv_format;
pub mod record_reader;
pub mod store;

pub use record_reader::RecordReader;
pub use store::DataStore;
