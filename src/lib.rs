//! phenocube - hyperspectral datacube reader
//!
//! Reads ENVI-style datasets (a flat binary payload plus a `<data>.hdr`
//! sidecar) into an `ndarray` datacube with a pseudo-RGB preview, for plant
//! phenotyping pipelines.

pub mod config;
pub mod data;
pub mod error;
pub mod peaks;
pub mod plot;
pub mod preview;

pub use config::{DebugConfig, DebugMode};
pub use data::{SpectralDataRecord, read_data, read_data_with};
pub use error::{DatasetError, ReadError};
