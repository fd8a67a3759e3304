//! Hyperspectral dataset reading.
//!
//! This module provides:
//! - `HeaderMetadata`: parsed sidecar header (`<data>.hdr`)
//! - `DataCube`: the decoded (lines, samples, bands) array
//! - `WavelengthIndex` and `find_closest`: wavelength-to-band lookup
//! - `BandSelection` and `PseudoRgb`: the 8-bit preview
//! - `SpectralDataRecord`: everything above, bundled per read
//! - `read_data`: the entry point that ties the stages together
//!
//! ## Usage
//!
//! ```rust,ignore
//! use phenocube::config::DebugConfig;
//! use phenocube::data::read_data;
//!
//! let record = read_data("scans/plant_01.raw", &DebugConfig::disabled())?;
//! println!("{}", record.summary());
//! ```

pub mod cube;
mod dtype;
pub mod header;
pub mod pseudo_rgb;
mod reader;
mod record;
pub mod wavelength;

pub use cube::{CubeDims, CubeElement, DataCube};
pub use dtype::DataType;
pub use header::{Endianness, HeaderMetadata};
pub use pseudo_rgb::{BandSelection, PseudoRgb};
pub use reader::{read_data, read_data_with};
pub use record::{ArrayType, RecordParts, RecordSummary, SpectralDataRecord};
pub use wavelength::{BandWavelength, WavelengthIndex, find_closest};

#[cfg(test)]
mod tests;
