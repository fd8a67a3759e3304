//! The result of a successful read.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::data::cube::DataCube;
use crate::data::dtype::DataType;
use crate::data::pseudo_rgb::{BandSelection, PseudoRgb};
use crate::data::wavelength::WavelengthIndex;

/// What kind of array a record holds.
///
/// Records read from disk are always raw datacubes; derived products such as
/// index images are not built by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ArrayType {
    /// A raw datacube read from disk
    Datacube,
}

/// Datacube, metadata and preview of one dataset.
#[derive(Debug, Clone)]
pub struct SpectralDataRecord {
    array_data: DataCube,
    max_wavelength: f64,
    min_wavelength: f64,
    data_type: DataType,
    wavelengths: WavelengthIndex,
    samples: usize,
    lines: usize,
    interleave: String,
    wavelength_units: String,
    array_type: ArrayType,
    pseudo_rgb: PseudoRgb,
    band_selection: BandSelection,
    filename: PathBuf,
}

/// Everything needed to build a [`SpectralDataRecord`].
#[derive(Debug)]
pub struct RecordParts {
    /// Decoded datacube
    pub array_data: DataCube,
    /// Wavelength lookup
    pub wavelengths: WavelengthIndex,
    /// Interleave as written in the header
    pub interleave: String,
    /// Wavelength units as written in the header
    pub wavelength_units: String,
    /// Preview image
    pub pseudo_rgb: PseudoRgb,
    /// Bands used for the preview
    pub band_selection: BandSelection,
    /// Data file the record was read from
    pub filename: PathBuf,
}

impl SpectralDataRecord {
    /// Assemble a datacube record.
    pub fn assemble(parts: RecordParts) -> Self {
        let dims = parts.array_data.dims();
        Self {
            max_wavelength: parts.wavelengths.max().unwrap_or(f64::NAN),
            min_wavelength: parts.wavelengths.min().unwrap_or(f64::NAN),
            data_type: parts.array_data.data_type(),
            samples: dims.samples,
            lines: dims.lines,
            array_type: ArrayType::Datacube,
            array_data: parts.array_data,
            wavelengths: parts.wavelengths,
            interleave: parts.interleave,
            wavelength_units: parts.wavelength_units,
            pseudo_rgb: parts.pseudo_rgb,
            band_selection: parts.band_selection,
            filename: parts.filename,
        }
    }

    /// The datacube, shape (lines, samples, bands).
    pub fn array_data(&self) -> &DataCube {
        &self.array_data
    }

    /// Take ownership of the datacube.
    pub fn into_array_data(self) -> DataCube {
        self.array_data
    }

    /// Largest wavelength in the list, which is the last header entry when
    /// the header is in ascending order.
    pub fn max_wavelength(&self) -> f64 {
        self.max_wavelength
    }

    /// Smallest wavelength in the list, not necessarily the first header entry.
    pub fn min_wavelength(&self) -> f64 {
        self.min_wavelength
    }

    /// Element type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Wavelength-to-band lookup.
    pub fn wavelengths(&self) -> &WavelengthIndex {
        &self.wavelengths
    }

    /// Columns.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Rows.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Spectral bands.
    pub fn bands(&self) -> usize {
        self.wavelengths.len()
    }

    /// Interleave string from the header.
    pub fn interleave(&self) -> &str {
        &self.interleave
    }

    /// Wavelength units from the header.
    pub fn wavelength_units(&self) -> &str {
        &self.wavelength_units
    }

    /// Always [`ArrayType::Datacube`] for records built by the reader.
    pub fn array_type(&self) -> ArrayType {
        self.array_type
    }

    /// Preview image.
    pub fn pseudo_rgb(&self) -> &PseudoRgb {
        &self.pseudo_rgb
    }

    /// Bands used for the preview.
    pub fn band_selection(&self) -> BandSelection {
        self.band_selection
    }

    /// Data file this record was read from.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Serializable summary of the metadata, without array payloads.
    pub fn summary(&self) -> RecordSummary<'_> {
        RecordSummary {
            filename: &self.filename,
            array_type: self.array_type,
            data_type: self.data_type,
            lines: self.lines,
            samples: self.samples,
            bands: self.bands(),
            interleave: &self.interleave,
            wavelength_units: &self.wavelength_units,
            min_wavelength: self.min_wavelength,
            max_wavelength: self.max_wavelength,
            band_selection: self.band_selection,
            wavelengths: &self.wavelengths,
        }
    }
}

/// Metadata view of a record for printing or JSON export.
#[derive(Debug, Serialize)]
pub struct RecordSummary<'a> {
    /// Source data file
    pub filename: &'a Path,
    /// Record kind
    pub array_type: ArrayType,
    /// Element type
    pub data_type: DataType,
    /// Rows
    pub lines: usize,
    /// Columns
    pub samples: usize,
    /// Bands
    pub bands: usize,
    /// Interleave
    pub interleave: &'a str,
    /// Wavelength units
    pub wavelength_units: &'a str,
    /// Smallest wavelength
    pub min_wavelength: f64,
    /// Largest wavelength
    pub max_wavelength: f64,
    /// Preview bands
    pub band_selection: BandSelection,
    /// Band wavelengths
    pub wavelengths: &'a WavelengthIndex,
}

impl std::fmt::Display for RecordSummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "file:        {}", self.filename.display())?;
        writeln!(f, "array type:  {:?}", self.array_type)?;
        writeln!(f, "data type:   {}", self.data_type)?;
        writeln!(
            f,
            "shape:       {} lines x {} samples x {} bands ({})",
            self.lines, self.samples, self.bands, self.interleave
        )?;
        writeln!(
            f,
            "wavelengths: {} - {} {}",
            self.min_wavelength, self.max_wavelength, self.wavelength_units
        )?;
        write!(f, "preview:     {:?}", self.band_selection)
    }
}
