//! Sidecar header parsing.
//!
//! Headers are line-oriented `key = value` (or `key : value`) text. Brace
//! lists may span several lines; they are folded onto one logical line before
//! the records are split:
//!
//! ```text
//! ENVI
//! samples = 640
//! lines = 480
//! bands = 3
//! data type = 4
//! interleave = bil
//! wavelength units = nm
//! wavelength = {
//!  480.0,
//!  540.0,
//!  710.0}
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::data::dtype::DataType;
use crate::error::ReadError;

/// Required header keys.
pub mod keys {
    /// Number of columns per line.
    pub const SAMPLES: &str = "samples";
    /// Number of lines (rows).
    pub const LINES: &str = "lines";
    /// Number of spectral bands.
    pub const BANDS: &str = "bands";
    /// Element type code.
    pub const DATA_TYPE: &str = "data type";
    /// Storage interleave, e.g. `bil`.
    pub const INTERLEAVE: &str = "interleave";
    /// Unit of the wavelength list.
    pub const WAVELENGTH_UNITS: &str = "wavelength units";
    /// Brace-delimited wavelength list.
    pub const WAVELENGTH: &str = "wavelength";
    /// Optional three band indices for display.
    pub const DEFAULT_BANDS: &str = "default bands";
    /// Optional byte order flag, `0` little-endian, `1` big-endian.
    pub const BYTE_ORDER: &str = "byte order";
}

/// Byte order of the binary payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Least significant byte first (`byte order = 0`)
    #[default]
    Little,
    /// Most significant byte first (`byte order = 1`)
    Big,
}

/// Path of the sidecar header for a data file: the data path with `.hdr` appended.
pub fn header_path(data_path: &Path) -> PathBuf {
    let mut name = data_path.as_os_str().to_owned();
    name.push(".hdr");
    PathBuf::from(name)
}

/// Fold multi-line brace lists and drop separator noise so that every
/// record sits on a single line.
pub fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace(",\n", ",")
        .replace("\n,", ",")
        .replace("{\n", "{")
        .replace("\n}", "}")
        .replace(" \n ", "")
        .replace(';', "")
}

/// Split one normalized record into a key and a value.
fn split_record(record: &str) -> Option<(&str, &str)> {
    let (key, value) = record
        .split_once(" = ")
        .or_else(|| record.split_once(" : "))?;
    Some((key.trim_end(), value.trim_end()))
}

/// Strip braces and whitespace from a list value and split it on commas.
fn list_items(value: &str) -> Vec<String> {
    value
        .replace(['{', '}', ' '], "")
        .split(',')
        .map(|item| item.trim().to_string())
        .collect()
}

/// Parsed header metadata.
#[derive(Debug, Clone)]
pub struct HeaderMetadata {
    entries: HashMap<String, String>,
    wavelengths: Vec<f64>,
}

impl HeaderMetadata {
    /// Read and parse a header file.
    pub fn read(path: &Path) -> Result<Self, ReadError> {
        let text = std::fs::read_to_string(path).map_err(|e| ReadError::io(path, e))?;
        Self::parse(&text)
    }

    /// Parse header text.
    ///
    /// Later occurrences of a key overwrite earlier ones. The wavelength list
    /// is parsed eagerly, so a header without one is rejected here.
    pub fn parse(text: &str) -> Result<Self, ReadError> {
        let normalized = normalize(text);
        let mut entries = HashMap::new();

        for record in normalized.split('\n') {
            match split_record(record) {
                Some((key, value)) => {
                    entries.insert(key.to_string(), value.to_string());
                }
                None => log::trace!("Skipping header line without delimiter: {:?}", record),
            }
        }

        let raw = entries
            .get(keys::WAVELENGTH)
            .ok_or_else(|| ReadError::missing_key(keys::WAVELENGTH))?;
        let wavelengths = list_items(raw)
            .iter()
            .map(|item| {
                item.parse::<f64>().map_err(|_| {
                    ReadError::malformed(keys::WAVELENGTH, format!("'{}' is not a number", item))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Parsed header: {} entries, {} wavelengths",
            entries.len(),
            wavelengths.len()
        );

        Ok(Self {
            entries,
            wavelengths,
        })
    }

    /// Raw value of a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Raw value of a required key.
    pub fn require(&self, key: &str) -> Result<&str, ReadError> {
        self.get(key).ok_or_else(|| ReadError::missing_key(key))
    }

    /// Whether the header contains a key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of raw entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn positive(&self, key: &str) -> Result<usize, ReadError> {
        let raw = self.require(key)?;
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ReadError::malformed(
                key,
                format!("expected a positive integer, got '{}'", raw),
            )),
        }
    }

    /// Columns per line.
    pub fn samples(&self) -> Result<usize, ReadError> {
        self.positive(keys::SAMPLES)
    }

    /// Number of lines.
    pub fn lines(&self) -> Result<usize, ReadError> {
        self.positive(keys::LINES)
    }

    /// Number of bands.
    pub fn bands(&self) -> Result<usize, ReadError> {
        self.positive(keys::BANDS)
    }

    /// Element type of the payload.
    pub fn data_type(&self) -> Result<DataType, ReadError> {
        DataType::from_code(self.require(keys::DATA_TYPE)?)
    }

    /// Interleave string, recorded as written.
    pub fn interleave(&self) -> Result<&str, ReadError> {
        self.require(keys::INTERLEAVE)
    }

    /// Unit of the wavelength list.
    pub fn wavelength_units(&self) -> Result<&str, ReadError> {
        self.require(keys::WAVELENGTH_UNITS)
    }

    /// Wavelengths in header order.
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    /// The `default bands` triple, if the header has one.
    pub fn default_bands(&self) -> Result<Option<[usize; 3]>, ReadError> {
        let Some(raw) = self.get(keys::DEFAULT_BANDS) else {
            return Ok(None);
        };

        let bands = list_items(raw)
            .iter()
            .map(|item| {
                item.parse::<usize>().map_err(|_| {
                    ReadError::malformed(
                        keys::DEFAULT_BANDS,
                        format!("'{}' is not a band index", item),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match bands.as_slice() {
            &[red, green, blue] => Ok(Some([red, green, blue])),
            other => Err(ReadError::malformed(
                keys::DEFAULT_BANDS,
                format!("expected 3 band indices, got {}", other.len()),
            )),
        }
    }

    /// Payload byte order; little-endian when the header does not say.
    pub fn endianness(&self) -> Result<Endianness, ReadError> {
        match self.get(keys::BYTE_ORDER).map(str::trim) {
            None | Some("0") => Ok(Endianness::Little),
            Some("1") => Ok(Endianness::Big),
            Some(other) => Err(ReadError::malformed(
                keys::BYTE_ORDER,
                format!("expected 0 or 1, got '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI_LINE: &str = "ENVI\n\
        description = {\n\
        leaf scan}\n\
        samples = 4\n\
        lines = 2\n\
        bands = 3\n\
        header offset = 0\n\
        data type = 4\n\
        interleave = bil\n\
        wavelength units = nm\n\
        default bands = {\n\
        2,\n\
        1,\n\
        0}\n\
        wavelength = {\n\
        480.0,\n\
        540.0,\n\
        710.0\n\
        }\n";

    const SINGLE_LINE: &str = "ENVI\n\
        description = {leaf scan}\n\
        samples = 4\n\
        lines = 2\n\
        bands = 3\n\
        header offset = 0\n\
        data type = 4\n\
        interleave = bil\n\
        wavelength units = nm\n\
        default bands = {2,1,0}\n\
        wavelength = {480.0, 540.0, 710.0}\n";

    #[test]
    fn test_multi_and_single_line_headers_are_equivalent() {
        let tabbed = MULTI_LINE
            .replace("\n2,", "\n\t2,")
            .replace("\n1,", "\n\t1,")
            .replace("\n0}", "\n\t0}")
            .replace("\n480.0,", "\n\t480.0,")
            .replace("\n540.0,", "\n\t540.0,")
            .replace("\n710.0\n", "\n\t710.0\n");
        assert!(tabbed.contains("\t480.0"));
        let single = HeaderMetadata::parse(SINGLE_LINE).unwrap();

        for text in [MULTI_LINE, tabbed.as_str()] {
            let multi = HeaderMetadata::parse(text).unwrap();
            assert_eq!(multi.wavelengths(), single.wavelengths());
            assert_eq!(multi.default_bands().unwrap(), Some([2, 1, 0]));
            assert_eq!(multi.len(), single.len());
            for (key, value) in &single.entries {
                let other = multi.get(key).unwrap_or_else(|| panic!("missing key {}", key));
                assert_eq!(
                    list_items(other),
                    list_items(value),
                    "value mismatch for {}",
                    key
                );
            }
        }
    }

    #[test]
    fn test_typed_accessors() {
        let header = HeaderMetadata::parse(MULTI_LINE).unwrap();
        assert_eq!(header.samples().unwrap(), 4);
        assert_eq!(header.lines().unwrap(), 2);
        assert_eq!(header.bands().unwrap(), 3);
        assert_eq!(header.data_type().unwrap(), DataType::F32);
        assert_eq!(header.interleave().unwrap(), "bil");
        assert_eq!(header.wavelength_units().unwrap(), "nm");
        assert_eq!(header.wavelengths(), &[480.0, 540.0, 710.0]);
        assert_eq!(header.default_bands().unwrap(), Some([2, 1, 0]));
        assert_eq!(header.endianness().unwrap(), Endianness::Little);
    }

    #[test]
    fn test_colon_delimiter_and_trailing_whitespace() {
        let text = "samples : 10   \nlines = 5\r\nwavelength = {400, 500}  \n";
        let header = HeaderMetadata::parse(text).unwrap();
        assert_eq!(header.get("samples"), Some("10"));
        assert_eq!(header.get("lines"), Some("5"));
        assert_eq!(header.wavelengths(), &[400.0, 500.0]);
    }

    #[test]
    fn test_equals_delimiter_wins_over_colon() {
        let header = HeaderMetadata::parse("time : stamp = 12:00\nwavelength = {1}").unwrap();
        assert_eq!(header.get("time : stamp"), Some("12:00"));
    }

    #[test]
    fn test_later_duplicates_overwrite() {
        let header = HeaderMetadata::parse("bands = 2\nbands = 7\nwavelength = {1}").unwrap();
        assert_eq!(header.bands().unwrap(), 7);
    }

    #[test]
    fn test_semicolons_are_removed() {
        let header = HeaderMetadata::parse("; comment\nlines = 3;\nwavelength = {1}").unwrap();
        assert_eq!(header.lines().unwrap(), 3);
    }

    #[test]
    fn test_missing_wavelength_is_missing_key() {
        let err = HeaderMetadata::parse("samples = 1\nlines = 1\n").unwrap_err();
        assert!(matches!(err, ReadError::MissingKey { key } if key == "wavelength"));
    }

    #[test]
    fn test_missing_interleave_is_missing_key() {
        let header = HeaderMetadata::parse("wavelength = {1}").unwrap();
        let err = header.interleave().unwrap_err();
        assert!(matches!(err, ReadError::MissingKey { key } if key == "interleave"));
    }

    #[test]
    fn test_bad_wavelength_is_malformed() {
        let err = HeaderMetadata::parse("wavelength = {400, abc}").unwrap_err();
        assert!(matches!(err, ReadError::MalformedHeader { key, .. } if key == "wavelength"));
    }

    #[test]
    fn test_non_positive_dimension_is_malformed() {
        let header = HeaderMetadata::parse("samples = 0\nlines = x\nwavelength = {1}").unwrap();
        assert!(matches!(
            header.samples().unwrap_err(),
            ReadError::MalformedHeader { .. }
        ));
        assert!(matches!(
            header.lines().unwrap_err(),
            ReadError::MalformedHeader { .. }
        ));
    }

    #[test]
    fn test_default_bands_must_have_three_entries() {
        let header = HeaderMetadata::parse("default bands = {1, 2}\nwavelength = {1}").unwrap();
        assert!(matches!(
            header.default_bands().unwrap_err(),
            ReadError::MalformedHeader { key, .. } if key == "default bands"
        ));
    }

    #[test]
    fn test_big_endian_flag() {
        let header = HeaderMetadata::parse("byte order = 1\nwavelength = {1}").unwrap();
        assert_eq!(header.endianness().unwrap(), Endianness::Big);

        let header = HeaderMetadata::parse("byte order = 2\nwavelength = {1}").unwrap();
        assert!(header.endianness().is_err());
    }

    #[test]
    fn test_header_path_appends_suffix() {
        assert_eq!(
            header_path(Path::new("/scans/plant.raw")),
            PathBuf::from("/scans/plant.raw.hdr")
        );
    }
}
