//! Wavelength-to-band lookup.

use serde::Serialize;

use crate::data::header::keys;
use crate::error::ReadError;

/// Index of the entry in `sorted` closest to `target`.
///
/// `sorted` must be in ascending order; this is not checked. When the target
/// is equidistant from two neighbours the lower index is returned. Returns
/// `None` only for an empty slice.
pub fn find_closest(sorted: &[f64], target: f64) -> Option<usize> {
    match sorted.len() {
        0 => None,
        1 => Some(0),
        len => {
            let idx = sorted.partition_point(|&v| v < target).clamp(1, len - 1);
            let left = (target - sorted[idx - 1]).abs();
            let right = (sorted[idx] - target).abs();
            Some(if left <= right { idx - 1 } else { idx })
        }
    }
}

/// A single wavelength and the band that records it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandWavelength {
    /// Wavelength in the header's units
    pub wavelength: f64,
    /// Band index in the datacube
    pub band: usize,
}

/// Ordered `(wavelength, band)` pairs with band `i` at position `i`.
#[derive(Debug, Clone, Serialize)]
pub struct WavelengthIndex {
    entries: Vec<BandWavelength>,
    /// Distinct wavelengths sorted ascending, for nearest-neighbour search.
    #[serde(skip)]
    sorted: Vec<BandWavelength>,
}

impl WavelengthIndex {
    /// Build the index from the header wavelength list.
    ///
    /// The list must hold exactly `bands` distinct values.
    pub fn new(wavelengths: &[f64], bands: usize) -> Result<Self, ReadError> {
        if wavelengths.len() != bands {
            return Err(ReadError::malformed(
                keys::WAVELENGTH,
                format!(
                    "{} wavelengths listed for {} bands",
                    wavelengths.len(),
                    bands
                ),
            ));
        }

        let entries: Vec<BandWavelength> = wavelengths
            .iter()
            .enumerate()
            .map(|(band, &wavelength)| BandWavelength { wavelength, band })
            .collect();

        let mut sorted = entries.clone();
        sorted.sort_by(|a, b| a.wavelength.total_cmp(&b.wavelength));
        if let Some(pair) = sorted.windows(2).find(|w| w[0].wavelength == w[1].wavelength) {
            return Err(ReadError::malformed(
                keys::WAVELENGTH,
                format!(
                    "wavelength {} is listed for bands {} and {}",
                    pair[0].wavelength, pair[0].band, pair[1].band
                ),
            ));
        }

        Ok(Self { entries, sorted })
    }

    /// Pairs in band order.
    pub fn entries(&self) -> &[BandWavelength] {
        &self.entries
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Band recording exactly this wavelength.
    pub fn band_of(&self, wavelength: f64) -> Option<usize> {
        self.sorted
            .binary_search_by(|e| e.wavelength.total_cmp(&wavelength))
            .ok()
            .map(|i| self.sorted[i].band)
    }

    /// Wavelength recorded by a band.
    pub fn wavelength_of(&self, band: usize) -> Option<f64> {
        self.entries.get(band).map(|e| e.wavelength)
    }

    /// Band whose wavelength is nearest to `target`.
    pub fn closest_band(&self, target: f64) -> Option<usize> {
        let values: Vec<f64> = self.sorted.iter().map(|e| e.wavelength).collect();
        find_closest(&values, target).map(|i| self.sorted[i].band)
    }

    /// Smallest wavelength.
    pub fn min(&self) -> Option<f64> {
        self.sorted.first().map(|e| e.wavelength)
    }

    /// Largest wavelength.
    pub fn max(&self) -> Option<f64> {
        self.sorted.last().map(|e| e.wavelength)
    }
}
