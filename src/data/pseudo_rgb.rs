//! Pseudo-RGB preview synthesis.
//!
//! Three bands of the cube are stacked into a displayable 8-bit image. Which
//! bands are used is decided once per read by [`BandSelection::choose`]:
//!
//! 1. the header's `default bands`, if present
//! 2. the bands nearest 710/540/480 nm, if the cube covers the visible range
//! 3. the last, middle and first band otherwise
//!
//! Every channel is then gamma corrected and stretched to 0..=255.

use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::Serialize;

use crate::data::cube::DataCube;
use crate::data::header::keys;
use crate::data::wavelength::WavelengthIndex;
use crate::error::ReadError;

/// Target wavelength for the red channel (nm).
pub const RED_TARGET: f64 = 710.0;
/// Target wavelength for the green channel (nm).
pub const GREEN_TARGET: f64 = 540.0;
/// Target wavelength for the blue channel (nm).
pub const BLUE_TARGET: f64 = 480.0;
/// The spectral heuristic needs a band at or above this wavelength.
pub const VISIBLE_RED_LIMIT: f64 = 635.0;
/// The spectral heuristic needs a band at or below this wavelength.
pub const VISIBLE_BLUE_LIMIT: f64 = 490.0;
/// Display gamma; samples are raised to `1 / GAMMA`.
pub const GAMMA: f64 = 2.2;

/// Bands chosen for the red, green and blue proxies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BandSelection {
    /// Taken verbatim from `default bands`
    Explicit {
        /// First listed band
        red: usize,
        /// Second listed band
        green: usize,
        /// Third listed band
        blue: usize,
    },
    /// Nearest bands to 710, 540 and 480 nm
    SpectralHeuristic {
        /// Band nearest 710 nm
        red: usize,
        /// Band nearest 540 nm
        green: usize,
        /// Band nearest 480 nm
        blue: usize,
    },
    /// Last, middle and first band
    PositionalFallback {
        /// Band `bands - 1`
        red: usize,
        /// Band `(bands - 1) / 2`
        green: usize,
        /// Band 0
        blue: usize,
    },
}

impl BandSelection {
    /// Pick the selection strategy for a cube.
    pub fn choose(
        default_bands: Option<[usize; 3]>,
        wavelengths: &WavelengthIndex,
        bands: usize,
    ) -> Self {
        if let Some([red, green, blue]) = default_bands {
            return Self::Explicit { red, green, blue };
        }

        if let Some(selection) = Self::spectral(wavelengths) {
            return selection;
        }

        let red = bands.saturating_sub(1);
        Self::PositionalFallback {
            red,
            green: red / 2,
            blue: 0,
        }
    }

    fn spectral(wavelengths: &WavelengthIndex) -> Option<Self> {
        let (min, max) = (wavelengths.min()?, wavelengths.max()?);
        if max < VISIBLE_RED_LIMIT || min > VISIBLE_BLUE_LIMIT {
            return None;
        }
        Some(Self::SpectralHeuristic {
            red: wavelengths.closest_band(RED_TARGET)?,
            green: wavelengths.closest_band(GREEN_TARGET)?,
            blue: wavelengths.closest_band(BLUE_TARGET)?,
        })
    }

    /// Band indices in the order they are stacked into channels 0, 1, 2.
    ///
    /// Explicit selections keep the header order; the other strategies stack
    /// blue first.
    pub fn channel_bands(&self) -> [usize; 3] {
        match *self {
            Self::Explicit { red, green, blue } => [red, green, blue],
            Self::SpectralHeuristic { red, green, blue }
            | Self::PositionalFallback { red, green, blue } => [blue, green, red],
        }
    }

    /// Short strategy name for logs.
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Explicit { .. } => "explicit",
            Self::SpectralHeuristic { .. } => "spectral_heuristic",
            Self::PositionalFallback { .. } => "positional_fallback",
        }
    }
}

/// Gamma-correct a channel and stretch it linearly to 0..=255.
///
/// The smallest finite value maps to 0 and the largest to 255, truncating
/// toward zero. Non-finite samples (e.g. from negative input) become 0, and
/// a channel without spread is all 0.
pub fn gamma_rescale(channel: ArrayView2<'_, f64>) -> Array2<u8> {
    let corrected = channel.mapv(|v| v.powf(1.0 / GAMMA));
    rescale(corrected.view())
}

/// Stretch a channel linearly so its finite range spans 0..=255.
pub fn rescale(channel: ArrayView2<'_, f64>) -> Array2<u8> {
    let (min, max) = channel
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if max <= min {
        return Array2::zeros(channel.raw_dim());
    }

    let span = max - min;
    channel.mapv(|v| {
        if v.is_finite() {
            ((v - min) / span * 255.0) as u8
        } else {
            0
        }
    })
}

/// An 8-bit, 3-channel preview of shape (lines, samples, 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoRgb {
    data: Array3<u8>,
}

impl PseudoRgb {
    /// Stack the selected bands and post-process each channel.
    pub fn compose(cube: &DataCube, selection: BandSelection) -> Result<Self, ReadError> {
        let dims = cube.dims();
        let mut data = Array3::<u8>::zeros((dims.lines, dims.samples, 3));

        for (channel, band) in selection.channel_bands().into_iter().enumerate() {
            let intensities = cube.band(band).ok_or_else(|| {
                let key = match selection {
                    BandSelection::Explicit { .. } => keys::DEFAULT_BANDS,
                    _ => keys::BANDS,
                };
                ReadError::malformed(
                    key,
                    format!("band {} out of range for a {}-band cube", band, dims.bands),
                )
            })?;
            data.index_axis_mut(Axis(2), channel)
                .assign(&gamma_rescale(intensities.view()));
        }

        Ok(Self { data })
    }

    /// Raw channel data.
    pub fn data(&self) -> &Array3<u8> {
        &self.data
    }

    /// One channel in stacking order.
    pub fn channel(&self, index: usize) -> ArrayView2<'_, u8> {
        self.data.index_axis(Axis(2), index)
    }

    /// Preview height.
    pub fn lines(&self) -> usize {
        self.data.dim().0
    }

    /// Preview width.
    pub fn samples(&self) -> usize {
        self.data.dim().1
    }

    /// Convert to an `image` buffer for display or export.
    ///
    /// Channels are stored blue-first for the heuristic strategies, so they
    /// are reversed on the way out.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        let width = self.samples() as u32;
        let height = self.lines() as u32;
        image::RgbImage::from_fn(width, height, |x, y| {
            let (row, col) = (y as usize, x as usize);
            image::Rgb([
                self.data[[row, col, 2]],
                self.data[[row, col, 1]],
                self.data[[row, col, 0]],
            ])
        })
    }
}
