//! Binary datacube decoding.
//!
//! The payload is a flat dump laid out as (lines, bands, samples). It is
//! decoded in the header byte order and transposed to (lines, samples, bands)
//! so that `cube[[row, col, band]]` addresses a single spectral sample.

use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use ndarray::{Array2, Array3, Axis};
use num_complex::{Complex32, Complex64};

use crate::data::dtype::DataType;
use crate::data::header::Endianness;
use crate::error::ReadError;

/// Cube dimensions as declared by the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeDims {
    /// Rows
    pub lines: usize,
    /// Columns
    pub samples: usize,
    /// Spectral bands
    pub bands: usize,
}

impl CubeDims {
    /// Create dimensions.
    pub fn new(lines: usize, samples: usize, bands: usize) -> Self {
        Self {
            lines,
            samples,
            bands,
        }
    }

    /// Total element count, `None` on overflow.
    pub fn element_count(&self) -> Option<usize> {
        self.lines.checked_mul(self.bands)?.checked_mul(self.samples)
    }
}

/// Element types a datacube can hold.
pub trait CubeElement: Copy + Default + Send + Sync + 'static {
    /// Header type this element decodes from.
    const DATA_TYPE: DataType;

    /// Decode `src` into `dst`; `src.len()` is exactly `dst.len()` elements wide.
    fn decode<B: ByteOrder>(src: &[u8], dst: &mut [Self]);

    /// Intensity used for previews. Complex samples use their magnitude.
    fn intensity(self) -> f64;

    /// Wrap an array in the matching cube variant.
    fn into_cube(array: Array3<Self>) -> DataCube;

    /// Borrow the array if the cube holds this element type.
    fn from_cube(cube: &DataCube) -> Option<&Array3<Self>>;
}

macro_rules! real_element {
    ($ty:ty, $variant:ident, $read:ident, $v:ident => $to_f64:expr) => {
        impl CubeElement for $ty {
            const DATA_TYPE: DataType = DataType::$variant;

            fn decode<B: ByteOrder>(src: &[u8], dst: &mut [Self]) {
                B::$read(src, dst);
            }

            fn intensity(self) -> f64 {
                let $v = self;
                $to_f64
            }

            fn into_cube(array: Array3<Self>) -> DataCube {
                DataCube::$variant(array)
            }

            fn from_cube(cube: &DataCube) -> Option<&Array3<Self>> {
                match cube {
                    DataCube::$variant(array) => Some(array),
                    _ => None,
                }
            }
        }
    };
}

real_element!(i16, I16, read_i16_into, v => f64::from(v));
real_element!(i32, I32, read_i32_into, v => f64::from(v));
real_element!(u16, U16, read_u16_into, v => f64::from(v));
real_element!(u32, U32, read_u32_into, v => f64::from(v));
real_element!(u64, U64, read_u64_into, v => v as f64);
real_element!(f32, F32, read_f32_into, v => f64::from(v));
real_element!(f64, F64, read_f64_into, v => v);

impl CubeElement for u8 {
    const DATA_TYPE: DataType = DataType::U8;

    fn decode<B: ByteOrder>(src: &[u8], dst: &mut [Self]) {
        dst.copy_from_slice(src);
    }

    fn intensity(self) -> f64 {
        f64::from(self)
    }

    fn into_cube(array: Array3<Self>) -> DataCube {
        DataCube::U8(array)
    }

    fn from_cube(cube: &DataCube) -> Option<&Array3<Self>> {
        match cube {
            DataCube::U8(array) => Some(array),
            _ => None,
        }
    }
}

impl CubeElement for Complex32 {
    const DATA_TYPE: DataType = DataType::Complex64;

    fn decode<B: ByteOrder>(src: &[u8], dst: &mut [Self]) {
        let mut parts = vec![0.0f32; dst.len() * 2];
        B::read_f32_into(src, &mut parts);
        for (value, pair) in dst.iter_mut().zip(parts.chunks_exact(2)) {
            *value = Complex32::new(pair[0], pair[1]);
        }
    }

    fn intensity(self) -> f64 {
        f64::from(self.norm())
    }

    fn into_cube(array: Array3<Self>) -> DataCube {
        DataCube::Complex64(array)
    }

    fn from_cube(cube: &DataCube) -> Option<&Array3<Self>> {
        match cube {
            DataCube::Complex64(array) => Some(array),
            _ => None,
        }
    }
}

impl CubeElement for Complex64 {
    const DATA_TYPE: DataType = DataType::Complex128;

    fn decode<B: ByteOrder>(src: &[u8], dst: &mut [Self]) {
        let mut parts = vec![0.0f64; dst.len() * 2];
        B::read_f64_into(src, &mut parts);
        for (value, pair) in dst.iter_mut().zip(parts.chunks_exact(2)) {
            *value = Complex64::new(pair[0], pair[1]);
        }
    }

    fn intensity(self) -> f64 {
        self.norm()
    }

    fn into_cube(array: Array3<Self>) -> DataCube {
        DataCube::Complex128(array)
    }

    fn from_cube(cube: &DataCube) -> Option<&Array3<Self>> {
        match cube {
            DataCube::Complex128(array) => Some(array),
            _ => None,
        }
    }
}

/// A decoded datacube of shape (lines, samples, bands).
#[derive(Debug, Clone, PartialEq)]
pub enum DataCube {
    /// `uint8` samples
    U8(Array3<u8>),
    /// `int16` samples
    I16(Array3<i16>),
    /// `int32` samples
    I32(Array3<i32>),
    /// `float32` samples
    F32(Array3<f32>),
    /// `float64` samples
    F64(Array3<f64>),
    /// `complex64` samples
    Complex64(Array3<Complex32>),
    /// `complex128` samples
    Complex128(Array3<Complex64>),
    /// `uint16` samples
    U16(Array3<u16>),
    /// `uint32` samples
    U32(Array3<u32>),
    /// `uint64` samples
    U64(Array3<u64>),
}

/// Run `$body` with `$array` bound to the inner array of any variant.
macro_rules! with_array {
    ($cube:expr, $array:ident => $body:expr) => {
        match $cube {
            DataCube::U8($array) => $body,
            DataCube::I16($array) => $body,
            DataCube::I32($array) => $body,
            DataCube::F32($array) => $body,
            DataCube::F64($array) => $body,
            DataCube::Complex64($array) => $body,
            DataCube::Complex128($array) => $body,
            DataCube::U16($array) => $body,
            DataCube::U32($array) => $body,
            DataCube::U64($array) => $body,
        }
    };
}

impl DataCube {
    /// Read and decode a payload file.
    pub fn read(
        path: &Path,
        data_type: DataType,
        dims: CubeDims,
        endianness: Endianness,
    ) -> Result<Self, ReadError> {
        let bytes = std::fs::read(path).map_err(|e| ReadError::io(path, e))?;
        log::debug!("Read {} payload bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes, data_type, dims, endianness)
    }

    /// Decode an in-memory payload.
    pub fn from_bytes(
        bytes: &[u8],
        data_type: DataType,
        dims: CubeDims,
        endianness: Endianness,
    ) -> Result<Self, ReadError> {
        match data_type {
            DataType::U8 => decode::<u8>(bytes, dims, endianness),
            DataType::I16 => decode::<i16>(bytes, dims, endianness),
            DataType::I32 => decode::<i32>(bytes, dims, endianness),
            DataType::F32 => decode::<f32>(bytes, dims, endianness),
            DataType::F64 => decode::<f64>(bytes, dims, endianness),
            DataType::Complex64 => decode::<Complex32>(bytes, dims, endianness),
            DataType::Complex128 => decode::<Complex64>(bytes, dims, endianness),
            DataType::U16 => decode::<u16>(bytes, dims, endianness),
            DataType::U32 => decode::<u32>(bytes, dims, endianness),
            DataType::U64 => decode::<u64>(bytes, dims, endianness),
        }
    }

    /// Element type.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::U8(_) => DataType::U8,
            Self::I16(_) => DataType::I16,
            Self::I32(_) => DataType::I32,
            Self::F32(_) => DataType::F32,
            Self::F64(_) => DataType::F64,
            Self::Complex64(_) => DataType::Complex64,
            Self::Complex128(_) => DataType::Complex128,
            Self::U16(_) => DataType::U16,
            Self::U32(_) => DataType::U32,
            Self::U64(_) => DataType::U64,
        }
    }

    /// Dimensions of the cube.
    pub fn dims(&self) -> CubeDims {
        let (lines, samples, bands) = with_array!(self, a => a.dim());
        CubeDims::new(lines, samples, bands)
    }

    /// Borrow the typed array.
    pub fn as_array<T: CubeElement>(&self) -> Option<&Array3<T>> {
        T::from_cube(self)
    }

    /// One band as a (lines, samples) intensity image.
    pub fn band(&self, index: usize) -> Option<Array2<f64>> {
        if index >= self.dims().bands {
            return None;
        }
        Some(with_array!(self, a => a
            .index_axis(Axis(2), index)
            .mapv(|v| v.intensity())))
    }

    /// Spectrum of the pixel at (line, sample), one intensity per band.
    pub fn spectrum(&self, line: usize, sample: usize) -> Option<Vec<f64>> {
        let dims = self.dims();
        if line >= dims.lines || sample >= dims.samples {
            return None;
        }
        Some(with_array!(self, a => a
            .index_axis(Axis(0), line)
            .index_axis(Axis(0), sample)
            .iter()
            .map(|v| v.intensity())
            .collect()))
    }
}

fn decode<T: CubeElement>(
    bytes: &[u8],
    dims: CubeDims,
    endianness: Endianness,
) -> Result<DataCube, ReadError> {
    let width = T::DATA_TYPE.byte_width();
    let found = bytes.len() / width;
    let expected = dims.element_count().ok_or_else(|| ReadError::Reshape {
        expected: usize::MAX,
        found,
        detail: format!("dimensions {:?} overflow", dims),
    })?;

    let trailing = bytes.len() % width;
    if trailing != 0 {
        return Err(ReadError::Reshape {
            expected,
            found,
            detail: format!(
                "{} trailing bytes after the last {} element",
                trailing, T::DATA_TYPE
            ),
        });
    }
    if found != expected {
        return Err(ReadError::Reshape {
            expected,
            found,
            detail: format!(
                "lines={} bands={} samples={}",
                dims.lines, dims.bands, dims.samples
            ),
        });
    }

    let mut values = vec![T::default(); found];
    match endianness {
        Endianness::Little => T::decode::<LittleEndian>(bytes, &mut values),
        Endianness::Big => T::decode::<BigEndian>(bytes, &mut values),
    }

    let raw = Array3::from_shape_vec((dims.lines, dims.bands, dims.samples), values).map_err(
        |e| ReadError::Reshape {
            expected,
            found,
            detail: e.to_string(),
        },
    )?;
    let cube = raw.permuted_axes([0, 2, 1]).as_standard_layout().into_owned();

    log::debug!(
        "Decoded {} cube with shape {:?}",
        T::DATA_TYPE,
        cube.shape()
    );
    Ok(T::into_cube(cube))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fill value of the raw element at (line, band, sample).
    fn pattern(line: usize, band: usize, sample: usize) -> u16 {
        (line * 100 + band * 10 + sample) as u16
    }

    fn raw_u16(dims: CubeDims, big_endian: bool) -> Vec<u8> {
        let mut bytes = Vec::new();
        for line in 0..dims.lines {
            for band in 0..dims.bands {
                for sample in 0..dims.samples {
                    let v = pattern(line, band, sample);
                    if big_endian {
                        bytes.extend_from_slice(&v.to_be_bytes());
                    } else {
                        bytes.extend_from_slice(&v.to_le_bytes());
                    }
                }
            }
        }
        bytes
    }

    #[test]
    fn test_reshape_and_transpose() {
        let dims = CubeDims::new(3, 4, 5);
        let bytes = raw_u16(dims, false);
        let cube = DataCube::from_bytes(&bytes, DataType::U16, dims, Endianness::Little).unwrap();

        let array = cube.as_array::<u16>().unwrap();
        assert_eq!(array.shape(), &[3, 4, 5]);
        assert!(array.is_standard_layout());
        for line in 0..3 {
            for sample in 0..4 {
                for band in 0..5 {
                    assert_eq!(array[[line, sample, band]], pattern(line, band, sample));
                }
            }
        }
        assert_eq!(cube.dims(), dims);
        assert_eq!(cube.data_type(), DataType::U16);
    }

    #[test]
    fn test_big_endian_payload() {
        let dims = CubeDims::new(2, 3, 2);
        let bytes = raw_u16(dims, true);
        let cube = DataCube::from_bytes(&bytes, DataType::U16, dims, Endianness::Big).unwrap();
        assert_eq!(cube.as_array::<u16>().unwrap()[[1, 2, 1]], pattern(1, 1, 2));
    }

    #[test]
    fn test_element_count_mismatch_is_reshape_error() {
        let dims = CubeDims::new(2, 2, 2);
        let bytes = vec![0u8; 7 * 4];
        let err = DataCube::from_bytes(&bytes, DataType::F32, dims, Endianness::Little).unwrap_err();
        assert!(matches!(
            err,
            ReadError::Reshape {
                expected: 8,
                found: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let dims = CubeDims::new(1, 1, 2);
        let bytes = vec![0u8; 9];
        let err = DataCube::from_bytes(&bytes, DataType::F32, dims, Endianness::Little).unwrap_err();
        assert!(matches!(err, ReadError::Reshape { .. }));
    }

    #[test]
    fn test_complex_band_uses_magnitude() {
        let dims = CubeDims::new(1, 1, 1);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&3.0f32.to_le_bytes());
        bytes.extend_from_slice(&4.0f32.to_le_bytes());
        let cube =
            DataCube::from_bytes(&bytes, DataType::Complex64, dims, Endianness::Little).unwrap();
        assert_eq!(cube.as_array::<Complex32>().unwrap()[[0, 0, 0]], Complex32::new(3.0, 4.0));
        assert_eq!(cube.band(0).unwrap()[[0, 0]], 5.0);
    }

    #[test]
    fn test_band_and_spectrum_access() {
        let dims = CubeDims::new(2, 3, 4);
        let bytes = raw_u16(dims, false);
        let cube = DataCube::from_bytes(&bytes, DataType::U16, dims, Endianness::Little).unwrap();

        let band = cube.band(2).unwrap();
        assert_eq!(band.dim(), (2, 3));
        assert_eq!(band[[1, 2]], f64::from(pattern(1, 2, 2)));
        assert!(cube.band(4).is_none());

        let spectrum = cube.spectrum(1, 0).unwrap();
        let expected: Vec<f64> = (0..4).map(|b| f64::from(pattern(1, b, 0))).collect();
        assert_eq!(spectrum, expected);
        assert!(cube.spectrum(2, 0).is_none());
    }

    #[test]
    fn test_spectrum_walks_bands_of_one_pixel() {
        let dims = CubeDims::new(2, 3, 4);
        let bytes = raw_u16(dims, true);
        let cube = DataCube::from_bytes(&bytes, DataType::U16, dims, Endianness::Big).unwrap();

        for line in 0..2 {
            for sample in 0..3 {
                let spectrum = cube.spectrum(line, sample).unwrap();
                let expected: Vec<f64> =
                    (0..4).map(|b| f64::from(pattern(line, b, sample))).collect();
                assert_eq!(spectrum, expected, "pixel ({}, {})", line, sample);
            }
        }
        assert!(cube.spectrum(0, 3).is_none());
    }

    #[test]
    fn test_typed_access_rejects_other_types() {
        let dims = CubeDims::new(1, 1, 1);
        let cube = DataCube::from_bytes(&[7], DataType::U8, dims, Endianness::Little).unwrap();
        assert!(cube.as_array::<u8>().is_some());
        assert!(cube.as_array::<f32>().is_none());
    }
}
