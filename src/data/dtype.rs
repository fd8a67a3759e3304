//! ENVI data type codes.

use serde::Serialize;

use crate::error::ReadError;

/// Element type of a datacube payload, resolved from the header's `data type` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Code 1
    U8,
    /// Code 2
    I16,
    /// Code 3
    I32,
    /// Code 4
    F32,
    /// Code 5
    F64,
    /// Code 6, pairs of `f32`
    Complex64,
    /// Code 9, pairs of `f64`
    Complex128,
    /// Code 12
    U16,
    /// Code 13
    U32,
    /// Codes 14 and 15
    U64,
}

impl DataType {
    /// Resolve a header type code.
    pub fn from_code(code: &str) -> Result<Self, ReadError> {
        let data_type = match code.trim() {
            "1" => Self::U8,
            "2" => Self::I16,
            "3" => Self::I32,
            "4" => Self::F32,
            "5" => Self::F64,
            "6" => Self::Complex64,
            "9" => Self::Complex128,
            "12" => Self::U16,
            "13" => Self::U32,
            // 14 is signed in ENVI, but existing datasets are read as unsigned.
            "14" | "15" => Self::U64,
            other => {
                return Err(ReadError::UnsupportedType {
                    code: other.to_string(),
                });
            }
        };
        Ok(data_type)
    }

    /// Size of one element in bytes.
    pub fn byte_width(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 | Self::U64 | Self::Complex64 => 8,
            Self::Complex128 => 16,
        }
    }

    /// Human-readable element type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::U8 => "uint8",
            Self::I16 => "int16",
            Self::I32 => "int32",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::U16 => "uint16",
            Self::U32 => "uint32",
            Self::U64 => "uint64",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
