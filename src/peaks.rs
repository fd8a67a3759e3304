//! Peak summation over image rows or columns.

use std::ops::Add;

use ndarray::{Array1, ArrayView2, Axis};
use num_traits::Zero;

/// Direction of the summation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakAxis {
    /// Axis 0: collapse rows, one total per column
    Y,
    /// Axis 1: collapse columns, one total per row
    X,
}

impl PeakAxis {
    fn axis(self) -> Axis {
        match self {
            PeakAxis::Y => Axis(0),
            PeakAxis::X => Axis(1),
        }
    }
}

/// An axis selector other than 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid peak axis {0}: expected 0 (y) or 1 (x)")]
pub struct PeakAxisError(pub u8);

impl TryFrom<u8> for PeakAxis {
    type Error = PeakAxisError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PeakAxis::Y),
            1 => Ok(PeakAxis::X),
            other => Err(PeakAxisError(other)),
        }
    }
}

/// Sum a 2-D array along one axis.
pub fn peaks_analysis<A>(array: ArrayView2<'_, A>, axis: PeakAxis) -> Array1<A>
where
    A: Clone + Zero + Add<Output = A>,
{
    array.sum_axis(axis.axis())
}
