//! Labelled line series for external plotting.
//!
//! Nothing is drawn here. A [`Figure`] collects series the way successive
//! line-plot calls accumulate on one set of axes, and can be exported as JSON
//! for whatever renderer the caller uses.

use ndarray::ArrayView1;
use serde::Serialize;

/// One labelled line; x runs `0..len`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    /// Legend label
    pub label: String,
    /// `[x, y]` points
    pub points: Vec<[f64; 2]>,
}

/// A set of line series sharing axes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    series: Vec<Series>,
}

impl Figure {
    /// Empty figure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line for `values` indexed by position.
    pub fn plot_graph(&mut self, values: ArrayView1<'_, f64>, label: impl ToString) -> &Series {
        let points = values
            .iter()
            .enumerate()
            .map(|(x, &y)| [x as f64, y])
            .collect();
        self.series.push(Series {
            label: label.to_string(),
            points,
        });
        &self.series[self.series.len() - 1]
    }

    /// All series in insertion order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Serialize the figure to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peaks::{PeakAxis, peaks_analysis};
    use ndarray::array;

    #[test]
    fn test_plot_graph_indexes_by_position() {
        let mut figure = Figure::new();
        let series = figure.plot_graph(array![3.0, 1.5, 4.0].view(), "row totals");
        assert_eq!(series.label, "row totals");
        assert_eq!(series.points, vec![[0.0, 3.0], [1.0, 1.5], [2.0, 4.0]]);
    }

    #[test]
    fn test_series_accumulate() {
        let image = array![[1.0, 0.0], [2.0, 5.0]];
        let mut figure = Figure::new();
        figure.plot_graph(peaks_analysis(image.view(), PeakAxis::Y).view(), "y");
        figure.plot_graph(peaks_analysis(image.view(), PeakAxis::X).view(), 1);

        let labels: Vec<&str> = figure.series().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["y", "1"]);
        assert!(figure.to_json().unwrap().contains("\"label\": \"y\""));
    }
}
