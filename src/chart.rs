//! Chart-ready series data.

/// The canonical analysis output: x values, y values and time labels of
/// equal length, where index *i* across all three describes one sampled
/// instant.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ChartSeries {
    /// Sampled x values.
    pub x_data: Vec<f64>,
    /// Sampled y values.
    pub y_data: Vec<f64>,
    /// Label of each sampled instant.
    pub time_labels: Vec<String>,
}

impl ChartSeries {
    /// An empty series, the defined output for unsupported requests.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append one sampled instant, keeping the three sequences aligned.
    pub fn push(&mut self, x: f64, y: f64, label: impl Into<String>) {
        self.x_data.push(x);
        self.y_data.push(y);
        self.time_labels.push(label.into());
    }

    /// Number of sampled instants.
    pub fn len(&self) -> usize {
        self.x_data.len()
    }

    /// Return true if the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.x_data.is_empty()
    }
}
