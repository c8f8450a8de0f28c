use serde::{Deserialize, Serialize};

/// Default legend label of the value line.
pub const DEFAULT_CHART_LABEL: &str = "Portfolio Value";

/// Default line colour of the value line.
pub const DEFAULT_BORDER_COLOR: &str = "rgba(75,192,192,1)";

/// Chart-ready structure handed to the rendering layer.
///
/// The core computes all the numbers; the frontend just renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    /// Date labels (`YYYY-MM-DD`), one per data point
    pub labels: Vec<String>,

    pub datasets: Vec<ChartDataset>,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    /// Legend text
    pub label: String,

    /// Values aligned with `ChartPayload::labels`
    pub data: Vec<f64>,

    /// Whether the area under the line is filled
    pub fill: bool,

    /// CSS colour of the line
    pub border_color: String,
}

/// Display metadata applied to the value line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub label: String,
    pub border_color: String,
    pub fill: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            label: DEFAULT_CHART_LABEL.to_string(),
            border_color: DEFAULT_BORDER_COLOR.to_string(),
            fill: false,
        }
    }
}
