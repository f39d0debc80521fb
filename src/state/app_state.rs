use crate::data::datasets::DatasetKind;
use crate::state::theme::Theme;

pub const VERSION: &str = "0.1.0";

/// The chart kinds, in toolbar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Scatter,
    Parallel,
    Heatmap,
    Matrix,
    Ranking,
    Stream,
    Horizon,
}

impl ChartKind {
    pub const ALL: [ChartKind; 7] = [
        ChartKind::Scatter,
        ChartKind::Parallel,
        ChartKind::Heatmap,
        ChartKind::Matrix,
        ChartKind::Ranking,
        ChartKind::Stream,
        ChartKind::Horizon,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter",
            ChartKind::Parallel => "Parallel coordinates",
            ChartKind::Heatmap => "Correlation heatmap",
            ChartKind::Matrix => "Scatter matrix",
            ChartKind::Ranking => "Ranked bars",
            ChartKind::Stream => "Stream graph",
            ChartKind::Horizon => "Horizon charts",
        }
    }

    /// Which dataset this chart consumes.
    pub fn dataset(&self) -> DatasetKind {
        match self {
            ChartKind::Scatter | ChartKind::Parallel | ChartKind::Matrix => DatasetKind::Iris,
            ChartKind::Heatmap => DatasetKind::Abalone,
            ChartKind::Ranking => DatasetKind::Rankings,
            ChartKind::Stream => DatasetKind::Sales,
            ChartKind::Horizon => DatasetKind::Pollution,
        }
    }
}

/// Sort direction for table columns and ranked bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Top-level application state outside the individual chart views.
#[derive(Debug, Clone)]
pub struct AppState {
    pub active_chart: ChartKind,
    pub theme: Theme,
    pub show_table: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            active_chart: ChartKind::Scatter,
            theme: Theme::default(),
            show_table: false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chart_has_a_dataset() {
        for kind in ChartKind::ALL {
            // label and dataset mapping must both be total
            assert!(!kind.label().is_empty());
            assert!(!kind.dataset().label().is_empty());
        }
    }
}
