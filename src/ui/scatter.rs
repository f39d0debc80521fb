use egui::{RichText, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, Points};

use crate::color;
use crate::data::datasets::{IrisField, IrisRecord, ParsedDataset, Species};
use crate::processing::kd_tree::HoverTree;
use crate::processing::statistics::SeriesSummary;
use crate::state::cache::{self, DerivedSlot};
use crate::ui::{controls, tooltip};

/// Pointer-to-point distance, in span-normalized units, below which a
/// point counts as hovered.
const HOVER_RADIUS: f64 = 0.04;

/// Axis choices for the iris scatter chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterConfig {
    pub x: IrisField,
    pub y: IrisField,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            x: IrisField::SepalLength,
            y: IrisField::SepalWidth,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub species: Species,
}

pub struct ScatterDerived {
    pub points: Vec<ScatterPoint>,
    /// Rows sitting exactly at the origin for the chosen axes.
    pub dropped: usize,
    pub x_summary: Option<SeriesSummary>,
    pub y_summary: Option<SeriesSummary>,
    x_extent: (f64, f64),
    y_extent: (f64, f64),
    tree: HoverTree,
}

impl ScatterDerived {
    fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.x_extent.0) / span(self.x_extent),
            (y - self.y_extent.0) / span(self.y_extent),
        )
    }

    /// Nearest point to a plot-space position. Both axes are scaled to
    /// their data span first so neither dominates the distance.
    pub fn nearest(&self, x: f64, y: f64) -> Option<(usize, f64)> {
        let (nx, ny) = self.normalize(x, y);
        self.tree.nearest(nx, ny)
    }
}

fn span((min, max): (f64, f64)) -> f64 {
    if max > min {
        max - min
    } else {
        1.0
    }
}

fn extent(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min <= max {
        (min, max)
    } else {
        (0.0, 1.0)
    }
}

/// Project records onto the chosen axes. Rows where both coordinates
/// are zero are placeholder entries and are dropped.
pub fn build_scatter(records: &[IrisRecord], config: &ScatterConfig) -> ScatterDerived {
    let mut points = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    for record in records {
        let x = config.x.value(record);
        let y = config.y.value(record);
        if x == 0.0 && y == 0.0 {
            dropped += 1;
            continue;
        }
        points.push(ScatterPoint {
            x,
            y,
            species: record.species,
        });
    }

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let x_extent = extent(&xs);
    let y_extent = extent(&ys);

    let normalized: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            (
                (p.x - x_extent.0) / span(x_extent),
                (p.y - y_extent.0) / span(y_extent),
            )
        })
        .collect();

    ScatterDerived {
        x_summary: SeriesSummary::compute(&xs),
        y_summary: SeriesSummary::compute(&ys),
        x_extent,
        y_extent,
        tree: HoverTree::build(&normalized),
        points,
        dropped,
    }
}

/// Iris scatter chart with selectable axes and nearest-point hover.
pub struct ScatterView {
    records: Vec<IrisRecord>,
    skipped: usize,
    version: u64,
    config: ScatterConfig,
    derived: DerivedSlot<ScatterConfig, ScatterDerived>,
}

impl ScatterView {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            version: 0,
            config: ScatterConfig::default(),
            derived: None,
        }
    }

    pub fn set_dataset(&mut self, data: ParsedDataset<IrisRecord>) {
        self.records = data.records;
        self.skipped = data.skipped;
        self.version = self.version.wrapping_add(1);
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        if self.records.is_empty() {
            empty_hint(ui, "No iris data loaded. Open a CSV or drop one onto the window.");
            return;
        }

        ui.horizontal(|ui| {
            controls::enum_combo(ui, "scatter_x", "X axis", &mut self.config.x, &IrisField::ALL, |f| {
                f.label().to_string()
            });
            controls::enum_combo(ui, "scatter_y", "Y axis", &mut self.config.y, &IrisField::ALL, |f| {
                f.label().to_string()
            });
        });

        let derived = cache::memoize(&mut self.derived, self.version, &self.config, || {
            build_scatter(&self.records, &self.config)
        });
        draw_scatter(ui, &self.config, derived);
    }
}

pub fn empty_hint(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui| {
        ui.label(RichText::new(text).weak());
    });
}

fn draw_scatter(ui: &mut Ui, config: &ScatterConfig, derived: &ScatterDerived) {
    ui.horizontal_wrapped(|ui| {
        if let Some(s) = &derived.x_summary {
            ui.label(RichText::new(s.inline(config.x.label())).weak().size(11.0));
        }
        if let Some(s) = &derived.y_summary {
            ui.label(RichText::new(s.inline(config.y.label())).weak().size(11.0));
        }
        if derived.dropped > 0 {
            ui.label(
                RichText::new(format!("{} rows at origin dropped", derived.dropped))
                    .weak()
                    .size(11.0),
            );
        }
    });

    let response = Plot::new("scatter_plot")
        .legend(Legend::default())
        .x_axis_label(config.x.label())
        .y_axis_label(config.y.label())
        .label_formatter(|_, _| String::new())
        .show(ui, |plot_ui| {
            for species in Species::ALL {
                let series: Vec<[f64; 2]> = derived
                    .points
                    .iter()
                    .filter(|p| p.species == species)
                    .map(|p| [p.x, p.y])
                    .collect();
                if series.is_empty() {
                    continue;
                }
                plot_ui.points(
                    Points::new(series)
                        .name(species.label())
                        .color(color::species_color(species))
                        .shape(MarkerShape::Circle)
                        .radius(3.0),
                );
            }
            plot_ui.pointer_coordinate()
        });

    let Some(pointer) = response.inner else {
        return;
    };
    let Some((idx, dist)) = derived.nearest(pointer.x, pointer.y) else {
        return;
    };
    if dist > HOVER_RADIUS {
        return;
    }

    let point = &derived.points[idx];
    let accent = color::species_color(point.species);
    let screen = response
        .transform
        .position_from_point(&PlotPoint::new(point.x, point.y));
    let painter = ui.painter_at(response.response.rect);
    tooltip::highlight_point(&painter, screen, accent);
    let lines = vec![
        point.species.label().to_string(),
        format!("{}: {:.1}", config.x.label(), point.x),
        format!("{}: {:.1}", config.y.label(), point.y),
    ];
    tooltip::draw_tooltip(&painter, response.response.rect, screen, accent, &lines);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sl: f64, sw: f64, species: Species) -> IrisRecord {
        IrisRecord {
            sepal_length: sl,
            sepal_width: sw,
            petal_length: 1.0,
            petal_width: 0.2,
            species,
        }
    }

    #[test]
    fn drops_rows_at_origin() {
        let records = vec![
            record(5.1, 3.5, Species::Setosa),
            record(0.0, 0.0, Species::Setosa),
            record(0.0, 2.0, Species::Versicolor),
        ];
        let derived = build_scatter(&records, &ScatterConfig::default());
        assert_eq!(derived.points.len(), 2);
        assert_eq!(derived.dropped, 1);
    }

    #[test]
    fn summaries_follow_chosen_axes() {
        let records = vec![
            record(4.0, 2.0, Species::Setosa),
            record(6.0, 4.0, Species::Virginica),
        ];
        let config = ScatterConfig::default();
        let derived = build_scatter(&records, &config);
        let x = derived.x_summary.unwrap();
        assert_eq!(x.count, 2);
        assert!((x.mean - 5.0).abs() < 1e-9);
        let y = derived.y_summary.unwrap();
        assert!((y.mean - 3.0).abs() < 1e-9);
    }

    #[test]
    fn nearest_uses_normalized_distance() {
        // x spans 0..100, y spans 0..1; without normalization the x
        // axis would swamp the lookup.
        let records = vec![
            record(0.0, 1.0, Species::Setosa),
            record(100.0, 0.0, Species::Virginica),
        ];
        let derived = build_scatter(&records, &ScatterConfig::default());
        let (idx, _) = derived.nearest(10.0, 0.9).unwrap();
        assert_eq!(idx, 0);
        let (idx, _) = derived.nearest(90.0, 0.1).unwrap();
        assert_eq!(idx, 1);
    }

    #[test]
    fn empty_records_build_empty_derivation() {
        let derived = build_scatter(&[], &ScatterConfig::default());
        assert!(derived.points.is_empty());
        assert!(derived.x_summary.is_none());
        assert!(derived.nearest(0.5, 0.5).is_none());
    }
}
