use egui::{Align2, FontId, Shape, Stroke, Ui, Vec2};

use crate::color;
use crate::data::datasets::{IrisField, IrisRecord, ParsedDataset, Species};
use crate::state::cache::{self, DerivedSlot};
use crate::state::theme::Theme;
use crate::ui::controls;
use crate::ui::scatter::empty_hint;

/// Axis slots and species visibility for the parallel-coordinates
/// chart. All slots start empty; only assigned slots are drawn, in
/// slot order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelConfig {
    pub axes: [Option<IrisField>; 4],
    pub visible: [bool; 3],
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            axes: [None; 4],
            visible: [true; 3],
        }
    }
}

#[derive(Debug, Clone)]
pub struct AxisInfo {
    pub field: IrisField,
    pub min: f64,
    pub max: f64,
}

/// One record as normalized positions along the chosen axes, 0 at the
/// axis minimum and 1 at the maximum.
#[derive(Debug, Clone)]
pub struct PolyLine {
    pub species: Species,
    pub t: Vec<f64>,
}

pub struct ParallelDerived {
    pub axes: Vec<AxisInfo>,
    pub lines: Vec<PolyLine>,
}

pub fn build_parallel(records: &[IrisRecord], config: &ParallelConfig) -> ParallelDerived {
    let fields: Vec<IrisField> = config.axes.iter().flatten().copied().collect();

    let axes: Vec<AxisInfo> = fields
        .iter()
        .map(|&field| {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for record in records {
                let v = field.value(record);
                min = min.min(v);
                max = max.max(v);
            }
            if min > max {
                min = 0.0;
                max = 1.0;
            }
            AxisInfo { field, min, max }
        })
        .collect();

    let lines = records
        .iter()
        .map(|record| {
            let t = axes
                .iter()
                .map(|axis| {
                    let span = axis.max - axis.min;
                    if span > 0.0 {
                        (axis.field.value(record) - axis.min) / span
                    } else {
                        0.5
                    }
                })
                .collect();
            PolyLine {
                species: record.species,
                t,
            }
        })
        .collect();

    ParallelDerived { axes, lines }
}

fn species_index(species: Species) -> usize {
    Species::ALL.iter().position(|&s| s == species).unwrap_or(0)
}

/// Parallel-coordinates chart over the iris measurements.
pub struct ParallelView {
    records: Vec<IrisRecord>,
    version: u64,
    config: ParallelConfig,
    derived: DerivedSlot<ParallelConfig, ParallelDerived>,
}

impl ParallelView {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            version: 0,
            config: ParallelConfig::default(),
            derived: None,
        }
    }

    pub fn set_dataset(&mut self, data: ParsedDataset<IrisRecord>) {
        self.records = data.records;
        self.version = self.version.wrapping_add(1);
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn ui(&mut self, ui: &mut Ui, theme: Theme) {
        if self.records.is_empty() {
            empty_hint(ui, "No iris data loaded. Open a CSV or drop one onto the window.");
            return;
        }

        ui.horizontal_wrapped(|ui| {
            for (slot, axis) in self.config.axes.iter_mut().enumerate() {
                controls::optional_combo(
                    ui,
                    &format!("parallel_axis_{slot}"),
                    "(none)",
                    axis,
                    &IrisField::ALL,
                    |f| f.label().to_string(),
                );
            }
            ui.separator();
            for (i, species) in Species::ALL.iter().enumerate() {
                controls::series_checkbox(
                    ui,
                    &mut self.config.visible[i],
                    species.label(),
                    color::species_color(*species),
                );
            }
        });

        if self.config.axes.iter().all(|a| a.is_none()) {
            empty_hint(ui, "Choose at least one axis.");
            return;
        }

        let derived = cache::memoize(&mut self.derived, self.version, &self.config, || {
            build_parallel(&self.records, &self.config)
        });
        draw_parallel(ui, theme, &self.config, derived);
    }
}

fn draw_parallel(ui: &mut Ui, theme: Theme, config: &ParallelConfig, derived: &ParallelDerived) {
    let desired = Vec2::new(ui.available_width(), ui.available_height().max(320.0));
    let (_, rect) = ui.allocate_space(desired);
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 4.0, theme.plot_bg());

    let left = rect.left() + 36.0;
    let right = rect.right() - 36.0;
    let top = rect.top() + 30.0;
    let bottom = rect.bottom() - 16.0;
    let n = derived.axes.len();

    let axis_x = |i: usize| -> f32 {
        if n <= 1 {
            (left + right) / 2.0
        } else {
            left + (right - left) * i as f32 / (n - 1) as f32
        }
    };

    // polylines first, axes drawn on top
    for line in &derived.lines {
        if !config.visible[species_index(line.species)] {
            continue;
        }
        let stroke_color = color::species_color(line.species).gamma_multiply(0.75);
        let points: Vec<egui::Pos2> = line
            .t
            .iter()
            .enumerate()
            .map(|(i, &t)| egui::pos2(axis_x(i), bottom - (bottom - top) * t as f32))
            .collect();
        if points.len() == 1 {
            painter.circle_filled(points[0], 2.0, stroke_color);
        } else {
            painter.add(Shape::line(points, Stroke::new(1.0, stroke_color)));
        }
    }

    let font = FontId::proportional(10.0);
    let title_font = FontId::proportional(12.0);
    for (i, axis) in derived.axes.iter().enumerate() {
        let x = axis_x(i);
        painter.line_segment(
            [egui::pos2(x, top), egui::pos2(x, bottom)],
            Stroke::new(1.0, theme.axis_color()),
        );
        painter.text(
            egui::pos2(x, top - 16.0),
            Align2::CENTER_CENTER,
            axis.field.label(),
            title_font.clone(),
            theme.text_color(),
        );
        for step in 0..=4 {
            let t = step as f32 / 4.0;
            let y = bottom - (bottom - top) * t;
            let value = axis.min + (axis.max - axis.min) * t as f64;
            painter.line_segment(
                [egui::pos2(x - 3.0, y), egui::pos2(x, y)],
                Stroke::new(1.0, theme.axis_color()),
            );
            painter.text(
                egui::pos2(x - 5.0, y),
                Align2::RIGHT_CENTER,
                format!("{value:.1}"),
                font.clone(),
                theme.axis_color(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sl: f64, sw: f64, pl: f64, pw: f64, species: Species) -> IrisRecord {
        IrisRecord {
            sepal_length: sl,
            sepal_width: sw,
            petal_length: pl,
            petal_width: pw,
            species,
        }
    }

    #[test]
    fn skips_empty_axis_slots_in_order() {
        let records = vec![record(5.0, 3.0, 1.5, 0.2, Species::Setosa)];
        let config = ParallelConfig {
            axes: [None, Some(IrisField::PetalWidth), None, Some(IrisField::SepalLength)],
            visible: [true; 3],
        };
        let derived = build_parallel(&records, &config);
        assert_eq!(derived.axes.len(), 2);
        assert_eq!(derived.axes[0].field, IrisField::PetalWidth);
        assert_eq!(derived.axes[1].field, IrisField::SepalLength);
        assert_eq!(derived.lines[0].t.len(), 2);
    }

    fn all_axes() -> ParallelConfig {
        ParallelConfig {
            axes: [
                Some(IrisField::SepalLength),
                Some(IrisField::SepalWidth),
                Some(IrisField::PetalLength),
                Some(IrisField::PetalWidth),
            ],
            visible: [true; 3],
        }
    }

    #[test]
    fn axis_slots_start_unset() {
        let config = ParallelConfig::default();
        assert_eq!(config.axes, [None; 4]);

        // nothing is drawn until the user assigns an axis
        let records = vec![record(5.0, 3.0, 1.5, 0.2, Species::Setosa)];
        let derived = build_parallel(&records, &config);
        assert!(derived.axes.is_empty());
        assert!(derived.lines.iter().all(|l| l.t.is_empty()));
    }

    #[test]
    fn normalizes_to_axis_extent() {
        let records = vec![
            record(4.0, 2.0, 1.0, 0.1, Species::Setosa),
            record(8.0, 4.0, 7.0, 2.5, Species::Virginica),
            record(6.0, 3.0, 4.0, 1.3, Species::Versicolor),
        ];
        let derived = build_parallel(&records, &all_axes());
        assert!((derived.axes[0].min - 4.0).abs() < 1e-9);
        assert!((derived.axes[0].max - 8.0).abs() < 1e-9);
        assert!((derived.lines[0].t[0] - 0.0).abs() < 1e-9);
        assert!((derived.lines[1].t[0] - 1.0).abs() < 1e-9);
        assert!((derived.lines[2].t[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_extent_centers_lines() {
        let records = vec![
            record(5.0, 3.0, 1.0, 0.2, Species::Setosa),
            record(5.0, 3.5, 1.2, 0.2, Species::Setosa),
        ];
        let config = ParallelConfig {
            axes: [Some(IrisField::SepalLength), None, None, None],
            visible: [true; 3],
        };
        let derived = build_parallel(&records, &config);
        assert!((derived.lines[0].t[0] - 0.5).abs() < 1e-9);
        assert!((derived.lines[1].t[0] - 0.5).abs() < 1e-9);
    }
}
