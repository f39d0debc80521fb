use egui::{Align2, Color32, FontId, RichText, Sense, Stroke, StrokeKind, Ui, Vec2};

use crate::color;
use crate::data::datasets::{AbaloneField, AbaloneRecord, ParsedDataset, Sex};
use crate::processing::statistics;
use crate::state::cache::{self, DerivedSlot};
use crate::state::theme::Theme;
use crate::ui::controls;
use crate::ui::scatter::empty_hint;
use crate::ui::tooltip;

const FIELDS: usize = 8;
const LABEL_W: f32 = 96.0;
const HEADER_H: f32 = 20.0;

/// Which sexes to show matrices for.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapConfig {
    pub visible: [bool; 3],
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self { visible: [true; 3] }
    }
}

/// A correlation cell. Pairs involving a zero-variance column have no
/// defined coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Defined(f64),
    Undefined,
}

/// 8x8 correlation matrix for one sex, row-major over
/// [`AbaloneField::ALL`].
pub struct SexMatrix {
    pub sex: Sex,
    pub n: usize,
    pub cells: Vec<CellValue>,
}

impl SexMatrix {
    pub fn cell(&self, row: usize, col: usize) -> CellValue {
        self.cells[row * FIELDS + col]
    }
}

pub struct HeatmapDerived {
    pub matrices: Vec<SexMatrix>,
}

/// Pearson matrices per sex. The diagonal is pinned to 1 rather than
/// computed, so it stays exact even for single-row groups.
pub fn build_heatmap(records: &[AbaloneRecord]) -> HeatmapDerived {
    let matrices = Sex::ALL
        .iter()
        .map(|&sex| {
            let members: Vec<&AbaloneRecord> = records.iter().filter(|r| r.sex == sex).collect();
            let columns: Vec<Vec<f64>> = AbaloneField::ALL
                .iter()
                .map(|field| members.iter().map(|r| field.value(r)).collect())
                .collect();

            let mut cells = Vec::with_capacity(FIELDS * FIELDS);
            for i in 0..FIELDS {
                for j in 0..FIELDS {
                    let cell = if i == j {
                        CellValue::Defined(1.0)
                    } else {
                        match statistics::pearson(&columns[i], &columns[j]) {
                            Ok(r) => CellValue::Defined(r),
                            Err(_) => CellValue::Undefined,
                        }
                    };
                    cells.push(cell);
                }
            }
            SexMatrix {
                sex,
                n: members.len(),
                cells,
            }
        })
        .collect();
    HeatmapDerived { matrices }
}

/// Correlation heatmaps over the abalone measurements, one matrix per
/// sex in the sex's own color ramp.
pub struct HeatmapView {
    records: Vec<AbaloneRecord>,
    version: u64,
    config: HeatmapConfig,
    derived: DerivedSlot<HeatmapConfig, HeatmapDerived>,
}

impl HeatmapView {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            version: 0,
            config: HeatmapConfig::default(),
            derived: None,
        }
    }

    pub fn set_dataset(&mut self, data: ParsedDataset<AbaloneRecord>) {
        self.records = data.records;
        self.version = self.version.wrapping_add(1);
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn ui(&mut self, ui: &mut Ui, theme: Theme) {
        if self.records.is_empty() {
            empty_hint(ui, "No abalone data loaded. Open a CSV or drop one onto the window.");
            return;
        }

        ui.horizontal(|ui| {
            for (i, sex) in Sex::ALL.iter().enumerate() {
                controls::series_checkbox(
                    ui,
                    &mut self.config.visible[i],
                    sex.label(),
                    color::shade(color::sex_hue(*sex), 0.8),
                );
            }
        });

        let derived = cache::memoize(&mut self.derived, self.version, &self.config, || {
            build_heatmap(&self.records)
        });
        let visible = self.config.visible;

        egui::ScrollArea::vertical()
            .id_salt("heatmap_scroll")
            .show(ui, |ui| {
                for (i, matrix) in derived.matrices.iter().enumerate() {
                    if !visible[i] {
                        continue;
                    }
                    draw_matrix(ui, theme, matrix);
                    ui.add_space(12.0);
                }
            });
    }
}

/// Cell annotation: the coefficient to two decimals, or a dash where
/// it is undefined.
fn cell_label(value: CellValue) -> String {
    match value {
        CellValue::Defined(r) => format!("{r:.2}"),
        CellValue::Undefined => "–".to_string(),
    }
}

fn cell_fill(sex: Sex, value: CellValue, theme: Theme) -> (Color32, Color32) {
    match value {
        CellValue::Defined(r) => {
            let t = ((r + 1.0) / 2.0) as f32;
            let fill = color::shade(color::sex_hue(sex), t);
            let text = if t > 0.6 {
                Color32::WHITE
            } else {
                Color32::from_rgb(30, 30, 30)
            };
            (fill, text)
        }
        CellValue::Undefined => (theme.grid_color(), theme.axis_color()),
    }
}

fn draw_matrix(ui: &mut Ui, theme: Theme, matrix: &SexMatrix) {
    ui.label(
        RichText::new(format!("{} (n = {})", matrix.sex.label(), matrix.n))
            .color(color::shade(color::sex_hue(matrix.sex), 0.8))
            .strong(),
    );

    let cell = ((ui.available_width() - LABEL_W) / FIELDS as f32).clamp(34.0, 56.0);
    let size = Vec2::new(LABEL_W + FIELDS as f32 * cell, HEADER_H + FIELDS as f32 * cell);
    let (id, rect) = ui.allocate_space(size);
    let response = ui.interact(rect, id, Sense::hover());
    let painter = ui.painter_at(rect);

    let grid_left = rect.left() + LABEL_W;
    let grid_top = rect.top() + HEADER_H;
    let small = FontId::proportional(10.0);

    for (j, field) in AbaloneField::ALL.iter().enumerate() {
        painter.text(
            egui::pos2(grid_left + (j as f32 + 0.5) * cell, rect.top() + HEADER_H / 2.0),
            Align2::CENTER_CENTER,
            field.short_label(),
            small.clone(),
            theme.axis_color(),
        );
    }

    let hovered = response.hover_pos().and_then(|p| {
        let col = ((p.x - grid_left) / cell).floor();
        let row = ((p.y - grid_top) / cell).floor();
        if (0.0..FIELDS as f32).contains(&col) && (0.0..FIELDS as f32).contains(&row) {
            Some((row as usize, col as usize))
        } else {
            None
        }
    });

    for (i, field) in AbaloneField::ALL.iter().enumerate() {
        painter.text(
            egui::pos2(grid_left - 6.0, grid_top + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            field.label(),
            small.clone(),
            theme.axis_color(),
        );
        for j in 0..FIELDS {
            let cell_rect = egui::Rect::from_min_size(
                egui::pos2(grid_left + j as f32 * cell, grid_top + i as f32 * cell),
                Vec2::splat(cell),
            )
            .shrink(0.5);
            let value = matrix.cell(i, j);
            let (fill, text_color) = cell_fill(matrix.sex, value, theme);
            painter.rect_filled(cell_rect, 1.0, fill);

            let is_hovered = hovered == Some((i, j));
            let text = cell_label(value);
            let font = if is_hovered {
                FontId::proportional(11.0)
            } else {
                FontId::proportional(9.0)
            };
            painter.text(cell_rect.center(), Align2::CENTER_CENTER, text, font, text_color);
            if is_hovered {
                painter.rect_stroke(
                    cell_rect,
                    1.0,
                    Stroke::new(1.5, theme.text_color()),
                    StrokeKind::Outside,
                );
            }
        }
    }

    if let Some((i, j)) = hovered {
        let accent = color::shade(color::sex_hue(matrix.sex), 0.8);
        let anchor = egui::pos2(
            grid_left + (j as f32 + 0.5) * cell,
            grid_top + i as f32 * cell,
        );
        let value_line = match matrix.cell(i, j) {
            CellValue::Defined(r) => format!("r = {r:.3}"),
            CellValue::Undefined => "r undefined (zero variance)".to_string(),
        };
        let lines = vec![
            format!(
                "{} x {}",
                AbaloneField::ALL[i].label(),
                AbaloneField::ALL[j].label()
            ),
            value_line,
            format!("n = {}", matrix.n),
        ];
        tooltip::draw_tooltip(&painter, rect, anchor, accent, &lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sex: Sex, length: f64, rings: f64) -> AbaloneRecord {
        AbaloneRecord {
            sex,
            length,
            diameter: length * 0.8,
            height: 0.1,
            whole_weight: length * 2.0,
            shucked_weight: length,
            viscera_weight: length * 0.5,
            shell_weight: length * 0.3,
            rings,
        }
    }

    #[test]
    fn diagonal_is_pinned_to_one() {
        let records = vec![
            record(Sex::Male, 0.4, 8.0),
            record(Sex::Male, 0.5, 10.0),
        ];
        let derived = build_heatmap(&records);
        let male = &derived.matrices[0];
        for i in 0..FIELDS {
            assert_eq!(male.cell(i, i), CellValue::Defined(1.0));
        }
    }

    #[test]
    fn constant_column_yields_undefined_off_diagonal() {
        // height is constant in the fixture
        let records = vec![
            record(Sex::Female, 0.3, 6.0),
            record(Sex::Female, 0.6, 12.0),
        ];
        let derived = build_heatmap(&records);
        let female = &derived.matrices[1];
        let height_idx = 2;
        assert_eq!(female.cell(height_idx, 0), CellValue::Undefined);
        assert_eq!(female.cell(0, height_idx), CellValue::Undefined);
        assert_eq!(female.cell(height_idx, height_idx), CellValue::Defined(1.0));
    }

    #[test]
    fn proportional_columns_correlate_perfectly() {
        let records = vec![
            record(Sex::Infant, 0.2, 4.0),
            record(Sex::Infant, 0.4, 8.0),
            record(Sex::Infant, 0.6, 12.0),
        ];
        let derived = build_heatmap(&records);
        let infant = &derived.matrices[2];
        // length vs diameter are proportional in the fixture
        match infant.cell(0, 1) {
            CellValue::Defined(r) => assert!((r - 1.0).abs() < 1e-9),
            CellValue::Undefined => panic!("expected a defined coefficient"),
        }
    }

    #[test]
    fn groups_split_by_sex() {
        let records = vec![
            record(Sex::Male, 0.4, 8.0),
            record(Sex::Female, 0.5, 9.0),
            record(Sex::Male, 0.6, 10.0),
        ];
        let derived = build_heatmap(&records);
        assert_eq!(derived.matrices[0].n, 2);
        assert_eq!(derived.matrices[1].n, 1);
        assert_eq!(derived.matrices[2].n, 0);
    }

    #[test]
    fn undefined_cells_annotate_with_a_dash() {
        assert_eq!(cell_label(CellValue::Undefined), "–");
        assert_eq!(cell_label(CellValue::Defined(0.5)), "0.50");
        assert_eq!(cell_label(CellValue::Defined(-0.25)), "-0.25");
    }
}
