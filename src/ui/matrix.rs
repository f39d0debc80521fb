use std::collections::HashSet;

use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Stroke, StrokeKind, Ui, Vec2};

use crate::color;
use crate::data::datasets::{IrisField, IrisRecord, ParsedDataset, Species};
use crate::processing::brush::{self, BrushRect, LinearScale, PointEmphasis};
use crate::processing::histogram::{self, Bin};
use crate::processing::statistics;
use crate::state::cache::{self, DerivedSlot};
use crate::state::theme::Theme;
use crate::ui::scatter::empty_hint;

const FIELDS: usize = 4;
const CELL_GAP: f32 = 6.0;
const CELL_PAD: f32 = 5.0;

/// Correlations this close to zero display as exactly zero.
const CORR_SNAP: f64 = 0.001;

/// Values this close to zero are placeholder entries; a cell leaves
/// out every pair that touches one.
const ZERO_EPS: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixConfig {
    pub bins: usize,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self { bins: 20 }
    }
}

#[derive(Debug, Clone)]
pub struct MatrixRow {
    pub values: [f64; FIELDS],
    pub species: Species,
}

pub struct MatrixDerived {
    /// Parsed rows minus all-zero placeholder entries.
    pub rows: Vec<MatrixRow>,
    /// Per-field extents over the non-placeholder values.
    pub extents: [(f64, f64); FIELDS],
    pub histograms: Vec<Vec<Bin>>,
    /// Pairwise correlations; `None` where a column has zero variance.
    pub correlations: [[Option<f64>; FIELDS]; FIELDS],
}

/// Rows usable in the cell plotting field `j` against field `i`, with
/// their ids in `rows`. A pair touching a near-zero placeholder value
/// stays out of that cell only.
fn cell_rows(
    rows: &[MatrixRow],
    cell: (usize, usize),
) -> impl Iterator<Item = (usize, &MatrixRow)> {
    let (i, j) = cell;
    rows.iter()
        .enumerate()
        .filter(move |(_, r)| r.values[j].abs() > ZERO_EPS && r.values[i].abs() > ZERO_EPS)
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

pub fn build_matrix(records: &[IrisRecord], config: &MatrixConfig) -> MatrixDerived {
    let rows: Vec<MatrixRow> = records
        .iter()
        .map(|r| MatrixRow {
            values: [
                IrisField::ALL[0].value(r),
                IrisField::ALL[1].value(r),
                IrisField::ALL[2].value(r),
                IrisField::ALL[3].value(r),
            ],
            species: r.species,
        })
        .filter(|row| row.values.iter().any(|v| v.abs() > ZERO_EPS))
        .collect();

    let columns: Vec<Vec<f64>> = (0..FIELDS)
        .map(|i| {
            rows.iter()
                .map(|r| r.values[i])
                .filter(|v| v.abs() > ZERO_EPS)
                .collect()
        })
        .collect();

    let mut extents = [(0.0, 1.0); FIELDS];
    let mut histograms = Vec::with_capacity(FIELDS);
    for (i, column) in columns.iter().enumerate() {
        extents[i] = extent(column);
        histograms.push(histogram::histogram(column, config.bins));
    }

    let mut correlations = [[None; FIELDS]; FIELDS];
    for i in 0..FIELDS {
        for j in 0..FIELDS {
            correlations[i][j] = if i == j {
                Some(1.0)
            } else {
                let (a, b): (Vec<f64>, Vec<f64>) = cell_rows(&rows, (i, j))
                    .map(|(_, r)| (r.values[j], r.values[i]))
                    .unzip();
                statistics::pearson(&a, &b)
                    .ok()
                    .map(|r| if r.abs() <= CORR_SNAP { 0.0 } else { r })
            };
        }
    }

    MatrixDerived {
        rows,
        extents,
        histograms,
        correlations,
    }
}

struct ActiveBrush {
    cell: (usize, usize),
    origin: Pos2,
    current: Pos2,
}

/// 4x4 iris scatter matrix with rectangle brushing. A brush in any
/// off-diagonal cell selects rows; every other cell echoes the
/// selection by dimming the rest.
pub struct MatrixView {
    records: Vec<IrisRecord>,
    version: u64,
    config: MatrixConfig,
    derived: DerivedSlot<MatrixConfig, MatrixDerived>,
    selection: HashSet<usize>,
    brush: Option<ActiveBrush>,
}

impl MatrixView {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            version: 0,
            config: MatrixConfig::default(),
            derived: None,
            selection: HashSet::new(),
            brush: None,
        }
    }

    pub fn set_dataset(&mut self, data: ParsedDataset<IrisRecord>) {
        self.records = data.records;
        self.version = self.version.wrapping_add(1);
        self.selection.clear();
        self.brush = None;
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn ui(&mut self, ui: &mut Ui, theme: Theme) {
        if self.records.is_empty() {
            empty_hint(ui, "No iris data loaded. Open a CSV or drop one onto the window.");
            return;
        }

        let derived = cache::memoize(&mut self.derived, self.version, &self.config, || {
            build_matrix(&self.records, &self.config)
        });

        ui.horizontal(|ui| {
            if ui.button("Clear selection").clicked() {
                self.selection.clear();
                self.brush = None;
            }
            let text = if self.selection.is_empty() {
                "drag in any panel to select".to_string()
            } else {
                format!("{} of {} selected", self.selection.len(), derived.rows.len())
            };
            ui.label(RichText::new(text).weak());
        });

        let side = ui.available_width().min(ui.available_height()).max(240.0);
        let (grid_id, grid_rect) = ui.allocate_space(Vec2::splat(side));
        let cell = (side - CELL_GAP * (FIELDS as f32 - 1.0)) / FIELDS as f32;

        for i in 0..FIELDS {
            for j in 0..FIELDS {
                let cell_rect = Rect::from_min_size(
                    egui::pos2(
                        grid_rect.left() + j as f32 * (cell + CELL_GAP),
                        grid_rect.top() + i as f32 * (cell + CELL_GAP),
                    ),
                    Vec2::splat(cell),
                );

                if i == j {
                    draw_histogram_cell(ui, theme, cell_rect, i, derived);
                } else {
                    let id = grid_id.with(("cell", i, j));
                    let response = ui.interact(cell_rect, id, Sense::click_and_drag());
                    handle_brush(
                        &response,
                        (i, j),
                        cell_rect,
                        derived,
                        &mut self.selection,
                        &mut self.brush,
                    );
                    draw_scatter_cell(
                        ui,
                        theme,
                        cell_rect,
                        (i, j),
                        derived,
                        &self.selection,
                        self.brush.as_ref(),
                    );
                }
            }
        }
    }
}

fn handle_brush(
    response: &egui::Response,
    cell: (usize, usize),
    cell_rect: Rect,
    derived: &MatrixDerived,
    selection: &mut HashSet<usize>,
    brush: &mut Option<ActiveBrush>,
) {
    if response.drag_started() {
        if let Some(p) = response.interact_pointer_pos() {
            *brush = Some(ActiveBrush {
                cell,
                origin: p,
                current: p,
            });
        }
    }

    let dragging_here = matches!(brush, Some(b) if b.cell == cell);
    if dragging_here && (response.dragged() || response.drag_stopped()) {
        if let Some(p) = response.interact_pointer_pos() {
            if let Some(b) = brush.as_mut() {
                b.current = p.clamp(cell_rect.min, cell_rect.max);
            }
        }
        if let Some(b) = brush.as_ref() {
            let rect = BrushRect::from_drag((b.origin.x, b.origin.y), (b.current.x, b.current.y));
            let (xs, ys) = cell_scales(cell_rect, cell, derived);
            let mut ids = Vec::new();
            let mut points = Vec::new();
            for (id, row) in cell_rows(&derived.rows, cell) {
                ids.push(id);
                points.push((row.values[cell.1], row.values[cell.0]));
            }
            let picked = brush::select(&points, &xs, &ys, &rect);
            *selection = picked.into_iter().map(|k| ids[k]).collect();
        }
        if response.drag_stopped() {
            *brush = None;
        }
    }

    // a bare click clears the selection, matching the empty-brush rule
    if response.clicked() {
        selection.clear();
        *brush = None;
    }
}

fn cell_scales(cell_rect: Rect, cell: (usize, usize), derived: &MatrixDerived) -> (LinearScale, LinearScale) {
    let (i, j) = cell;
    let xs = LinearScale::new(
        derived.extents[j],
        (cell_rect.left() + CELL_PAD, cell_rect.right() - CELL_PAD),
    );
    let ys = LinearScale::new(
        derived.extents[i],
        (cell_rect.bottom() - CELL_PAD, cell_rect.top() + CELL_PAD),
    );
    (xs, ys)
}

fn draw_histogram_cell(ui: &Ui, theme: Theme, rect: Rect, field: usize, derived: &MatrixDerived) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 2.0, theme.plot_bg());
    painter.rect_stroke(rect, 2.0, Stroke::new(1.0, theme.grid_color()), StrokeKind::Inside);

    painter.text(
        rect.left_top() + Vec2::new(6.0, 5.0),
        Align2::LEFT_TOP,
        IrisField::ALL[field].label(),
        FontId::proportional(11.0),
        theme.text_color(),
    );

    let bins = &derived.histograms[field];
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);
    if max_count == 0 {
        return;
    }

    let xs = LinearScale::new(
        derived.extents[field],
        (rect.left() + CELL_PAD, rect.right() - CELL_PAD),
    );
    let base = rect.bottom() - CELL_PAD;
    let usable = rect.height() - 22.0 - CELL_PAD;
    let fill = Color32::from_rgb(100, 140, 190).gamma_multiply(0.85);
    for bin in bins {
        let x0 = xs.apply(bin.x0);
        let x1 = xs.apply(bin.x1);
        let h = usable * bin.count as f32 / max_count as f32;
        let bar = Rect::from_min_max(egui::pos2(x0 + 0.5, base - h), egui::pos2(x1 - 0.5, base));
        if bar.width() > 0.0 && bar.height() > 0.0 {
            painter.rect_filled(bar, 0.0, fill);
        }
    }
}

fn draw_scatter_cell(
    ui: &Ui,
    theme: Theme,
    rect: Rect,
    cell: (usize, usize),
    derived: &MatrixDerived,
    selection: &HashSet<usize>,
    active: Option<&ActiveBrush>,
) {
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 2.0, theme.plot_bg());
    painter.rect_stroke(rect, 2.0, Stroke::new(1.0, theme.grid_color()), StrokeKind::Inside);

    let (i, j) = cell;
    let (xs, ys) = cell_scales(rect, cell, derived);

    for (id, row) in cell_rows(&derived.rows, cell) {
        let pos = egui::pos2(xs.apply(row.values[j]), ys.apply(row.values[i]));
        match brush::emphasis(id, selection) {
            PointEmphasis::Normal => {
                painter.circle_filled(pos, 2.0, color::species_color(row.species).gamma_multiply(0.75));
            }
            PointEmphasis::Selected => {
                painter.circle_filled(pos, 3.0, color::species_color(row.species));
            }
            PointEmphasis::Dimmed => {
                painter.circle_filled(pos, 2.0, Color32::from_rgb(120, 120, 120).gamma_multiply(0.35));
            }
        }
    }

    if let Some(r) = derived.correlations[i][j] {
        painter.text(
            rect.right_top() + Vec2::new(-5.0, 4.0),
            Align2::RIGHT_TOP,
            format!("r={r:.2}"),
            FontId::proportional(9.0),
            theme.axis_color(),
        );
    }

    if let Some(b) = active.filter(|b| b.cell == cell) {
        let brush_rect = Rect::from_two_pos(b.origin, b.current);
        painter.rect_filled(brush_rect, 0.0, Color32::from_rgba_unmultiplied(120, 160, 255, 28));
        painter.rect_stroke(
            brush_rect,
            0.0,
            Stroke::new(1.0, Color32::from_rgb(120, 160, 255)),
            StrokeKind::Inside,
        );
    }
}
