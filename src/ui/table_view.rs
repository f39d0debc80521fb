use std::cell::Cell;
use std::cmp::Ordering;

use egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::table::DataTable;
use crate::state::app_state::SortDirection;

fn cycle_sort(sort: &mut Option<(usize, SortDirection)>, col: usize) {
    *sort = match *sort {
        Some((c, SortDirection::Ascending)) if c == col => Some((col, SortDirection::Descending)),
        Some((c, SortDirection::Descending)) if c == col => None,
        _ => Some((col, SortDirection::Ascending)),
    };
}

/// Compare two cells numerically when both parse, otherwise as text.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

/// Sortable raw view of the loaded CSV.
pub struct TableView {
    sort: Option<(usize, SortDirection)>,
}

impl TableView {
    pub fn new() -> Self {
        Self { sort: None }
    }

    pub fn reset(&mut self) {
        self.sort = None;
    }

    pub fn ui(&mut self, ui: &mut Ui, table: &DataTable) {
        if table.columns.is_empty() {
            ui.label("No data loaded.");
            return;
        }

        let num_cols = table.columns.len();
        let row_count = table.row_count;
        let current_sort = self.sort;

        let sorted_indices: Vec<usize> = match current_sort {
            Some((col, dir)) => {
                let mut indices: Vec<usize> = (0..row_count).collect();
                indices.sort_by(|&a, &b| {
                    let cell_a = table.cell(col, a).unwrap_or("");
                    let cell_b = table.cell(col, b).unwrap_or("");
                    let cmp = compare_cells(cell_a, cell_b);
                    match dir {
                        SortDirection::Ascending => cmp,
                        SortDirection::Descending => cmp.reverse(),
                    }
                });
                indices
            }
            None => (0..row_count).collect(),
        };

        let clicked_col: Cell<Option<usize>> = Cell::new(None);

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(90.0), num_cols)
            .min_scrolled_height(300.0)
            .header(20.0, |mut header| {
                for (col_idx, name) in table.columns.iter().enumerate() {
                    header.col(|ui| {
                        let arrow = match current_sort {
                            Some((c, SortDirection::Ascending)) if c == col_idx => " ^",
                            Some((c, SortDirection::Descending)) if c == col_idx => " v",
                            _ => "",
                        };
                        if ui.button(format!("{name}{arrow}")).clicked() {
                            clicked_col.set(Some(col_idx));
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, row_count, |mut row| {
                    let source_row = sorted_indices[row.index()];
                    for col_idx in 0..num_cols {
                        row.col(|ui| {
                            let text = table.cell(col_idx, source_row).unwrap_or("-");
                            ui.label(if text.is_empty() { "-" } else { text });
                        });
                    }
                });
            });

        if let Some(col) = clicked_col.get() {
            cycle_sort(&mut self.sort, col);
        }
    }
}
