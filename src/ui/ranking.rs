use std::ops::RangeInclusive;
use std::sync::Arc;

use egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot};

use crate::color;
use crate::data::datasets::{ParsedDataset, RankingRecord, ScoreCategory};
use crate::processing::stack::{self, Baseline};
use crate::state::app_state::SortDirection;
use crate::state::cache::{self, DerivedSlot};
use crate::ui::controls;
use crate::ui::scatter::empty_hint;

const ROW_HEIGHT: f32 = 16.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    pub category: ScoreCategory,
    pub direction: SortDirection,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            category: ScoreCategory::Overall,
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankedBar {
    pub university: String,
    pub total: f64,
    /// (category, lower, upper) in layer order.
    pub segments: Vec<(ScoreCategory, f64, f64)>,
}

pub struct RankingDerived {
    /// Drawing order of the stacked layers.
    pub layers: Vec<ScoreCategory>,
    pub bars: Vec<RankedBar>,
}

/// Sort universities by the chosen category and stack the overall view
/// from its five subscores. Ties keep file order.
pub fn build_ranking(records: &[RankingRecord], config: &RankingConfig) -> RankingDerived {
    let mut order: Vec<&RankingRecord> = records.iter().collect();
    order.sort_by(|a, b| {
        let ord = config
            .category
            .value(a)
            .partial_cmp(&config.category.value(b))
            .unwrap_or(std::cmp::Ordering::Equal);
        match config.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    let layers: Vec<ScoreCategory> = match config.category {
        ScoreCategory::Overall => ScoreCategory::SUBSCORES.to_vec(),
        cat => vec![cat],
    };

    let xs: Vec<f64> = (0..order.len()).map(|i| i as f64).collect();
    let series: Vec<(ScoreCategory, Vec<f64>)> = layers
        .iter()
        .map(|&c| (c, order.iter().map(|r| c.value(r)).collect()))
        .collect();
    let stacked = stack::stack(&xs, &series, Baseline::Zero);

    let bars = order
        .iter()
        .enumerate()
        .map(|(k, r)| RankedBar {
            university: r.university.clone(),
            total: config.category.value(r),
            segments: stacked
                .iter()
                .map(|layer| (layer.key, layer.bands[k].lower, layer.bands[k].upper))
                .collect(),
        })
        .collect();

    RankingDerived { layers, bars }
}

/// Ranked horizontal bars over university scores. The overall category
/// stacks its five subscores; any other category draws plain bars.
pub struct RankingView {
    records: Vec<RankingRecord>,
    skipped: usize,
    version: u64,
    config: RankingConfig,
    derived: DerivedSlot<RankingConfig, RankingDerived>,
}

impl RankingView {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
            version: 0,
            config: RankingConfig::default(),
            derived: None,
        }
    }

    pub fn set_dataset(&mut self, data: ParsedDataset<RankingRecord>) {
        self.records = data.records;
        self.skipped = data.skipped;
        self.version = self.version.wrapping_add(1);
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        if self.records.is_empty() {
            empty_hint(ui, "No ranking data loaded. Open a CSV or drop one onto the window.");
            return;
        }

        ui.horizontal(|ui| {
            controls::enum_combo(
                ui,
                "ranking_category",
                "Score",
                &mut self.config.category,
                &ScoreCategory::ALL,
                |c| c.label().to_string(),
            );
            controls::enum_combo(
                ui,
                "ranking_direction",
                "Sort",
                &mut self.config.direction,
                &[SortDirection::Descending, SortDirection::Ascending],
                |d| d.label().to_string(),
            );
            ui.label(
                RichText::new(format!("{} universities", self.records.len()))
                    .weak()
                    .size(11.0),
            );
            if self.skipped > 0 {
                ui.label(
                    RichText::new(format!("{} unranked rows skipped", self.skipped))
                        .weak()
                        .size(11.0),
                );
            }
        });

        let derived = cache::memoize(&mut self.derived, self.version, &self.config, || {
            build_ranking(&self.records, &self.config)
        });
        draw_ranking(ui, &self.config, derived);
    }
}

fn draw_ranking(ui: &mut Ui, config: &RankingConfig, derived: &RankingDerived) {
    let names: Arc<Vec<String>> =
        Arc::new(derived.bars.iter().map(|b| b.university.clone()).collect());
    let plot_height = (derived.bars.len() as f32 * ROW_HEIGHT).max(240.0);

    egui::ScrollArea::vertical()
        .id_salt("ranking_scroll")
        .show(ui, |ui| {
            let y_names = names.clone();
            let response = Plot::new("ranking_plot")
                .legend(Legend::default())
                .height(plot_height)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .x_axis_label(config.category.label())
                .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                    let idx = -mark.value;
                    if idx >= 0.0 && (idx - idx.round()).abs() < 1e-6 {
                        y_names
                            .get(idx.round() as usize)
                            .cloned()
                            .unwrap_or_default()
                    } else {
                        String::new()
                    }
                })
                .label_formatter(|_, _| String::new());

            response.show(ui, |plot_ui| {
                for (l, &category) in derived.layers.iter().enumerate() {
                    let bars: Vec<Bar> = derived
                        .bars
                        .iter()
                        .enumerate()
                        .map(|(k, bar)| {
                            let (_, lower, upper) = bar.segments[l];
                            Bar::new(-(k as f64), upper - lower)
                                .base_offset(lower)
                                .width(0.8)
                        })
                        .collect();
                    let tip_names = names.clone();
                    let chart = BarChart::new(bars)
                        .horizontal()
                        .name(category.label())
                        .color(color::category_color(category))
                        .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
                            let idx = (-bar.argument).round();
                            let name = if idx >= 0.0 {
                                tip_names.get(idx as usize).cloned().unwrap_or_default()
                            } else {
                                String::new()
                            };
                            format!("{}\n{}: {:.1}", name, category.label(), bar.value)
                        }));
                    plot_ui.bar_chart(chart);
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, t: f64, r: f64, c: f64, i: f64, o: f64) -> RankingRecord {
        RankingRecord {
            university: name.to_string(),
            teaching: t,
            research: r,
            citations: c,
            industry_income: i,
            international: o,
        }
    }

    #[test]
    fn sorts_descending_by_default() {
        let records = vec![
            record("Mid", 50.0, 50.0, 50.0, 50.0, 50.0),
            record("Top", 90.0, 90.0, 90.0, 90.0, 90.0),
            record("Low", 10.0, 10.0, 10.0, 10.0, 10.0),
        ];
        let derived = build_ranking(&records, &RankingConfig::default());
        let names: Vec<&str> = derived.bars.iter().map(|b| b.university.as_str()).collect();
        assert_eq!(names, ["Top", "Mid", "Low"]);
    }

    #[test]
    fn ascending_reverses_and_ties_keep_file_order() {
        let records = vec![
            record("B", 40.0, 0.0, 0.0, 0.0, 0.0),
            record("A", 40.0, 0.0, 0.0, 0.0, 0.0),
            record("C", 20.0, 0.0, 0.0, 0.0, 0.0),
        ];
        let config = RankingConfig {
            category: ScoreCategory::Teaching,
            direction: SortDirection::Ascending,
        };
        let derived = build_ranking(&records, &config);
        let names: Vec<&str> = derived.bars.iter().map(|b| b.university.as_str()).collect();
        assert_eq!(names, ["C", "B", "A"]);
    }

    #[test]
    fn overall_stacks_the_five_subscores() {
        let records = vec![record("U", 10.0, 20.0, 30.0, 5.0, 15.0)];
        let derived = build_ranking(&records, &RankingConfig::default());
        let bar = &derived.bars[0];
        assert_eq!(derived.layers, ScoreCategory::SUBSCORES.to_vec());
        assert_eq!(bar.segments.len(), 5);
        assert!((bar.segments[0].1 - 0.0).abs() < 1e-9);
        for pair in bar.segments.windows(2) {
            assert!((pair[0].2 - pair[1].1).abs() < 1e-9);
        }
        let top = bar.segments.last().unwrap().2;
        assert!((top - 80.0).abs() < 1e-9);
        assert!((bar.total - 80.0).abs() < 1e-9);
    }

    #[test]
    fn single_category_draws_one_layer_from_zero() {
        let records = vec![record("U", 10.0, 20.0, 30.0, 5.0, 15.0)];
        let config = RankingConfig {
            category: ScoreCategory::Citations,
            direction: SortDirection::Descending,
        };
        let derived = build_ranking(&records, &config);
        assert_eq!(derived.layers, vec![ScoreCategory::Citations]);
        let bar = &derived.bars[0];
        assert_eq!(bar.segments.len(), 1);
        assert!((bar.segments[0].1 - 0.0).abs() < 1e-9);
        assert!((bar.segments[0].2 - 30.0).abs() < 1e-9);
    }
}
