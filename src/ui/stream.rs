use std::collections::HashSet;
use std::ops::RangeInclusive;

use egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{GridMark, Legend, Plot, PlotPoint, Polygon};

use crate::color;
use crate::data::datasets::{ParsedDataset, SaleRecord, SaleSeries};
use crate::data::dates;
use crate::processing::aggregate::{self, Reducer};
use crate::processing::lookup;
use crate::processing::stack::{self, Baseline, StackSeries};
use crate::state::cache::{self, DerivedSlot};
use crate::ui::{controls, tooltip};
use crate::ui::scatter::empty_hint;

/// Series toggled off in the stream graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamConfig {
    pub hidden: HashSet<SaleSeries>,
}

pub struct StreamDerived {
    /// Sale dates as timestamps, ascending.
    pub xs: Vec<f64>,
    pub layers: Vec<StackSeries<SaleSeries>>,
}

/// Roll sales up to one median price per (date, series), then stack the
/// visible series around a centered baseline. A series without sales on
/// some date contributes zero thickness there.
pub fn build_stream(records: &[SaleRecord], config: &StreamConfig) -> StreamDerived {
    let mut dated = aggregate::rollup2(
        records,
        |r| r.date,
        |r| r.series(),
        |r| Some(r.median_price),
        Reducer::Median,
    );
    dated.sort_by_key(|(date, _)| *date);
    let xs: Vec<f64> = dated
        .iter()
        .map(|(date, _)| dates::date_to_timestamp(*date))
        .collect();

    let visible: Vec<SaleSeries> = series_in_file_order(records)
        .into_iter()
        .filter(|s| !config.hidden.contains(s))
        .collect();

    let series_values: Vec<(SaleSeries, Vec<f64>)> = visible
        .iter()
        .map(|&series| {
            let values = dated
                .iter()
                .map(|(_, entries)| {
                    entries
                        .iter()
                        .find(|(key, _)| *key == series)
                        .map(|(_, v)| *v)
                        .unwrap_or(0.0)
                })
                .collect();
            (series, values)
        })
        .collect();

    let layers = stack::stack(&xs, &series_values, Baseline::Silhouette);
    StreamDerived { xs, layers }
}

/// Distinct (type, bedrooms) series in first-seen order.
pub fn series_in_file_order(records: &[SaleRecord]) -> Vec<SaleSeries> {
    let mut out: Vec<SaleSeries> = Vec::new();
    for record in records {
        let series = record.series();
        if !out.contains(&series) {
            out.push(series);
        }
    }
    out
}

/// Stream graph of median sale prices, one centered band per property
/// type and bedroom count.
pub struct StreamView {
    records: Vec<SaleRecord>,
    all_series: Vec<SaleSeries>,
    skipped: usize,
    version: u64,
    config: StreamConfig,
    derived: DerivedSlot<StreamConfig, StreamDerived>,
}

impl StreamView {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            all_series: Vec::new(),
            skipped: 0,
            version: 0,
            config: StreamConfig::default(),
            derived: None,
        }
    }

    pub fn set_dataset(&mut self, data: ParsedDataset<SaleRecord>) {
        self.records = data.records;
        self.skipped = data.skipped;
        self.all_series = series_in_file_order(&self.records);
        let known: HashSet<SaleSeries> = self.all_series.iter().copied().collect();
        self.config.hidden.retain(|s| known.contains(s));
        self.version = self.version.wrapping_add(1);
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        if self.records.is_empty() {
            empty_hint(ui, "No sales data loaded. Open a CSV or drop one onto the window.");
            return;
        }

        let colors = color::generate_palette(self.all_series.len());
        ui.horizontal_wrapped(|ui| {
            for (i, series) in self.all_series.iter().enumerate() {
                let mut shown = !self.config.hidden.contains(series);
                if controls::series_checkbox(ui, &mut shown, &series.label(), colors[i]) {
                    if shown {
                        self.config.hidden.remove(series);
                    } else {
                        self.config.hidden.insert(*series);
                    }
                }
            }
            if self.skipped > 0 {
                ui.label(
                    RichText::new(format!("{} malformed rows skipped", self.skipped))
                        .weak()
                        .size(11.0),
                );
            }
        });

        let derived = cache::memoize(&mut self.derived, self.version, &self.config, || {
            build_stream(&self.records, &self.config)
        });
        draw_stream(ui, derived, &self.all_series, &colors);
    }
}

fn series_color(all_series: &[SaleSeries], colors: &[Color32], key: SaleSeries) -> Color32 {
    all_series
        .iter()
        .position(|&s| s == key)
        .and_then(|i| colors.get(i).copied())
        .unwrap_or(Color32::GRAY)
}

fn draw_stream(ui: &mut Ui, derived: &StreamDerived, all_series: &[SaleSeries], colors: &[Color32]) {
    let response = Plot::new("stream_plot")
        .legend(Legend::default())
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            dates::format_timestamp_month(mark.value)
        })
        .y_axis_label("median price (AUD)")
        .label_formatter(|_, _| String::new())
        .show(ui, |plot_ui| {
            for layer in &derived.layers {
                let color = series_color(all_series, colors, layer.key);
                let mut points: Vec<[f64; 2]> =
                    layer.bands.iter().map(|b| [b.x, b.upper]).collect();
                points.extend(layer.bands.iter().rev().map(|b| [b.x, b.lower]));
                plot_ui.polygon(
                    Polygon::new(points)
                        .name(layer.key.label())
                        .fill_color(color.gamma_multiply(0.85))
                        .stroke(Stroke::new(1.0, color)),
                );
            }
            plot_ui.pointer_coordinate()
        });

    let Some(pointer) = response.inner else {
        return;
    };
    let Some(idx) = lookup::nearest_index(&derived.xs, pointer.x) else {
        return;
    };
    let snapped_x = derived.xs[idx];
    let rect = response.response.rect;
    let painter = ui.painter_at(rect);

    let screen_x = response
        .transform
        .position_from_point(&PlotPoint::new(snapped_x, 0.0))
        .x;
    painter.line_segment(
        [egui::pos2(screen_x, rect.top()), egui::pos2(screen_x, rect.bottom())],
        Stroke::new(1.0, Color32::from_gray(150).gamma_multiply(0.6)),
    );

    for layer in &derived.layers {
        let band = &layer.bands[idx];
        let thickness = band.upper - band.lower;
        if thickness <= 0.0 || pointer.y < band.lower || pointer.y > band.upper {
            continue;
        }
        let accent = series_color(all_series, colors, layer.key);
        let anchor = response
            .transform
            .position_from_point(&PlotPoint::new(snapped_x, (band.lower + band.upper) / 2.0));
        tooltip::highlight_point(&painter, anchor, accent);
        let lines = vec![
            dates::format_timestamp(snapped_x),
            layer.key.label(),
            format!("median ${thickness:.0}"),
        ];
        tooltip::draw_tooltip(&painter, rect, anchor, accent, &lines);
        break;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datasets::{self, PropertyType};
    use chrono::NaiveDate;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sale(y: i32, m: u32, pt: PropertyType, br: u8, price: f64) -> SaleRecord {
        SaleRecord {
            date: date(y, m, 1),
            property_type: pt,
            bedrooms: br,
            median_price: price,
        }
    }

    #[test]
    fn dates_sort_ascending_regardless_of_file_order() {
        let records = vec![
            sale(2010, 6, PropertyType::House, 3, 500_000.0),
            sale(2009, 1, PropertyType::House, 3, 450_000.0),
        ];
        let derived = build_stream(&records, &StreamConfig::default());
        assert_eq!(derived.xs.len(), 2);
        assert!(derived.xs[0] < derived.xs[1]);
    }

    #[test]
    fn medians_roll_up_per_date_and_series() {
        let records = vec![
            sale(2010, 1, PropertyType::House, 3, 100.0),
            sale(2010, 1, PropertyType::House, 3, 300.0),
            sale(2010, 1, PropertyType::House, 3, 200.0),
        ];
        let derived = build_stream(&records, &StreamConfig::default());
        assert_eq!(derived.layers.len(), 1);
        let band = &derived.layers[0].bands[0];
        // silhouette centers a single layer around zero
        assert!((band.upper - band.lower - 200.0).abs() < 1e-9);
        assert!((band.upper + band.lower).abs() < 1e-9);
    }

    #[test]
    fn missing_combination_has_zero_thickness() {
        let records = vec![
            sale(2010, 1, PropertyType::House, 3, 400.0),
            sale(2010, 4, PropertyType::House, 3, 420.0),
            sale(2010, 4, PropertyType::Unit, 2, 300.0),
        ];
        let derived = build_stream(&records, &StreamConfig::default());
        let unit_layer = derived
            .layers
            .iter()
            .find(|l| l.key.property_type == PropertyType::Unit)
            .unwrap();
        let first = &unit_layer.bands[0];
        assert!((first.upper - first.lower).abs() < 1e-9);
        let second = &unit_layer.bands[1];
        assert!((second.upper - second.lower - 300.0).abs() < 1e-9);
    }

    #[test]
    fn hidden_series_are_left_out_of_the_stack() {
        let records = vec![
            sale(2010, 1, PropertyType::House, 3, 400.0),
            sale(2010, 1, PropertyType::Unit, 2, 300.0),
        ];
        let hidden: HashSet<SaleSeries> = [SaleSeries {
            property_type: PropertyType::Unit,
            bedrooms: 2,
        }]
        .into_iter()
        .collect();
        let derived = build_stream(&records, &StreamConfig { hidden });
        assert_eq!(derived.layers.len(), 1);
        assert_eq!(derived.layers[0].key.property_type, PropertyType::House);
    }

    #[test]
    fn series_order_follows_first_appearance() {
        let records = vec![
            sale(2010, 1, PropertyType::Unit, 1, 100.0),
            sale(2010, 1, PropertyType::House, 4, 900.0),
            sale(2010, 4, PropertyType::Unit, 1, 120.0),
        ];
        let order = series_in_file_order(&records);
        assert_eq!(order.len(), 2);
        assert_eq!(order[0].property_type, PropertyType::Unit);
        assert_eq!(order[1].property_type, PropertyType::House);
    }

    #[test]
    fn csv_file_flows_through_loader_into_the_stack() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"saledate,MA,type,bedrooms\n\
              30/06/2007,390000,house,3\n\
              31/10/2007,400000,house,3\n\
              31/10/2007,300000,unit,2\n\
              30/11/2007,420000,house,3\n",
        )
        .unwrap();

        let parsed = datasets::load_sales(file.path()).unwrap();
        // the June row predates the cutoff
        assert_eq!(parsed.records.len(), 3);
        let derived = build_stream(&parsed.records, &StreamConfig::default());

        assert_eq!(derived.xs.len(), 2);
        assert_eq!(derived.layers.len(), 2);
        let unit = derived
            .layers
            .iter()
            .find(|l| l.key.property_type == PropertyType::Unit)
            .unwrap();
        // units sold in October only, so the November band collapses
        assert!((unit.bands[0].upper - unit.bands[0].lower - 300_000.0).abs() < 1e-9);
        assert!((unit.bands[1].upper - unit.bands[1].lower).abs() < 1e-9);
    }
}
