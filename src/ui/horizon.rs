use std::ops::RangeInclusive;

use chrono::Datelike;
use egui::{RichText, Stroke, Ui, Vec2};
use egui_plot::{GridMark, Plot, Polygon};

use crate::color;
use crate::data::datasets::{self, ParsedDataset, Pollutant, PollutionRecord};
use crate::data::dates;
use crate::processing::aggregate::{self, Reducer};
use crate::processing::lookup;
use crate::state::cache::{self, DerivedSlot};
use crate::ui::{controls, tooltip};
use crate::ui::scatter::empty_hint;

/// Number of folded bands per horizon row.
pub const BANDS: usize = 5;

const ROW_HEIGHT: f32 = 26.0;
const AXIS_STRIP: f32 = 18.0;
const LABEL_W: f32 = 64.0;

/// Selected year; `None` falls back to 2017 or the earliest year on
/// file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HorizonConfig {
    pub year: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct HorizonRow {
    pub station: u32,
    /// Day timestamps, ascending. Days without a reading are absent,
    /// not zero.
    pub xs: Vec<f64>,
    pub values: Vec<f64>,
}

pub struct PollutantBlock {
    pub pollutant: Pollutant,
    /// Value-domain height of one band: the block maximum over
    /// [`BANDS`].
    pub band_height: f64,
    pub x_range: (f64, f64),
    pub rows: Vec<HorizonRow>,
}

pub struct HorizonDerived {
    pub year: i32,
    pub blocks: Vec<PollutantBlock>,
}

pub fn resolve_year(years: &[i32], requested: Option<i32>) -> Option<i32> {
    if let Some(y) = requested {
        if years.contains(&y) {
            return Some(y);
        }
    }
    if years.contains(&2017) {
        return Some(2017);
    }
    years.first().copied()
}

/// The portion of `value` falling inside horizon band `band`.
pub fn fold(value: f64, band: usize, band_height: f64) -> f64 {
    (value - band as f64 * band_height).clamp(0.0, band_height)
}

/// One block per pollutant for the chosen year: daily median readings
/// per station, scaled by the block-wide maximum so every station in a
/// block folds identically.
pub fn build_horizon(
    records: &[PollutionRecord],
    years: &[i32],
    config: &HorizonConfig,
) -> HorizonDerived {
    let year = resolve_year(years, config.year).unwrap_or(0);
    let in_year: Vec<&PollutionRecord> = records.iter().filter(|r| r.date.year() == year).collect();

    let blocks = Pollutant::ALL
        .iter()
        .map(|&pollutant| {
            let mut per_station = aggregate::rollup2(
                &in_year,
                |r| r.station,
                |r| r.date,
                |r| pollutant.reading(r),
                Reducer::Median,
            );
            per_station.retain(|(_, entries)| !entries.is_empty());
            per_station.sort_by_key(|(station, _)| *station);

            let mut max_value = 0.0f64;
            let mut x_min = f64::INFINITY;
            let mut x_max = f64::NEG_INFINITY;
            let rows: Vec<HorizonRow> = per_station
                .into_iter()
                .map(|(station, mut entries)| {
                    entries.sort_by_key(|(date, _)| *date);
                    let xs: Vec<f64> = entries
                        .iter()
                        .map(|(date, _)| dates::date_to_timestamp(*date))
                        .collect();
                    let values: Vec<f64> = entries.iter().map(|(_, v)| *v).collect();
                    for &x in &xs {
                        x_min = x_min.min(x);
                        x_max = x_max.max(x);
                    }
                    for &v in &values {
                        max_value = max_value.max(v);
                    }
                    HorizonRow { station, xs, values }
                })
                .collect();

            PollutantBlock {
                pollutant,
                band_height: if max_value > 0.0 {
                    max_value / BANDS as f64
                } else {
                    1.0
                },
                x_range: if x_min.is_finite() {
                    (x_min, x_max)
                } else {
                    (0.0, 1.0)
                },
                rows,
            }
        })
        .collect();

    HorizonDerived { year, blocks }
}

/// Horizon charts of daily pollution medians, one compact row per
/// station grouped by pollutant.
pub struct HorizonView {
    records: Vec<PollutionRecord>,
    years: Vec<i32>,
    skipped: usize,
    version: u64,
    config: HorizonConfig,
    derived: DerivedSlot<HorizonConfig, HorizonDerived>,
}

impl HorizonView {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            years: Vec::new(),
            skipped: 0,
            version: 0,
            config: HorizonConfig::default(),
            derived: None,
        }
    }

    pub fn set_dataset(&mut self, data: ParsedDataset<PollutionRecord>) {
        self.records = data.records;
        self.skipped = data.skipped;
        self.years = datasets::pollution_years(&self.records);
        self.version = self.version.wrapping_add(1);
    }

    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        if self.records.is_empty() {
            empty_hint(ui, "No pollution data loaded. Open a CSV or drop one onto the window.");
            return;
        }

        ui.horizontal(|ui| {
            let mut year = resolve_year(&self.years, self.config.year).unwrap_or(0);
            if controls::enum_combo(ui, "horizon_year", "Year", &mut year, &self.years, |y| {
                y.to_string()
            }) {
                self.config.year = Some(year);
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
            build_horizon(&self.records, &self.years, &self.config)
        });

        egui::ScrollArea::vertical()
            .id_salt("horizon_scroll")
            .show(ui, |ui| {
                for block in &derived.blocks {
                    draw_block(ui, block);
                    ui.add_space(10.0);
                }
            });
    }
}

fn draw_block(ui: &mut Ui, block: &PollutantBlock) {
    let hue = color::pollutant_hue(block.pollutant);
    let shades = color::band_shades(hue, BANDS);
    let accent = color::shade(hue, 0.85);

    ui.label(
        RichText::new(format!("{} ({} stations)", block.pollutant.label(), block.rows.len()))
            .color(accent)
            .strong(),
    );
    if block.rows.is_empty() {
        ui.label(RichText::new("no readings this year").weak().size(11.0));
        return;
    }

    let last = block.rows.len() - 1;
    for (r, row) in block.rows.iter().enumerate() {
        let is_last = r == last;
        let height = if is_last { ROW_HEIGHT + AXIS_STRIP } else { ROW_HEIGHT };
        ui.horizontal(|ui| {
            ui.add_sized(
                [LABEL_W, ROW_HEIGHT],
                egui::Label::new(RichText::new(format!("st {}", row.station)).size(10.0).weak()),
            );
            draw_row(ui, block, row, &shades, accent, height, is_last);
        });
    }
}

fn draw_row(
    ui: &mut Ui,
    block: &PollutantBlock,
    row: &HorizonRow,
    shades: &[egui::Color32],
    accent: egui::Color32,
    height: f32,
    is_last: bool,
) {
    let response = Plot::new(("horizon_row", block.pollutant.label(), row.station))
        .height(height)
        .width(ui.available_width() - 4.0)
        .show_axes([is_last, false])
        .show_grid([false, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .set_margin_fraction(Vec2::ZERO)
        .include_x(block.x_range.0)
        .include_x(block.x_range.1)
        .include_y(0.0)
        .include_y(block.band_height)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            dates::format_timestamp_month(mark.value)
        })
        .label_formatter(|_, _| String::new())
        .show(ui, |plot_ui| {
            for band in 0..BANDS {
                let upper: Vec<[f64; 2]> = row
                    .xs
                    .iter()
                    .zip(&row.values)
                    .map(|(&x, &v)| [x, fold(v, band, block.band_height)])
                    .collect();
                if upper.iter().all(|p| p[1] <= 0.0) {
                    continue;
                }
                let mut points = upper;
                points.extend(row.xs.iter().rev().map(|&x| [x, 0.0]));
                plot_ui.polygon(
                    Polygon::new(points)
                        .fill_color(shades[band])
                        .stroke(Stroke::NONE),
                );
            }
            plot_ui.pointer_coordinate()
        });

    let Some(pointer) = response.inner else {
        return;
    };
    let Some(idx) = lookup::nearest_index(&row.xs, pointer.x) else {
        return;
    };
    let Some(hover_pos) = response.response.hover_pos() else {
        return;
    };

    let rect = response.response.rect;
    let row_painter = ui.painter_at(rect);
    let snapped = response
        .transform
        .position_from_point(&egui_plot::PlotPoint::new(row.xs[idx], 0.0));
    row_painter.line_segment(
        [egui::pos2(snapped.x, rect.top()), egui::pos2(snapped.x, rect.bottom())],
        Stroke::new(1.0, accent.gamma_multiply(0.7)),
    );

    let lines = vec![
        dates::format_timestamp(row.xs[idx]),
        format!("station {}", row.station),
        format!("{}: {:.1}", block.pollutant.label(), row.values[idx]),
    ];
    tooltip::draw_tooltip(ui.painter(), ui.clip_rect(), hover_pos, accent, &lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn reading(y: i32, m: u32, d: u32, station: u32, pm10: Option<f64>) -> PollutionRecord {
        PollutionRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            station,
            so2: None,
            no2: None,
            o3: None,
            co: None,
            pm10,
            pm25: None,
        }
    }

    #[test]
    fn year_resolution_prefers_request_then_2017_then_first() {
        let years = [2017, 2018, 2019];
        assert_eq!(resolve_year(&years, Some(2019)), Some(2019));
        assert_eq!(resolve_year(&years, Some(1990)), Some(2017));
        assert_eq!(resolve_year(&years, None), Some(2017));
        assert_eq!(resolve_year(&[2018, 2019], None), Some(2018));
        assert_eq!(resolve_year(&[], None), None);
    }

    #[test]
    fn folds_clamp_to_band_height() {
        assert!((fold(7.0, 0, 5.0) - 5.0).abs() < 1e-9);
        assert!((fold(7.0, 1, 5.0) - 2.0).abs() < 1e-9);
        assert!((fold(3.0, 1, 5.0) - 0.0).abs() < 1e-9);
        assert!((fold(12.0, 2, 5.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn filters_to_the_resolved_year() {
        let records = vec![
            reading(2017, 3, 1, 101, Some(40.0)),
            reading(2018, 3, 1, 101, Some(80.0)),
        ];
        let derived = build_horizon(&records, &[2017, 2018], &HorizonConfig::default());
        assert_eq!(derived.year, 2017);
        let pm10 = derived
            .blocks
            .iter()
            .find(|b| b.pollutant == Pollutant::Pm10)
            .unwrap();
        assert_eq!(pm10.rows.len(), 1);
        assert_eq!(pm10.rows[0].values, vec![40.0]);
    }

    #[test]
    fn daily_medians_per_station_with_gaps_for_missing_days() {
        let records = vec![
            reading(2017, 1, 1, 101, Some(10.0)),
            reading(2017, 1, 1, 101, Some(30.0)),
            reading(2017, 1, 1, 101, Some(20.0)),
            reading(2017, 1, 3, 101, Some(50.0)),
            reading(2017, 1, 2, 101, None),
        ];
        let derived = build_horizon(&records, &[2017], &HorizonConfig::default());
        let pm10 = derived
            .blocks
            .iter()
            .find(|b| b.pollutant == Pollutant::Pm10)
            .unwrap();
        let row = &pm10.rows[0];
        // Jan 2 had no reading, so only two days appear
        assert_eq!(row.values, vec![20.0, 50.0]);
        assert!(row.xs[0] < row.xs[1]);
        assert!((pm10.band_height - 10.0).abs() < 1e-9);
    }

    #[test]
    fn stations_without_readings_are_dropped_from_the_block() {
        let records = vec![
            reading(2017, 1, 1, 101, Some(25.0)),
            reading(2017, 1, 1, 204, None),
        ];
        let derived = build_horizon(&records, &[2017], &HorizonConfig::default());
        let pm10 = derived
            .blocks
            .iter()
            .find(|b| b.pollutant == Pollutant::Pm10)
            .unwrap();
        assert_eq!(pm10.rows.len(), 1);
        assert_eq!(pm10.rows[0].station, 101);
        // the SO2 block has no stations at all
        let so2 = derived
            .blocks
            .iter()
            .find(|b| b.pollutant == Pollutant::So2)
            .unwrap();
        assert!(so2.rows.is_empty());
    }

    #[test]
    fn stations_sort_ascending_by_code() {
        let records = vec![
            reading(2017, 1, 1, 204, Some(5.0)),
            reading(2017, 1, 1, 101, Some(7.0)),
        ];
        let derived = build_horizon(&records, &[2017], &HorizonConfig::default());
        let pm10 = derived
            .blocks
            .iter()
            .find(|b| b.pollutant == Pollutant::Pm10)
            .unwrap();
        let stations: Vec<u32> = pm10.rows.iter().map(|r| r.station).collect();
        assert_eq!(stations, vec![101, 204]);
    }

    #[test]
    fn csv_file_flows_through_loader_into_folded_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"Measurement date,Station code,SO2,NO2,O3,CO,PM10,PM2.5\n\
              2017-01-01 00:00,101,,,,,60,\n\
              2017-01-01 12:00,101,,,,,80,\n\
              2018-05-01 00:00,101,,,,,999,\n",
        )
        .unwrap();

        let parsed = datasets::load_pollution(file.path()).unwrap();
        let years = datasets::pollution_years(&parsed.records);
        assert_eq!(years, vec![2017, 2018]);

        let derived = build_horizon(&parsed.records, &years, &HorizonConfig::default());
        assert_eq!(derived.year, 2017);
        let pm10 = derived
            .blocks
            .iter()
            .find(|b| b.pollutant == Pollutant::Pm10)
            .unwrap();
        // both hourly readings land on the same day and median to 70
        assert_eq!(pm10.rows.len(), 1);
        assert_eq!(pm10.rows[0].values, vec![70.0]);
        assert!((pm10.band_height - 70.0 / BANDS as f64).abs() < 1e-9);
    }
}
