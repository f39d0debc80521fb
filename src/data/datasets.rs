use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::data::dates;
use crate::data::loader::{self, DataError};
use crate::data::table::DataTable;

/// Records that survived validation, plus how many source rows were
/// dropped on the way (malformed numbers, unknown categories).
#[derive(Debug, Clone)]
pub struct ParsedDataset<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Which dataset a chart consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Iris,
    Abalone,
    Rankings,
    Sales,
    Pollution,
}

impl DatasetKind {
    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Iris => "iris",
            DatasetKind::Abalone => "abalone",
            DatasetKind::Rankings => "university rankings",
            DatasetKind::Sales => "property sales",
            DatasetKind::Pollution => "air pollution",
        }
    }

    /// Bundled demo file written by the `generate_samples` binary.
    pub fn sample_path(&self) -> &'static str {
        match self {
            DatasetKind::Iris => "samples/iris.csv",
            DatasetKind::Abalone => "samples/abalone.csv",
            DatasetKind::Rankings => "samples/rankings.csv",
            DatasetKind::Sales => "samples/sales.csv",
            DatasetKind::Pollution => "samples/pollution.csv",
        }
    }
}

fn parse_num(text: &str, row: usize, column: &str) -> Result<f64, DataError> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DataError::MalformedNumber {
            row,
            column: column.to_string(),
            value: text.to_string(),
        }),
    }
}

/// Shared loader tail: a dataset with no surviving rows is an error,
/// a dataset with dropped rows is worth a warning.
fn finish<T>(
    records: Vec<T>,
    skipped: usize,
    path: &Path,
    what: &str,
) -> Result<ParsedDataset<T>, DataError> {
    if records.is_empty() {
        return Err(DataError::Empty {
            path: path.to_path_buf(),
        });
    }
    if skipped > 0 {
        tracing::warn!("{what}: skipped {skipped} rows");
    }
    Ok(ParsedDataset { records, skipped })
}

// ---------------------------------------------------------------------------
// Iris

/// Iris species, the `class` column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Setosa,
    Versicolor,
    Virginica,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    pub fn label(&self) -> &'static str {
        match self {
            Species::Setosa => "setosa",
            Species::Versicolor => "versicolor",
            Species::Virginica => "virginica",
        }
    }

    /// Accepts both the bare name and the "Iris-setosa" form.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        let name = lower.strip_prefix("iris-").unwrap_or(&lower);
        match name {
            "setosa" => Some(Species::Setosa),
            "versicolor" => Some(Species::Versicolor),
            "virginica" => Some(Species::Virginica),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IrisRecord {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
    pub species: Species,
}

/// The four iris measurements selectable on chart axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrisField {
    SepalLength,
    SepalWidth,
    PetalLength,
    PetalWidth,
}

impl IrisField {
    pub const ALL: [IrisField; 4] = [
        IrisField::SepalLength,
        IrisField::SepalWidth,
        IrisField::PetalLength,
        IrisField::PetalWidth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IrisField::SepalLength => "sepal length",
            IrisField::SepalWidth => "sepal width",
            IrisField::PetalLength => "petal length",
            IrisField::PetalWidth => "petal width",
        }
    }

    pub fn value(&self, record: &IrisRecord) -> f64 {
        match self {
            IrisField::SepalLength => record.sepal_length,
            IrisField::SepalWidth => record.sepal_width,
            IrisField::PetalLength => record.petal_length,
            IrisField::PetalWidth => record.petal_width,
        }
    }
}

fn parse_iris_row(
    table: &DataTable,
    cols: [usize; 4],
    class_col: usize,
    row: usize,
) -> Result<IrisRecord, DataError> {
    let cell = |col: usize| table.cell(col, row).unwrap_or("");
    let species = Species::parse(cell(class_col)).ok_or_else(|| DataError::MalformedNumber {
        row: row + 1,
        column: "class".to_string(),
        value: cell(class_col).to_string(),
    })?;
    Ok(IrisRecord {
        sepal_length: parse_num(cell(cols[0]), row + 1, "sepal length")?,
        sepal_width: parse_num(cell(cols[1]), row + 1, "sepal width")?,
        petal_length: parse_num(cell(cols[2]), row + 1, "petal length")?,
        petal_width: parse_num(cell(cols[3]), row + 1, "petal width")?,
        species,
    })
}

/// Load iris from CSV. Header names are matched tolerantly (spaces,
/// underscores and dots are equivalent); the species column is `class`.
/// Rows that fail validation are skipped and counted.
pub fn load_iris(path: &Path) -> Result<ParsedDataset<IrisRecord>, DataError> {
    let table = loader::read_table(path, None)?;
    let col = |name: &str| {
        table.column_index(name).ok_or(DataError::MissingColumn {
            column: name.to_string(),
        })
    };
    let cols = [
        col("sepal length")?,
        col("sepal width")?,
        col("petal length")?,
        col("petal width")?,
    ];
    let class_col = col("class")?;

    let mut records = Vec::with_capacity(table.row_count);
    let mut skipped = 0usize;
    for row in 0..table.row_count {
        match parse_iris_row(&table, cols, class_col, row) {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::debug!("iris: skipping {err}");
                skipped += 1;
            }
        }
    }

    finish(records, skipped, path, "iris")
}

// ---------------------------------------------------------------------------
// Abalone

/// Abalone sex category (male, female, infant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
    Infant,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Infant];

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Infant => "I",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "M" | "m" => Some(Sex::Male),
            "F" | "f" => Some(Sex::Female),
            "I" | "i" => Some(Sex::Infant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbaloneRecord {
    pub sex: Sex,
    pub length: f64,
    pub diameter: f64,
    pub height: f64,
    pub whole_weight: f64,
    pub shucked_weight: f64,
    pub viscera_weight: f64,
    pub shell_weight: f64,
    pub rings: f64,
}

/// The eight numeric abalone measurements, in matrix order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbaloneField {
    Length,
    Diameter,
    Height,
    WholeWeight,
    ShuckedWeight,
    VisceraWeight,
    ShellWeight,
    Rings,
}

impl AbaloneField {
    pub const ALL: [AbaloneField; 8] = [
        AbaloneField::Length,
        AbaloneField::Diameter,
        AbaloneField::Height,
        AbaloneField::WholeWeight,
        AbaloneField::ShuckedWeight,
        AbaloneField::VisceraWeight,
        AbaloneField::ShellWeight,
        AbaloneField::Rings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AbaloneField::Length => "length",
            AbaloneField::Diameter => "diameter",
            AbaloneField::Height => "height",
            AbaloneField::WholeWeight => "whole weight",
            AbaloneField::ShuckedWeight => "shucked weight",
            AbaloneField::VisceraWeight => "viscera weight",
            AbaloneField::ShellWeight => "shell weight",
            AbaloneField::Rings => "rings",
        }
    }

    /// Compact form for tight column headers.
    pub fn short_label(&self) -> &'static str {
        match self {
            AbaloneField::Length => "len",
            AbaloneField::Diameter => "diam",
            AbaloneField::Height => "ht",
            AbaloneField::WholeWeight => "whole",
            AbaloneField::ShuckedWeight => "shuck",
            AbaloneField::VisceraWeight => "visc",
            AbaloneField::ShellWeight => "shell",
            AbaloneField::Rings => "rings",
        }
    }

    pub fn value(&self, record: &AbaloneRecord) -> f64 {
        match self {
            AbaloneField::Length => record.length,
            AbaloneField::Diameter => record.diameter,
            AbaloneField::Height => record.height,
            AbaloneField::WholeWeight => record.whole_weight,
            AbaloneField::ShuckedWeight => record.shucked_weight,
            AbaloneField::VisceraWeight => record.viscera_weight,
            AbaloneField::ShellWeight => record.shell_weight,
            AbaloneField::Rings => record.rings,
        }
    }
}

/// Column names used when presenting the headerless abalone file as a
/// table.
pub const ABALONE_COLUMNS: [&str; 9] = [
    "sex",
    "length",
    "diameter",
    "height",
    "whole weight",
    "shucked weight",
    "viscera weight",
    "shell weight",
    "rings",
];

type RawAbalone = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

/// Load abalone data. The file has no header row; columns are
/// positional (sex, then the eight measurements).
pub fn load_abalone(path: &Path) -> Result<ParsedDataset<AbaloneRecord>, DataError> {
    let raws: Vec<RawAbalone> = loader::read_records(path, false)?;

    let mut records = Vec::with_capacity(raws.len());
    let mut skipped = 0usize;
    for (i, raw) in raws.iter().enumerate() {
        let row = i + 1;
        let parsed = Sex::parse(&raw.0)
            .ok_or_else(|| DataError::MalformedNumber {
                row,
                column: "sex".to_string(),
                value: raw.0.clone(),
            })
            .and_then(|sex| {
                Ok(AbaloneRecord {
                    sex,
                    length: parse_num(&raw.1, row, "length")?,
                    diameter: parse_num(&raw.2, row, "diameter")?,
                    height: parse_num(&raw.3, row, "height")?,
                    whole_weight: parse_num(&raw.4, row, "whole weight")?,
                    shucked_weight: parse_num(&raw.5, row, "shucked weight")?,
                    viscera_weight: parse_num(&raw.6, row, "viscera weight")?,
                    shell_weight: parse_num(&raw.7, row, "shell weight")?,
                    rings: parse_num(&raw.8, row, "rings")?,
                })
            });
        match parsed {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::debug!("abalone: skipping {err}");
                skipped += 1;
            }
        }
    }

    finish(records, skipped, path, "abalone")
}

// ---------------------------------------------------------------------------
// University rankings

#[derive(Debug, Deserialize)]
struct RawRanking {
    university: String,
    scores_teaching: String,
    scores_research: String,
    scores_citations: String,
    scores_industry_income: String,
    scores_international_outlook: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingRecord {
    pub university: String,
    pub teaching: f64,
    pub research: f64,
    pub citations: f64,
    pub industry_income: f64,
    pub international: f64,
}

impl RankingRecord {
    /// The overall score is the plain sum of the five subscores.
    pub fn overall(&self) -> f64 {
        self.teaching + self.research + self.citations + self.industry_income + self.international
    }
}

/// Score categories selectable in the ranking chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
    Teaching,
    Research,
    Citations,
    IndustryIncome,
    International,
    Overall,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 6] = [
        ScoreCategory::Teaching,
        ScoreCategory::Research,
        ScoreCategory::Citations,
        ScoreCategory::IndustryIncome,
        ScoreCategory::International,
        ScoreCategory::Overall,
    ];

    /// The five stacked subscores, in drawing order.
    pub const SUBSCORES: [ScoreCategory; 5] = [
        ScoreCategory::Teaching,
        ScoreCategory::Research,
        ScoreCategory::Citations,
        ScoreCategory::IndustryIncome,
        ScoreCategory::International,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::Teaching => "teaching",
            ScoreCategory::Research => "research",
            ScoreCategory::Citations => "citations",
            ScoreCategory::IndustryIncome => "industry income",
            ScoreCategory::International => "international outlook",
            ScoreCategory::Overall => "overall",
        }
    }

    pub fn value(&self, record: &RankingRecord) -> f64 {
        match self {
            ScoreCategory::Teaching => record.teaching,
            ScoreCategory::Research => record.research,
            ScoreCategory::Citations => record.citations,
            ScoreCategory::IndustryIncome => record.industry_income,
            ScoreCategory::International => record.international,
            ScoreCategory::Overall => record.overall(),
        }
    }
}

/// Load university rankings. Unranked entries mark scores with dashes
/// or leave them blank; such rows are skipped and counted.
pub fn load_rankings(path: &Path) -> Result<ParsedDataset<RankingRecord>, DataError> {
    let raws: Vec<RawRanking> = loader::read_records(path, true)?;

    let mut records = Vec::with_capacity(raws.len());
    let mut skipped = 0usize;
    for (i, raw) in raws.into_iter().enumerate() {
        let row = i + 1;
        let parsed = (|| -> Result<RankingRecord, DataError> {
            Ok(RankingRecord {
                teaching: parse_num(&raw.scores_teaching, row, "scores_teaching")?,
                research: parse_num(&raw.scores_research, row, "scores_research")?,
                citations: parse_num(&raw.scores_citations, row, "scores_citations")?,
                industry_income: parse_num(&raw.scores_industry_income, row, "scores_industry_income")?,
                international: parse_num(
                    &raw.scores_international_outlook,
                    row,
                    "scores_international_outlook",
                )?,
                university: raw.university,
            })
        })();
        match parsed {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::debug!("rankings: skipping {err}");
                skipped += 1;
            }
        }
    }

    finish(records, skipped, path, "rankings")
}

// ---------------------------------------------------------------------------
// Property sales

#[derive(Debug, Deserialize)]
struct RawSale {
    saledate: String,
    #[serde(rename = "MA")]
    ma: String,
    #[serde(rename = "type")]
    property_type: String,
    bedrooms: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    House,
    Unit,
}

impl PropertyType {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Unit => "unit",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "house" => Some(PropertyType::House),
            "unit" => Some(PropertyType::Unit),
            _ => None,
        }
    }
}

/// One stream-graph series: property type crossed with bedroom count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaleSeries {
    pub property_type: PropertyType,
    pub bedrooms: u8,
}

impl SaleSeries {
    pub fn label(&self) -> String {
        format!("{} {}br", self.property_type.label(), self.bedrooms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub property_type: PropertyType,
    pub bedrooms: u8,
    pub median_price: f64,
}

impl SaleRecord {
    pub fn series(&self) -> SaleSeries {
        SaleSeries {
            property_type: self.property_type,
            bedrooms: self.bedrooms,
        }
    }
}

/// The dataset switches from quarterly to monthly medians after this
/// date; earlier rows are discarded.
pub fn sales_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2007, 9, 30).unwrap_or(NaiveDate::MIN)
}

/// Load the moving-average property sales series. Dates are `d/m/Y`;
/// rows on or before the cutoff are dropped silently, rows that fail
/// validation are skipped and counted.
pub fn load_sales(path: &Path) -> Result<ParsedDataset<SaleRecord>, DataError> {
    let raws: Vec<RawSale> = loader::read_records(path, true)?;
    let cutoff = sales_cutoff();

    let mut records = Vec::with_capacity(raws.len());
    let mut skipped = 0usize;
    for (i, raw) in raws.iter().enumerate() {
        let row = i + 1;
        let date = match dates::parse_dmy(&raw.saledate) {
            Some(d) => d,
            None => {
                tracing::debug!("sales: row {row}: bad date {:?}", raw.saledate);
                skipped += 1;
                continue;
            }
        };
        if date <= cutoff {
            continue;
        }
        let parsed = (|| -> Result<SaleRecord, DataError> {
            let property_type =
                PropertyType::parse(&raw.property_type).ok_or_else(|| DataError::MalformedNumber {
                    row,
                    column: "type".to_string(),
                    value: raw.property_type.clone(),
                })?;
            let bedrooms = parse_num(&raw.bedrooms, row, "bedrooms")? as u8;
            let median_price = parse_num(&raw.ma, row, "MA")?;
            Ok(SaleRecord {
                date,
                property_type,
                bedrooms,
                median_price,
            })
        })();
        match parsed {
            Ok(record) => records.push(record),
            Err(err) => {
                tracing::debug!("sales: skipping {err}");
                skipped += 1;
            }
        }
    }

    finish(records, skipped, path, "sales")
}

// ---------------------------------------------------------------------------
// Air pollution

#[derive(Debug, Deserialize)]
struct RawPollution {
    #[serde(rename = "Measurement date")]
    measurement_date: String,
    #[serde(rename = "Station code")]
    station: String,
    #[serde(rename = "SO2")]
    so2: String,
    #[serde(rename = "NO2")]
    no2: String,
    #[serde(rename = "O3")]
    o3: String,
    #[serde(rename = "CO")]
    co: String,
    #[serde(rename = "PM10")]
    pm10: String,
    #[serde(rename = "PM2.5")]
    pm25: String,
}

/// The measured pollutants, in panel display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    So2,
    No2,
    O3,
    Co,
    Pm10,
    Pm25,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::So2,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::Co,
        Pollutant::Pm10,
        Pollutant::Pm25,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::So2 => "SO2",
            Pollutant::No2 => "NO2",
            Pollutant::O3 => "O3",
            Pollutant::Co => "CO",
            Pollutant::Pm10 => "PM10",
            Pollutant::Pm25 => "PM2.5",
        }
    }

    pub fn reading(&self, record: &PollutionRecord) -> Option<f64> {
        match self {
            Pollutant::So2 => record.so2,
            Pollutant::No2 => record.no2,
            Pollutant::O3 => record.o3,
            Pollutant::Co => record.co,
            Pollutant::Pm10 => record.pm10,
            Pollutant::Pm25 => record.pm25,
        }
    }
}

/// One measurement row collapsed to its calendar date. Readings are
/// per-pollutant and explicitly optional.
#[derive(Debug, Clone, PartialEq)]
pub struct PollutionRecord {
    pub date: NaiveDate,
    pub station: u32,
    pub so2: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub co: Option<f64>,
    pub pm10: Option<f64>,
    pub pm25: Option<f64>,
}

/// Empty, malformed and negative readings (the dataset's instrument
/// error code) become explicit missing values.
fn parse_reading(text: &str) -> Option<f64> {
    let v = text.trim().parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 {
        Some(v)
    } else {
        None
    }
}

/// Load air-pollution measurements. Rows with an unparseable date or
/// station code are skipped and counted; individual readings stay
/// optional.
pub fn load_pollution(path: &Path) -> Result<ParsedDataset<PollutionRecord>, DataError> {
    let raws: Vec<RawPollution> = loader::read_records(path, true)?;

    let mut records = Vec::with_capacity(raws.len());
    let mut skipped = 0usize;
    for raw in &raws {
        let date = dates::parse_measured_date(&raw.measurement_date);
        let station = raw.station.trim().parse::<u32>().ok();
        match (date, station) {
            (Some(date), Some(station)) => records.push(PollutionRecord {
                date,
                station,
                so2: parse_reading(&raw.so2),
                no2: parse_reading(&raw.no2),
                o3: parse_reading(&raw.o3),
                co: parse_reading(&raw.co),
                pm10: parse_reading(&raw.pm10),
                pm25: parse_reading(&raw.pm25),
            }),
            _ => skipped += 1,
        }
    }

    finish(records, skipped, path, "pollution")
}

/// Distinct years present in the measurements, ascending.
pub fn pollution_years(records: &[PollutionRecord]) -> Vec<i32> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.date.year()).collect();
    years.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Dispatch

/// A successfully loaded file, parsed for one dataset kind.
#[derive(Debug, Clone)]
pub enum LoadedPayload {
    Iris(ParsedDataset<IrisRecord>),
    Abalone(ParsedDataset<AbaloneRecord>),
    Rankings(ParsedDataset<RankingRecord>),
    Sales(ParsedDataset<SaleRecord>),
    Pollution(ParsedDataset<PollutionRecord>),
}

impl LoadedPayload {
    /// (kept, skipped) row counts for the status bar.
    pub fn counts(&self) -> (usize, usize) {
        match self {
            LoadedPayload::Iris(d) => (d.records.len(), d.skipped),
            LoadedPayload::Abalone(d) => (d.records.len(), d.skipped),
            LoadedPayload::Rankings(d) => (d.records.len(), d.skipped),
            LoadedPayload::Sales(d) => (d.records.len(), d.skipped),
            LoadedPayload::Pollution(d) => (d.records.len(), d.skipped),
        }
    }
}

/// A loaded file: the raw table for browsing plus the typed records.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub name: String,
    pub table: DataTable,
    pub payload: LoadedPayload,
}

/// Load and validate a file for the given dataset kind.
pub fn load_file(kind: DatasetKind, path: &Path) -> Result<LoadedFile, DataError> {
    let table = match kind {
        DatasetKind::Abalone => loader::read_table(path, Some(&ABALONE_COLUMNS))?,
        _ => loader::read_table(path, None)?,
    };
    let payload = match kind {
        DatasetKind::Iris => LoadedPayload::Iris(load_iris(path)?),
        DatasetKind::Abalone => LoadedPayload::Abalone(load_abalone(path)?),
        DatasetKind::Rankings => LoadedPayload::Rankings(load_rankings(path)?),
        DatasetKind::Sales => LoadedPayload::Sales(load_sales(path)?),
        DatasetKind::Pollution => LoadedPayload::Pollution(load_pollution(path)?),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(LoadedFile {
        name,
        table,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn species_parse_accepts_both_forms() {
        assert_eq!(Species::parse("Iris-setosa"), Some(Species::Setosa));
        assert_eq!(Species::parse("virginica"), Some(Species::Virginica));
        assert_eq!(Species::parse("rose"), None);
    }

    #[test]
    fn iris_loads_and_skips_bad_rows() {
        let file = write_csv(
            "sepal length,sepal width,petal length,petal width,class\n\
             5.1,3.5,1.4,0.2,Iris-setosa\n\
             oops,3.0,1.4,0.2,Iris-setosa\n\
             6.3,3.3,6.0,2.5,Iris-virginica\n",
        );
        let parsed = load_iris(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records[1].species, Species::Virginica);
        assert!((IrisField::PetalLength.value(&parsed.records[1]) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn iris_tolerates_underscore_headers() {
        let file = write_csv(
            "sepal_length,sepal_width,petal_length,petal_width,class\n5.1,3.5,1.4,0.2,setosa\n",
        );
        let parsed = load_iris(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn iris_missing_column_is_typed() {
        let file = write_csv("sepal length,class\n5.1,setosa\n");
        let err = load_iris(file.path()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { .. }));
    }

    #[test]
    fn abalone_is_positional() {
        let file = write_csv(
            "M,0.455,0.365,0.095,0.514,0.2245,0.101,0.15,15\n\
             F,0.53,0.42,0.135,0.677,0.2565,0.1415,0.21,9\n\
             X,0.1,0.1,0.1,0.1,0.1,0.1,0.1,1\n",
        );
        let parsed = load_abalone(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records[0].sex, Sex::Male);
        assert!((parsed.records[1].rings - 9.0).abs() < 1e-9);
    }

    #[test]
    fn rankings_skip_unranked_rows() {
        let file = write_csv(
            "university,scores_teaching,scores_research,scores_citations,scores_industry_income,scores_international_outlook\n\
             Alpha,90,85,95,70,80\n\
             Beta,-,-,-,-,-\n",
        );
        let parsed = load_rankings(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, 1);
        assert!((parsed.records[0].overall() - 420.0).abs() < 1e-9);
    }

    #[test]
    fn sales_filters_by_cutoff_date() {
        let file = write_csv(
            "saledate,MA,type,bedrooms\n\
             30/09/2007,400000,house,3\n\
             31/10/2007,410000,house,3\n\
             30/11/2007,210000,unit,2\n",
        );
        let parsed = load_sales(file.path()).unwrap();
        // the first row is on the cutoff and must be dropped without
        // counting as skipped
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.records[0].series().label(), "house 3br");
    }

    #[test]
    fn pollution_readings_are_optional() {
        let file = write_csv(
            "Measurement date,Station code,SO2,NO2,O3,CO,PM10,PM2.5\n\
             2017-01-01 00:00,101,0.004,0.059,0.002,1.2,73,57\n\
             2017-01-01 01:00,101,,-1,0.002,1.1,71,55\n",
        );
        let parsed = load_pollution(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        let second = &parsed.records[1];
        assert_eq!(second.so2, None);
        assert_eq!(second.no2, None); // negative error code
        assert_eq!(second.o3, Some(0.002));
        assert_eq!(pollution_years(&parsed.records), vec![2017]);
    }

    #[test]
    fn pollution_ignores_extra_columns() {
        let file = write_csv(
            "Measurement date,Station code,Address,SO2,NO2,O3,CO,PM10,PM2.5\n\
             2019-06-01 00:00,204,\"District 4, Sample City\",0.003,0.02,0.04,0.4,38,21\n",
        );
        let parsed = load_pollution(file.path()).unwrap();
        assert_eq!(parsed.records[0].station, 204);
        assert_eq!(parsed.records[0].pm10, Some(38.0));
    }

    #[test]
    fn load_file_dispatches_and_carries_the_table() {
        let file = write_csv(
            "sepal length,sepal width,petal length,petal width,class\n\
             5.1,3.5,1.4,0.2,Iris-setosa\n\
             0,0,0,0,Iris-setosa\n",
        );
        let loaded = load_file(DatasetKind::Iris, file.path()).unwrap();
        assert_eq!(loaded.table.row_count, 2);
        assert_eq!(loaded.table.columns.len(), 5);
        match &loaded.payload {
            // zero rows parse here; the chart views drop them later
            LoadedPayload::Iris(d) => assert_eq!(d.records.len(), 2),
            other => panic!("expected iris payload, got {other:?}"),
        }
        assert_eq!(loaded.payload.counts(), (2, 0));
    }

    #[test]
    fn load_file_names_abalone_columns() {
        let file = write_csv("M,0.455,0.365,0.095,0.514,0.2245,0.101,0.15,15\n");
        let loaded = load_file(DatasetKind::Abalone, file.path()).unwrap();
        assert_eq!(loaded.table.columns[0], "sex");
        assert_eq!(loaded.table.columns[8], "rings");
        assert_eq!(loaded.table.row_count, 1);
    }

    #[test]
    fn empty_file_is_a_typed_error() {
        let file = write_csv("saledate,MA,type,bedrooms\n");
        let err = load_file(DatasetKind::Sales, file.path()).unwrap_err();
        assert!(matches!(err, DataError::Empty { .. }));
    }
}
