//! Generates the bundled sample CSVs under `samples/`, one per chart
//! dataset. Deterministic so regenerated files diff cleanly.

use std::path::Path;

use chrono::{Datelike, Days, Months, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, options: &'a [T]) -> &'a T {
        &options[(self.next_u64() % options.len() as u64) as usize]
    }
}

fn month_end(year: i32, month: u32) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month start");
    first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .expect("valid month end")
}

fn write_iris(rng: &mut SimpleRng, path: &Path) -> usize {
    let mut writer = csv::Writer::from_path(path).expect("create iris sample");
    writer
        .write_record(["sepal length", "sepal width", "petal length", "petal width", "class"])
        .expect("write iris header");

    // (class, sepal length, sepal width, petal length, petal width)
    let profiles = [
        ("Iris-setosa", 5.0, 3.4, 1.5, 0.2),
        ("Iris-versicolor", 5.9, 2.8, 4.3, 1.3),
        ("Iris-virginica", 6.6, 3.0, 5.6, 2.0),
    ];

    let mut rows = 0usize;
    for (class, sl, sw, pl, pw) in profiles {
        for _ in 0..50 {
            let record = [
                format!("{:.1}", rng.gauss(sl, 0.35).max(0.1)),
                format!("{:.1}", rng.gauss(sw, 0.3).max(0.1)),
                format!("{:.1}", rng.gauss(pl, 0.3).max(0.1)),
                format!("{:.1}", rng.gauss(pw, 0.15).max(0.1)),
                class.to_string(),
            ];
            writer.write_record(&record).expect("write iris row");
            rows += 1;
        }
    }

    // trailing all-zero artifacts, as in the course file
    for _ in 0..2 {
        writer
            .write_record(["0", "0", "0", "0", "Iris-setosa"])
            .expect("write iris zero row");
        rows += 1;
    }

    writer.flush().expect("flush iris sample");
    rows
}

fn write_abalone(rng: &mut SimpleRng, path: &Path) -> usize {
    let mut writer = csv::Writer::from_path(path).expect("create abalone sample");

    let sexes = ["M", "F", "I"];
    let mut rows = 0usize;
    for _ in 0..600 {
        let sex = *rng.pick(&sexes);
        let base = if sex == "I" {
            rng.gauss(0.42, 0.08)
        } else {
            rng.gauss(0.56, 0.08)
        }
        .clamp(0.1, 0.8);

        let length = base;
        let diameter = (base * 0.8 + rng.gauss(0.0, 0.01)).max(0.05);
        let height = (base * 0.25 + rng.gauss(0.0, 0.01)).max(0.01);
        let whole = (base.powi(3) * 5.0 + rng.gauss(0.0, 0.05)).max(0.01);
        let shucked = (whole * 0.43 + rng.gauss(0.0, 0.02)).max(0.005);
        let viscera = (whole * 0.22 + rng.gauss(0.0, 0.01)).max(0.005);
        let shell = (whole * 0.28 + rng.gauss(0.0, 0.01)).max(0.005);
        let rings = rng.gauss(if sex == "I" { 8.0 } else { 11.0 }, 2.5).round().max(1.0);

        let record = [
            sex.to_string(),
            format!("{length:.3}"),
            format!("{diameter:.3}"),
            format!("{height:.3}"),
            format!("{whole:.4}"),
            format!("{shucked:.4}"),
            format!("{viscera:.4}"),
            format!("{shell:.4}"),
            format!("{rings:.0}"),
        ];
        writer.write_record(&record).expect("write abalone row");
        rows += 1;
    }

    writer.flush().expect("flush abalone sample");
    rows
}

fn write_rankings(rng: &mut SimpleRng, path: &Path) -> usize {
    let mut writer = csv::Writer::from_path(path).expect("create rankings sample");
    writer
        .write_record([
            "university",
            "scores_teaching",
            "scores_research",
            "scores_citations",
            "scores_industry_income",
            "scores_international_outlook",
        ])
        .expect("write rankings header");

    let prefixes = ["National", "Royal", "Central", "Eastern", "Pacific", "Northern"];
    let cores = [
        "Ashford", "Brighton", "Calder", "Durham Vale", "Eastport", "Fenwick", "Grantham",
        "Hartwell", "Inverley", "Jarrow", "Kingsmere", "Lakeshore", "Marlow", "Newbridge",
        "Oakhaven", "Penrith", "Queensport", "Riverton", "Stanmore", "Telford",
    ];
    let suffixes = ["University", "Institute of Technology", "State University"];

    let mut rows = 0usize;
    for (i, core) in cores.iter().enumerate() {
        for suffix in suffixes {
            let name = if i % 3 == 0 {
                format!("{} {} {}", rng.pick(&prefixes), core, suffix)
            } else {
                format!("{core} {suffix}")
            };
            // quality tier drifts downward through the list
            let tier = 85.0 - rows as f64 * 0.9;
            let record = [
                name,
                format!("{:.1}", rng.gauss(tier, 6.0).clamp(10.0, 99.9)),
                format!("{:.1}", rng.gauss(tier, 8.0).clamp(10.0, 99.9)),
                format!("{:.1}", rng.gauss(tier + 5.0, 7.0).clamp(10.0, 99.9)),
                format!("{:.1}", rng.gauss(55.0, 12.0).clamp(10.0, 99.9)),
                format!("{:.1}", rng.gauss(60.0, 15.0).clamp(10.0, 99.9)),
            ];
            writer.write_record(&record).expect("write rankings row");
            rows += 1;
        }
    }

    // unranked entries publish dashes instead of scores
    for name in ["Westcliff College", "Harbor Point University"] {
        writer
            .write_record([name, "-", "-", "-", "-", "-"])
            .expect("write unranked row");
        rows += 1;
    }

    writer.flush().expect("flush rankings sample");
    rows
}

fn write_sales(rng: &mut SimpleRng, path: &Path) -> usize {
    let mut writer = csv::Writer::from_path(path).expect("create sales sample");
    writer
        .write_record(["saledate", "MA", "type", "bedrooms"])
        .expect("write sales header");

    // (type, bedrooms, starting median)
    let series: [(&str, u32, f64); 6] = [
        ("house", 2, 380_000.0),
        ("house", 3, 450_000.0),
        ("house", 4, 560_000.0),
        ("unit", 1, 260_000.0),
        ("unit", 2, 330_000.0),
        ("unit", 3, 410_000.0),
    ];
    let mut prices: Vec<f64> = series.iter().map(|(_, _, p)| *p).collect();

    let mut rows = 0usize;
    let mut emit = |writer: &mut csv::Writer<std::fs::File>,
                    rng: &mut SimpleRng,
                    prices: &mut Vec<f64>,
                    date: NaiveDate,
                    rows: &mut usize| {
        for (k, (kind, bedrooms, _)) in series.iter().enumerate() {
            prices[k] = (prices[k] * rng.gauss(1.004, 0.012)).max(150_000.0);
            let record = [
                date.format("%d/%m/%Y").to_string(),
                format!("{:.0}", prices[k]),
                kind.to_string(),
                bedrooms.to_string(),
            ];
            writer.write_record(&record).expect("write sales row");
            *rows += 1;
        }
    };

    // quarterly medians up to September 2007; these fall before the
    // cutoff and are dropped by the loader
    for year in 2005..=2007 {
        for month in [3u32, 6, 9, 12] {
            let date = month_end(year, month);
            if date > NaiveDate::from_ymd_opt(2007, 9, 30).expect("cutoff date") {
                continue;
            }
            emit(&mut writer, rng, &mut prices, date, &mut rows);
        }
    }

    // monthly medians afterwards
    let mut date = month_end(2007, 10);
    let end = month_end(2019, 12);
    while date <= end {
        emit(&mut writer, rng, &mut prices, date, &mut rows);
        let next_first = date.checked_add_days(Days::new(1)).expect("next month start");
        date = month_end(next_first.year(), next_first.month());
    }

    writer.flush().expect("flush sales sample");
    rows
}

fn write_pollution(rng: &mut SimpleRng, path: &Path) -> usize {
    let mut writer = csv::Writer::from_path(path).expect("create pollution sample");
    writer
        .write_record([
            "Measurement date",
            "Station code",
            "Address",
            "SO2",
            "NO2",
            "O3",
            "CO",
            "PM10",
            "PM2.5",
        ])
        .expect("write pollution header");

    let stations = [101u32, 102, 103, 104, 105, 106];
    let mut rows = 0usize;

    let mut date = NaiveDate::from_ymd_opt(2017, 1, 1).expect("start date");
    let end = NaiveDate::from_ymd_opt(2019, 12, 31).expect("end date");
    while date <= end {
        let day_of_year = date.ordinal() as f64;
        // winter peaks for particulates and SO2, summer peak for ozone
        let season = (day_of_year / 365.0 * std::f64::consts::TAU).cos();

        for &station in &stations {
            let local = 1.0 + (station - 101) as f64 * 0.06;
            let so2 = rng.gauss(0.004 + 0.002 * season, 0.0015) * local;
            let no2 = rng.gauss(0.025 + 0.008 * season, 0.006) * local;
            let o3 = rng.gauss(0.03 - 0.012 * season, 0.007) * local;
            let co = rng.gauss(0.5 + 0.2 * season, 0.12) * local;
            let pm10 = rng.gauss(45.0 + 18.0 * season, 12.0) * local;
            let pm25 = rng.gauss(25.0 + 10.0 * season, 8.0) * local;

            let mut cells = vec![
                format!("{} 00:00", date.format("%Y-%m-%d")),
                station.to_string(),
                format!("District {}, Sample City", station - 100),
                format!("{:.4}", so2.max(0.0001)),
                format!("{:.4}", no2.max(0.0001)),
                format!("{:.4}", o3.max(0.0001)),
                format!("{:.2}", co.max(0.01)),
                format!("{:.1}", pm10.max(1.0)),
                format!("{:.1}", pm25.max(1.0)),
            ];

            // sensors drop out now and then; a -1 marks instrument error
            if rng.next_f64() < 0.01 {
                let idx = 3 + (rng.next_u64() % 6) as usize;
                cells[idx] = String::new();
            }
            if rng.next_f64() < 0.005 {
                let idx = 3 + (rng.next_u64() % 6) as usize;
                cells[idx] = "-1".to_string();
            }

            writer.write_record(&cells).expect("write pollution row");
            rows += 1;
        }
        date = date.checked_add_days(Days::new(1)).expect("next day");
    }

    writer.flush().expect("flush pollution sample");
    rows
}

fn main() {
    let out_dir = Path::new("samples");
    std::fs::create_dir_all(out_dir).expect("create samples directory");

    let mut rng = SimpleRng::new(42);

    let iris = write_iris(&mut rng, &out_dir.join("iris.csv"));
    let abalone = write_abalone(&mut rng, &out_dir.join("abalone.csv"));
    let rankings = write_rankings(&mut rng, &out_dir.join("rankings.csv"));
    let sales = write_sales(&mut rng, &out_dir.join("sales.csv"));
    let pollution = write_pollution(&mut rng, &out_dir.join("pollution.csv"));

    println!(
        "Wrote samples/: iris {iris}, abalone {abalone}, rankings {rankings}, sales {sales}, pollution {pollution} rows"
    );
}
