//! Writes synthetic monthly station tables to `data/` (or the directory given
//! as the first argument) in the layout `airtrend` loads by default.

use std::fs;
use std::path::{Path, PathBuf};

use airtrend::config::DEFAULT_STATIONS;
use anyhow::{Context, Result};
use chrono::{Months, NaiveDate};

const POLLUTANTS: [(&str, f64); 6] = [
    ("PM2.5", 80.0),
    ("PM10", 105.0),
    ("SO2", 15.0),
    ("NO2", 50.0),
    ("CO", 1200.0),
    ("O3", 57.0),
];

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
}

/// Monthly level for one pollutant: winter peak, slow downward trend, noise.
/// Ozone peaks in summer instead.
fn monthly_level(base: f64, pollutant: &str, month_index: usize, rng: &mut SimpleRng) -> f64 {
    let phase = if pollutant == "O3" { 0.0 } else { std::f64::consts::PI };
    let angle = (month_index as f64 + 3.0) / 12.0 * 2.0 * std::f64::consts::PI;
    let season = 1.0 + 0.35 * (angle + phase).cos();
    let trend = 1.0 - 0.004 * month_index as f64;
    (base * season * trend * rng.gauss(1.0, 0.08)).max(0.1)
}

fn write_station(path: &Path, months: &[NaiveDate], rows: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec!["year_month".to_string()];
    header.extend(POLLUTANTS.iter().map(|(name, _)| name.to_string()));
    writer.write_record(&header)?;

    for (month, values) in months.iter().zip(rows) {
        let mut record = vec![month.format("%Y-%m").to_string()];
        record.extend(values.iter().map(|v| format!("{v:.3}")));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    // 2013-03 .. 2017-02, 48 months
    let start = NaiveDate::from_ymd_opt(2013, 3, 1).context("invalid start month")?;
    let months: Vec<NaiveDate> = (0..48u32)
        .filter_map(|i| start.checked_add_months(Months::new(i)))
        .collect();

    let mut rng = SimpleRng::new(42);
    let mut sums = vec![vec![0.0; POLLUTANTS.len()]; months.len()];
    let sites: Vec<&str> = DEFAULT_STATIONS
        .iter()
        .copied()
        .filter(|name| *name != "Average")
        .collect();

    for site in &sites {
        let site_scale = rng.gauss(1.0, 0.1);
        let rows: Vec<Vec<f64>> = (0..months.len())
            .map(|m| {
                POLLUTANTS
                    .iter()
                    .map(|&(name, base)| monthly_level(base * site_scale, name, m, &mut rng))
                    .collect()
            })
            .collect();

        for (sum_row, row) in sums.iter_mut().zip(&rows) {
            for (sum, v) in sum_row.iter_mut().zip(row) {
                *sum += v;
            }
        }

        let path = out_dir.join(format!("{site}.csv"));
        write_station(&path, &months, &rows)?;
        log::info!("wrote {}", path.display());
    }

    let n = sites.len() as f64;
    let averages: Vec<Vec<f64>> = sums
        .into_iter()
        .map(|row| row.into_iter().map(|v| v / n).collect())
        .collect();
    write_station(&out_dir.join("Average.csv"), &months, &averages)?;

    println!(
        "Wrote {} station tables ({} months each) to {}",
        sites.len() + 1,
        months.len(),
        out_dir.display()
    );
    Ok(())
}
