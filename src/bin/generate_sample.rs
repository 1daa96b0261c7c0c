use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::json;

const CITIES: [&str; 5] = ["Lucknow", "Jaipur", "Patna", "Varanasi", "Ranchi"];
const CATEGORIES: [&str; 4] = ["Government", "FMCG", "Real Estate", "Automobile"];
const MONTHS: [&str; 12] = [
    "2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08",
    "2024-09", "2024-10", "2024-11", "2024-12",
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

    /// Uniform in `lo..hi`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn write_csv(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Datasets"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // Headers are deliberately messy; the dashboard normalizes them.
    let ad_rows: Vec<Vec<String>> = CATEGORIES
        .iter()
        .flat_map(|cat| CITIES.iter().map(move |city| (cat, city)))
        .map(|(cat, city)| {
            let code = if rng.next_f64() < 0.2 {
                "N/A".to_string()
            } else {
                format!("{}", (rng.next_f64() * 900.0) as u32 + 100)
            };
            vec![
                cat.to_string(),
                format!("{:.2}", rng.range(2.0, 40.0)),
                city.to_string(),
                code,
            ]
        })
        .collect();
    write_csv(
        &out_dir.join("fact_ad_revenue.csv"),
        &["Category", " Revenue ", "City", "Campaign Code"],
        &ad_rows,
    )?;

    let city_rows: Vec<Vec<String>> = CITIES
        .iter()
        .map(|city| vec![city.to_string(), format!("{:.1}", rng.range(3.0, 9.5))])
        .collect();
    write_csv(
        &out_dir.join("fact_city_readiness.csv"),
        &["City", "ReadinessScore"],
        &city_rows,
    )?;

    let pilot_rows: Vec<Vec<String>> = CITIES
        .iter()
        .map(|city| {
            vec![
                city.to_string(),
                format!("{:.3}", rng.range(0.1, 0.8)),
                format!("{}", rng.range(500.0, 20_000.0) as u32),
            ]
        })
        .collect();
    write_csv(
        &out_dir.join("fact_digital_pilot.csv"),
        &["City", "Engagement", "Users"],
        &pilot_rows,
    )?;

    let mut circulation = 120_000.0;
    let print_rows: Vec<Vec<String>> = MONTHS
        .iter()
        .map(|month| {
            circulation *= rng.range(0.95, 1.0);
            let returned = circulation * rng.range(0.05, 0.15);
            vec![
                month.to_string(),
                format!("{}", circulation as u32),
                format!("{}", returned as u32),
                format!("{}", (circulation - returned) as u32),
            ]
        })
        .collect();
    write_csv(
        &out_dir.join("fact_print_sales.csv"),
        &["Month", "Copies Sold", "Copies Returned", "Net Circulation"],
        &print_rows,
    )?;

    let config_path = Path::new("dashboard.json");
    if write_config(config_path, &out_dir)? {
        println!("Wrote {}", config_path.display());
    } else {
        println!(
            "{} already exists, left untouched; set HERALD_DATA_DIR={} to use the samples",
            config_path.display(),
            out_dir.display()
        );
    }

    Ok(())
}

/// Write a config pointing at `out_dir`. Returns `false` without touching
/// anything when `path` already exists.
fn write_config(path: &Path, out_dir: &Path) -> Result<bool> {
    // No spreadsheet writer in the stack, so print sales ships as CSV.
    let config = json!({
        "data_dir": out_dir,
        "print_sales": "fact_print_sales.csv",
    });
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e).with_context(|| format!("creating {}", path.display())),
    };
    file.write_all(serde_json::to_string_pretty(&config)?.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn config_points_at_output_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        assert!(write_config(&path, Path::new("samples")).unwrap());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["data_dir"], "samples");
        assert_eq!(written["print_sales"], "fact_print_sales.csv");
    }

    #[test]
    fn existing_config_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{ "data_dir": "/srv/herald" }"#).unwrap();

        assert!(!write_config(&path, Path::new("samples")).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#"{ "data_dir": "/srv/herald" }"#
        );
    }
}
