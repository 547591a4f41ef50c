use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use merkle_proof::Result;

/// Summary of repeated timings, in milliseconds.
#[derive(Debug, Clone)]
pub struct Stat {
  pub count: usize,
  pub mean: f64,
  pub median: f64,
  pub std_dev: f64,
  pub min: f64,
  pub max: f64,
}

impl Stat {
  pub fn from_vec(mut data: Vec<f64>) -> Stat {
    if data.is_empty() {
      return Stat { count: 0, mean: f64::NAN, median: f64::NAN, std_dev: f64::NAN, min: f64::NAN, max: f64::NAN };
    }
    data.sort_by(f64::total_cmp);
    let count = data.len();
    let min = data[0];
    let max = data[count - 1];
    let mean = data.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 0 { (data[count / 2 - 1] + data[count / 2]) / 2.0 } else { data[count / 2] };
    let variance = data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / count as f64;
    let std_dev = variance.sqrt();
    Stat { count, mean, median, std_dev, min, max }
  }
}

impl Display for Stat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // 2σ relative to the mean
    let two_sigma_percent = if self.mean > 0.0 { (2.0 * self.std_dev / self.mean) * 100.0 } else { 0.0 };
    write!(
      f,
      "{}: {:.3}ms ±{:.1}% [{:.3}|{:.3}|{:.3}]",
      self.count, self.mean, two_sigma_percent, self.min, self.median, self.max
    )
  }
}

/// Timings grouped by tree size and phase.
pub struct Report<X: Display + Copy + Ord> {
  data_set: BTreeMap<(X, &'static str), Vec<f64>>,
}

impl<X: Display + Copy + Ord> Report<X> {
  pub fn new() -> Self {
    Report { data_set: BTreeMap::new() }
  }

  pub fn add(&mut self, x: X, phase: &'static str, y: Duration) {
    self.data_set.entry((x, phase)).or_default().push(y.as_nanos() as f64 / 1_000_000.0);
  }

  pub fn single(&self, x: X, phase: &'static str) -> Stat {
    Stat::from_vec(self.data_set.get(&(x, phase)).cloned().unwrap_or_default())
  }

  pub fn save_to_csv(&self, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "N,PHASE,COUNT,MEAN,MEDIAN,STDDEV,MIN,MAX")?;
    for ((x, phase), ys) in self.data_set.iter() {
      let y = Stat::from_vec(ys.clone());
      writeln!(
        writer,
        "\"{}\",{},{},{:.3},{:.3},{:.3},{:.3},{:.3}",
        x, phase, y.count, y.mean, y.median, y.std_dev, y.min, y.max
      )?;
    }
    writer.flush()?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::NamedTempFile;

  #[test]
  fn stat_summary() {
    let s = Stat::from_vec(vec![4.0, 1.0, 3.0, 2.0]);
    assert_eq!(4, s.count);
    assert_eq!(2.5, s.mean);
    assert_eq!(2.5, s.median);
    assert_eq!(1.0, s.min);
    assert_eq!(4.0, s.max);
    assert!((s.std_dev - 1.25f64.sqrt()).abs() < 1e-12);

    let s = Stat::from_vec(vec![]);
    assert_eq!(0, s.count);
    assert!(s.mean.is_nan());
  }

  #[test]
  fn report_csv() {
    let mut report = Report::new();
    report.add(100u64, "prove", Duration::from_millis(2));
    report.add(100u64, "prove", Duration::from_millis(4));
    report.add(10u64, "verify", Duration::from_micros(500));
    assert_eq!(3.0, report.single(100, "prove").mean);
    assert_eq!(0, report.single(100, "verify").count);

    let file = NamedTempFile::new().unwrap();
    report.save_to_csv(file.path()).unwrap();
    let csv = std::fs::read_to_string(file.path()).unwrap();
    let lines = csv.lines().collect::<Vec<_>>();
    assert_eq!("N,PHASE,COUNT,MEAN,MEDIAN,STDDEV,MIN,MAX", lines[0]);
    assert_eq!("\"10\",verify,1,0.500,0.500,0.000,0.500,0.500", lines[1]);
    assert_eq!("\"100\",prove,2,3.000,3.000,1.000,2.000,4.000", lines[2]);
  }
}
