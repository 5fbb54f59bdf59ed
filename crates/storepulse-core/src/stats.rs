//! Small statistical helpers shared by the analyzer stages.
//!
//! Undefined results (empty input, zero variance) are `None`, never zero and
//! never a panic. Downstream code propagates them as missing values.

/// Round half away from zero to `places` decimal places, like SQL `ROUND`.
pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}

pub fn mean(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }
  Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_stddev(values: &[f64]) -> Option<f64> {
  let avg = mean(values)?;
  let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>()
    / values.len() as f64;
  Some(variance.sqrt())
}

/// Running co-moments for the Pearson correlation of paired samples.
///
/// Updated one pair at a time (Welford's method) so a grouping pass never
/// materialises both sequences. The squared deviations are taken around the
/// running means, which keeps a constant input at exactly zero spread and
/// keeps small spreads on large values from cancelling away.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoMoments {
  pub n:      u64,
  mean_x:     f64,
  mean_y:     f64,
  /// Σ(x − x̄)²
  m2_x:       f64,
  /// Σ(y − ȳ)²
  m2_y:       f64,
  /// Σ(x − x̄)(y − ȳ)
  c_xy:       f64,
  min_x:      f64,
  max_x:      f64,
  min_y:      f64,
  max_y:      f64,
}

impl CoMoments {
  pub fn push(&mut self, x: f64, y: f64) {
    if self.n == 0 {
      (self.min_x, self.max_x) = (x, x);
      (self.min_y, self.max_y) = (y, y);
    } else {
      self.min_x = self.min_x.min(x);
      self.max_x = self.max_x.max(x);
      self.min_y = self.min_y.min(y);
      self.max_y = self.max_y.max(y);
    }

    self.n += 1;
    let n = self.n as f64;
    let dx = x - self.mean_x;
    let dy = y - self.mean_y;
    self.mean_x += dx / n;
    self.mean_y += dy / n;
    self.m2_x += dx * (x - self.mean_x);
    self.m2_y += dy * (y - self.mean_y);
    self.c_xy += dx * (y - self.mean_y);
  }

  /// Pearson correlation with population-style sums of squares:
  ///
  /// ```text
  /// Σ(x − x̄)(y − ȳ) / sqrt[Σ(x − x̄)² · Σ(y − ȳ)²]
  /// ```
  ///
  /// which equals `[Σxy − Σx·Σy/n] / sqrt[(Σx² − (Σx)²/n) · (Σy² − (Σy)²/n)]`.
  ///
  /// Returns `None` when either variable never changes (this includes a
  /// single pair) or when there are no pairs at all.
  pub fn pearson(&self) -> Option<f64> {
    if self.n == 0 || self.min_x == self.max_x || self.min_y == self.max_y {
      return None;
    }
    let denominator = (self.m2_x * self.m2_y).sqrt();
    if !denominator.is_finite() || denominator <= 0.0 {
      return None;
    }
    Some((self.c_xy / denominator).clamp(-1.0, 1.0))
  }
}

/// Pearson correlation between two paired sequences.
///
/// Pairs are formed positionally; surplus elements of the longer sequence
/// are ignored.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
  let mut moments = CoMoments::default();
  for (x, y) in xs.iter().zip(ys) {
    moments.push(*x, *y);
  }
  moments.pearson()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn close(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

  #[test]
  fn round_half_away_from_zero() {
    assert_eq!(round_to(2.375, 2), 2.38);
    assert_eq!(round_to(-2.5, 0), -3.0);
    assert_eq!(round_to(0.12349, 3), 0.123);
    assert_eq!(round_to(300.0, 2), 300.0);
  }

  #[test]
  fn mean_and_stddev() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
    // Population convention: sqrt(((2-5)^2 + ... ) / 8) = 2.
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert!(close(population_stddev(&values).unwrap(), 2.0));
    assert_eq!(population_stddev(&[42.0]), Some(0.0));
    assert_eq!(population_stddev(&[]), None);
  }

  #[test]
  fn perfect_positive_and_negative() {
    let xs = [1.0, 2.0, 3.0, 4.0];
    assert!(close(pearson(&xs, &[2.0, 4.0, 6.0, 8.0]).unwrap(), 1.0));
    assert!(close(pearson(&xs, &[8.0, 6.0, 4.0, 2.0]).unwrap(), -1.0));
  }

  #[test]
  fn matches_textbook_value() {
    let xs = [100.0, 200.0, 300.0, 400.0];
    let ys = [3.1, 2.9, 3.4, 3.3];
    // Σx=1000 Σy=12.7 Σxy=3230 Σx²=300000 Σy²=40.47
    // num = 3230 - 3175 = 55; den = sqrt(50000 * 0.1475)
    let expected = 55.0 / (50_000.0f64 * 0.1475).sqrt();
    assert!(close(pearson(&xs, &ys).unwrap(), expected));
  }

  #[test]
  fn zero_variance_is_none() {
    assert_eq!(pearson(&[1.0, 2.0, 3.0], &[2.7, 2.7, 2.7]), None);
    assert_eq!(pearson(&[5.0, 5.0], &[1.0, 2.0]), None);
    assert_eq!(pearson(&[1.0], &[1.0]), None);
    assert_eq!(pearson(&[], &[]), None);
  }

  #[test]
  fn constant_fractional_values_do_not_leak_noise() {
    let xs: Vec<f64> = (0..52).map(|i| 1000.0 + f64::from(i) * 13.7).collect();
    let ys = vec![3.141_592_653; 52];
    assert_eq!(pearson(&xs, &ys), None);
  }

  #[test]
  fn large_constant_group_is_none() {
    let xs: Vec<f64> = (0..100_000).map(|i| 1_000.0 + f64::from(i % 977) * 31.3).collect();
    assert_eq!(pearson(&xs, &vec![2.572; xs.len()]), None);

    let xs: Vec<f64> = (0..1_000_000).map(|i| 20_000.0 + f64::from(i % 4_999) * 7.9).collect();
    assert_eq!(pearson(&xs, &vec![7.368; xs.len()]), None);
  }

  #[test]
  fn small_spread_on_large_sales_is_kept() {
    let xs: Vec<f64> = (0..143).map(|i| 1_500_000.0 + f64::from(i % 2)).collect();
    let ys: Vec<f64> = (0..143).map(|i| if i % 2 == 0 { 3.00 } else { 3.01 }).collect();
    let r = pearson(&xs, &ys).unwrap();
    assert_eq!(round_to(r, 3), 1.0);
  }

  #[test]
  fn always_within_unit_interval() {
    let xs = [24_924.5, 46_039.49, 41_595.55, 19_403.54, 21_827.9];
    let ys = [2.572, 2.548, 2.514, 2.561, 2.625];
    let r = pearson(&xs, &ys).unwrap();
    assert!((-1.0..=1.0).contains(&r));
  }
}
