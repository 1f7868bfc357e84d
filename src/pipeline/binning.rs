//! Numeric feature binning
//!
//! Maps the four raw numeric fields (age, flight distance, departure delay,
//! arrival delay) onto the discrete buckets the tree was trained on. The
//! boundary semantics are asymmetric on purpose:
//!
//! - age and distance use a half-open-low test `b[i] <= v < b[i+1]`, so a
//!   value exactly on a boundary joins the higher bucket;
//! - delays use `b[i] < v <= b[i+1]`, so exactly 0 minutes is "On time".
//!
//! A value matching no interval maps to the LAST label. For values above the
//! final boundary that is the intended open-ended tail bucket. Values below
//! the first boundary take the same path, which is a quirk inherited from the
//! reference behavior: training boundaries cover the observed domain, so this
//! only fires for out-of-domain inference inputs.

use serde::{Deserialize, Serialize};

/// The three persisted bin specs, flattened into the six fields the artifact
/// bundle stores (`bins_*` ascending boundaries, `labels_*` bucket names).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BinningConfig {
    pub bins_age: Vec<f64>,
    pub labels_age: Vec<String>,
    pub bins_delay: Vec<f64>,
    pub labels_delay: Vec<String>,
    pub bins_dist: Vec<f64>,
    pub labels_dist: Vec<String>,
}

impl BinningConfig {
    /// Standard boundaries. The distance tail boundary is data-dependent:
    /// pass the maximum observed flight distance from the training data.
    pub fn standard(max_distance: f64) -> Self {
        Self {
            bins_age: vec![0.0, 19.0, 29.0, 39.0, 49.0, 59.0, 120.0],
            labels_age: to_strings(&["<20", "20-29", "30-39", "40-49", "50-59", "60+"]),
            bins_delay: vec![-1.0, 0.0, 5.0, 15.0, 30.0, 100_000.0],
            labels_delay: to_strings(&[
                "On time",
                "Slightly delayed",
                "Moderately delayed",
                "Delayed",
                "Very delayed",
            ]),
            bins_dist: vec![0.0, 500.0, 1000.0, 1500.0, 2000.0, 2500.0, max_distance + 1.0],
            labels_dist: to_strings(&[
                "0-500",
                "501-1000",
                "1001-1500",
                "1501-2000",
                "2001-2500",
                "2500+",
            ]),
        }
    }

    pub fn bin_age(&self, age: f64) -> &str {
        bin_left_inclusive(&self.bins_age, &self.labels_age, age)
    }

    pub fn bin_distance(&self, distance: f64) -> &str {
        bin_left_inclusive(&self.bins_dist, &self.labels_dist, distance)
    }

    pub fn bin_delay(&self, delay: f64) -> &str {
        bin_right_inclusive(&self.bins_delay, &self.labels_delay, delay)
    }
}

fn to_strings(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|l| l.to_string()).collect()
}

/// Scan boundaries with `bounds[i] <= value < bounds[i+1]`; fall through to
/// the last label when no interval matches.
fn bin_left_inclusive<'a>(bounds: &[f64], labels: &'a [String], value: f64) -> &'a str {
    for i in 0..bounds.len() - 1 {
        if bounds[i] <= value && value < bounds[i + 1] {
            return &labels[i];
        }
    }
    &labels[labels.len() - 1]
}

/// Scan boundaries with `bounds[i] < value <= bounds[i+1]`; fall through to
/// the last label when no interval matches.
fn bin_right_inclusive<'a>(bounds: &[f64], labels: &'a [String], value: f64) -> &'a str {
    for i in 0..bounds.len() - 1 {
        if bounds[i] < value && value <= bounds[i + 1] {
            return &labels[i];
        }
    }
    &labels[labels.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BinningConfig {
        BinningConfig::standard(4982.0)
    }

    #[test]
    fn test_age_boundaries_left_inclusive() {
        let c = config();
        assert_eq!(c.bin_age(0.0), "<20");
        assert_eq!(c.bin_age(18.0), "<20");
        // A boundary value joins the higher bucket.
        assert_eq!(c.bin_age(19.0), "20-29");
        assert_eq!(c.bin_age(29.0), "30-39");
        assert_eq!(c.bin_age(59.0), "60+");
        assert_eq!(c.bin_age(85.0), "60+");
    }

    #[test]
    fn test_age_falls_through_to_last_label() {
        let c = config();
        // 120 matches no interval ([59, 120) excludes it) and takes the
        // tail bucket.
        assert_eq!(c.bin_age(120.0), "60+");
        assert_eq!(c.bin_age(500.0), "60+");
    }

    #[test]
    fn test_delay_boundaries_right_inclusive() {
        let c = config();
        // -1 < 0 <= 0 holds, so exactly zero minutes is on time.
        assert_eq!(c.bin_delay(0.0), "On time");
        assert_eq!(c.bin_delay(5.0), "Slightly delayed");
        assert_eq!(c.bin_delay(6.0), "Moderately delayed");
        assert_eq!(c.bin_delay(30.0), "Delayed");
        assert_eq!(c.bin_delay(31.0), "Very delayed");
        assert_eq!(c.bin_delay(99_999.0), "Very delayed");
    }

    #[test]
    fn test_distance_boundaries() {
        let c = config();
        assert_eq!(c.bin_distance(0.0), "0-500");
        assert_eq!(c.bin_distance(499.0), "0-500");
        assert_eq!(c.bin_distance(500.0), "501-1000");
        assert_eq!(c.bin_distance(2500.0), "2500+");
        assert_eq!(c.bin_distance(4982.0), "2500+");
    }

    #[test]
    fn test_every_in_domain_value_gets_a_known_label() {
        let c = config();
        for age in 0..200 {
            let label = c.bin_age(age as f64);
            assert!(c.labels_age.iter().any(|l| l == label));
        }
        for delay in 0..1000 {
            let label = c.bin_delay(delay as f64);
            assert!(c.labels_delay.iter().any(|l| l == label));
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = config();
        let json = serde_json::to_string(&c).unwrap();
        let back: BinningConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert_eq!(back.bin_age(42.0), "40-49");
    }
}
