//! Piecewise-linear interpolation over tabulated sample points, and the
//! loss-rate table format consumed by energy-loss modules.

use std::fs;
use std::path::Path;

use perseid_core::units::{EV, MPC};
use perseid_core::ConfigError;

/// Piecewise-linear lookup of `x` in the ordered table `(xs, ys)`.
///
/// `xs` must be non-decreasing with `ys` the matching values. Strictly
/// between two samples the result is the linear interpolation; at or
/// below the first sample it is `ys[0]`, at or above the last it is the
/// last `y` — no extrapolation, callers needing one must guard the
/// range themselves. Runs in O(log n) via binary search; this is a hot
/// path invoked once per candidate per step.
///
/// # Panics
///
/// Panics if the slices are empty or of unequal length. Table-backed
/// callers never hit this: [`LossRateTable`] construction rejects such
/// tables as configuration errors.
pub fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    assert_eq!(xs.len(), ys.len(), "sample and value columns must match");
    assert!(!xs.is_empty(), "interpolation table must not be empty");

    if x <= xs[0] {
        return ys[0];
    }
    let n = xs.len();
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    // first index with xs[i] > x; in (1, n) after the edge checks
    let hi = xs.partition_point(|&s| s <= x);
    let lo = hi - 1;
    let span = xs[hi] - xs[lo];
    if span == 0.0 {
        return ys[lo];
    }
    let t = (x - xs[lo]) / span;
    ys[lo] + (ys[hi] - ys[lo]) * t
}

/// A tabulated mapping from particle energy to energy-loss rate, in SI
/// units (J and J/m), ordered by energy.
///
/// Immutable after construction; energy-loss modules hold it shared and
/// read it concurrently from many candidate-processing tasks.
#[derive(Clone, Debug, PartialEq)]
pub struct LossRateTable {
    energy: Vec<f64>,
    loss_rate: Vec<f64>,
}

impl LossRateTable {
    /// Build a table from matching energy and loss-rate columns (SI
    /// units). Rejects empty or mismatched columns and non-decreasing
    /// violations of the energy column.
    pub fn from_columns(
        energy: Vec<f64>,
        loss_rate: Vec<f64>,
        source: &str,
    ) -> Result<Self, ConfigError> {
        if energy.len() != loss_rate.len() {
            return Err(ConfigError::InvalidOption {
                option: "loss_rate".into(),
                reason: format!(
                    "column lengths differ: {} energies vs {} rates",
                    energy.len(),
                    loss_rate.len()
                ),
            });
        }
        if energy.is_empty() {
            return Err(ConfigError::EmptyTable {
                source: source.into(),
            });
        }
        if energy.windows(2).any(|w| w[1] < w[0]) {
            return Err(ConfigError::NonMonotonicTable {
                source: source.into(),
            });
        }
        Ok(Self { energy, loss_rate })
    }

    /// Load a table from a plain-text data file.
    ///
    /// Lines beginning with `#` are comments. Every other line carries
    /// two whitespace-separated numeric fields, `energy_eV` and
    /// `loss_rate_eV_per_Mpc`, converted to SI on load. The first
    /// malformed line ends the read silently — trailing junk is not an
    /// error — but an unreadable file or an empty resulting table is a
    /// [`ConfigError`] naming the path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::FileUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut energy = Vec::new();
        let mut loss_rate = Vec::new();
        'lines: for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            match (
                fields.next().and_then(|f| f.parse::<f64>().ok()),
                fields.next().and_then(|f| f.parse::<f64>().ok()),
            ) {
                (Some(e), Some(rate)) => {
                    energy.push(e * EV);
                    loss_rate.push(rate * EV / MPC);
                }
                _ => break 'lines,
            }
        }

        Self::from_columns(energy, loss_rate, &path.display().to_string())
    }

    /// The ordered energy sample points, in joule.
    pub fn energies(&self) -> &[f64] {
        &self.energy
    }

    /// The loss-rate values matching [`Self::energies`], in J/m.
    pub fn loss_rates(&self) -> &[f64] {
        &self.loss_rate
    }

    /// Lowest tabulated energy.
    pub fn min_energy(&self) -> f64 {
        self.energy[0]
    }

    /// Highest tabulated energy.
    pub fn max_energy(&self) -> f64 {
        self.energy[self.energy.len() - 1]
    }

    /// Interpolated loss rate at `energy` (J), clamped to the table
    /// range like [`interpolate`].
    pub fn rate(&self, energy: f64) -> f64 {
        interpolate(energy, &self.energy, &self.loss_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> (Vec<f64>, Vec<f64>) {
        (vec![1.0, 2.0, 4.0, 8.0], vec![10.0, 20.0, 10.0, 40.0])
    }

    #[test]
    fn clamps_below_and_above_range() {
        let (xs, ys) = table();
        assert_eq!(interpolate(0.5, &xs, &ys), 10.0);
        assert_eq!(interpolate(1.0, &xs, &ys), 10.0);
        assert_eq!(interpolate(8.0, &xs, &ys), 40.0);
        assert_eq!(interpolate(100.0, &xs, &ys), 40.0);
    }

    #[test]
    fn midpoint_is_arithmetic_mean() {
        let (xs, ys) = table();
        assert_eq!(interpolate(1.5, &xs, &ys), 15.0);
        assert_eq!(interpolate(3.0, &xs, &ys), 15.0);
        assert_eq!(interpolate(6.0, &xs, &ys), 25.0);
    }

    #[test]
    fn exact_samples_reproduce_values() {
        let (xs, ys) = table();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_eq!(interpolate(*x, &xs, &ys), *y);
        }
    }

    #[test]
    fn duplicate_sample_points_do_not_divide_by_zero() {
        let xs = vec![1.0, 2.0, 2.0, 3.0];
        let ys = vec![0.0, 5.0, 9.0, 9.0];
        let v = interpolate(2.0, &xs, &ys);
        assert!(v.is_finite());
    }

    #[test]
    fn from_columns_rejects_bad_tables() {
        assert!(matches!(
            LossRateTable::from_columns(vec![], vec![], "t"),
            Err(ConfigError::EmptyTable { .. })
        ));
        assert!(matches!(
            LossRateTable::from_columns(vec![1.0, 2.0], vec![1.0], "t"),
            Err(ConfigError::InvalidOption { .. })
        ));
        assert!(matches!(
            LossRateTable::from_columns(vec![2.0, 1.0], vec![0.0, 0.0], "t"),
            Err(ConfigError::NonMonotonicTable { .. })
        ));
    }

    #[test]
    fn file_round_trip_reproduces_interpolation() {
        let energies_ev = [1e15, 1e16, 1e17, 1e18];
        let rates = [0.5, 2.0, 8.0, 32.0];
        let mut text = String::from("# epair loss rates\n# energy_eV loss_rate_eV_per_Mpc\n");
        for (e, r) in energies_ev.iter().zip(rates.iter()) {
            text.push_str(&format!("{e:e}\t{r:e}\n"));
        }

        let path = std::env::temp_dir().join(format!(
            "perseid-loss-{}-{:?}.txt",
            std::process::id(),
            std::thread::current().id()
        ));
        fs::write(&path, &text).unwrap();
        let from_file = LossRateTable::from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        let reference = LossRateTable::from_columns(
            energies_ev.iter().map(|e| e * EV).collect(),
            rates.iter().map(|r| r * EV / MPC).collect(),
            "reference",
        )
        .unwrap();

        for &e in reference.energies() {
            let a = from_file.rate(e);
            let b = reference.rate(e);
            assert!((a - b).abs() <= 1e-12 * b.abs().max(1e-300));
        }
    }

    #[test]
    fn malformed_trailing_line_ends_read_silently() {
        let path = std::env::temp_dir().join(format!(
            "perseid-trunc-{}-{:?}.txt",
            std::process::id(),
            std::thread::current().id()
        ));
        fs::write(&path, "# header\n1e15 1.0\n1e16 2.0\nnot a number\n1e17 4.0\n").unwrap();
        let table = LossRateTable::from_file(&path).unwrap();
        fs::remove_file(&path).ok();
        // the read stops at the malformed line, dropping everything after it
        assert_eq!(table.energies().len(), 2);
    }

    #[test]
    fn missing_file_is_a_config_error_naming_the_path() {
        let err = LossRateTable::from_file("/nonexistent/perseid/epair.txt").unwrap_err();
        assert!(err.to_string().contains("epair.txt"));
    }

    proptest! {
        // interpolation never leaves the envelope of neighboring values
        #[test]
        fn result_bounded_by_neighbor_values(x in -10.0f64..20.0) {
            let (xs, ys) = table();
            let v = interpolate(x, &xs, &ys);
            let lo = ys.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(v >= lo && v <= hi);
        }

        // binary-search lookup agrees with a linear scan
        #[test]
        fn agrees_with_linear_scan(x in 1.0f64..8.0) {
            let (xs, ys) = table();
            let fast = interpolate(x, &xs, &ys);
            let mut slow = ys[ys.len() - 1];
            for i in 0..xs.len() - 1 {
                if x >= xs[i] && x < xs[i + 1] {
                    let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
                    slow = ys[i] + (ys[i + 1] - ys[i]) * t;
                    break;
                }
            }
            prop_assert!((fast - slow).abs() < 1e-12);
        }
    }
}
