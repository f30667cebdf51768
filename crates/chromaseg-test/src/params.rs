//! Regression test parameters and comparisons

use crate::error::{TestError, TestResult};
use chromaseg_core::LabelImage;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare and record failures (default)
    #[default]
    Compare,
    /// Compare and also print the label images involved
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running comparison index and every failure
/// seen so far.
pub struct RegParams {
    /// Name of the test (e.g., "colorseg")
    pub test_name: String,
    /// Current comparison index (incremented before each comparison)
    index: usize,
    pub mode: RegTestMode,
    failures: Vec<TestError>,
}

impl RegParams {
    /// Create new regression test parameters, reading the mode from the
    /// environment.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            failures: Vec::new(),
        }
    }

    /// Get the current comparison index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    /// Compare two floating-point values
    ///
    /// # Returns
    ///
    /// `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();
        if diff > delta {
            self.fail(TestError::ValueMismatch {
                index: self.index,
                expected,
                actual,
                delta,
            });
            false
        } else {
            true
        }
    }

    /// Record a boolean condition as a comparison against `true`.
    pub fn check_true(&mut self, cond: bool) -> bool {
        self.compare_values(1.0, if cond { 1.0 } else { 0.0 }, 0.0)
    }

    /// Compare two label images for exact equality
    pub fn compare_labels(&mut self, expected: &LabelImage, actual: &LabelImage) -> bool {
        self.index += 1;

        if self.display() {
            eprintln!("[{}] expected:\n{}", self.index, render(expected));
            eprintln!("[{}] actual:\n{}", self.index, render(actual));
        }

        if expected.dimensions() != actual.dimensions() {
            self.fail(TestError::SizeMismatch { index: self.index });
            return false;
        }

        let w = expected.width();
        for (i, (a, b)) in expected.labels().iter().zip(actual.labels()).enumerate() {
            if a != b {
                self.fail(TestError::LabelMismatch {
                    index: self.index,
                    x: i as u32 % w,
                    y: i as u32 / w,
                });
                return false;
            }
        }
        true
    }

    fn fail(&mut self, err: TestError) {
        eprintln!("Failure in {}_reg: {}", self.test_name, err);
        self.failures.push(err);
    }

    /// Return the first recorded failure, if any.
    pub fn check(&self) -> TestResult<()> {
        self.failures.first().cloned().map_or(Ok(()), Err)
    }

    /// Report results
    ///
    /// # Returns
    ///
    /// `true` if all comparisons passed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.failures.is_empty()
    }

    /// Check if all comparisons have passed so far
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Recorded failures
    pub fn failures(&self) -> &[TestError] {
        &self.failures
    }
}

/// One character per label, rows separated by newlines.
fn render(labels: &LabelImage) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = String::new();
    for row in labels.labels().chunks_exact(labels.width() as usize) {
        for &l in row {
            out.push(DIGITS.get(l as usize).map_or('#', |&c| c as char));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_env() {
        let mode = RegTestMode::from_env();
        assert!(matches!(mode, RegTestMode::Compare | RegTestMode::Display));
    }

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert!(rp.is_success());
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert!(matches!(
            rp.check(),
            Err(TestError::ValueMismatch { index: 2, .. })
        ));
    }

    #[test]
    fn test_compare_labels() {
        let a = LabelImage::from_labels(2, 2, vec![0, 1, 1, 0]).unwrap();
        let b = LabelImage::from_labels(2, 2, vec![0, 1, 0, 0]).unwrap();
        let mut rp = RegParams::new("test");
        assert!(rp.compare_labels(&a, &a));
        assert!(!rp.compare_labels(&a, &b));
        assert!(matches!(
            rp.failures()[0],
            TestError::LabelMismatch { index: 2, x: 0, y: 1 }
        ));
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_render() {
        let a = LabelImage::from_labels(3, 1, vec![0, 10, 200]).unwrap();
        assert_eq!(render(&a), "0a#\n");
    }
}
