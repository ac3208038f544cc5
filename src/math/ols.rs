//! Least squares line fitting.
//!
//! The forecast regresses a rate series on its integer position:
//!
//! ```text
//! y_i = intercept + slope * i,   i = 0..n-1
//! ```
//!
//! The solve goes through SVD so a rank-deficient design comes back as `None`
//! rather than a panic. The reported standard error is the standard error of
//! the slope estimate, `sqrt(s² / Sxx)` with `s² = SSR / (n - 2)`.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Why a line fit could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    /// Fewer than three observations leave no degrees of freedom for the error.
    TooFewPoints(usize),
    /// Input contains NaN or infinite values.
    NonFinite,
    /// The least squares solve failed.
    Degenerate,
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::TooFewPoints(n) => write!(f, "need at least 3 points for a line fit, got {n}"),
            FitError::NonFinite => write!(f, "series contains non-finite values"),
            FitError::Degenerate => write!(f, "least squares solve failed"),
        }
    }
}

impl std::error::Error for FitError {}

/// Ordinary least squares line over the trend index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Standard error of the slope estimate.
    pub std_err: f64,
    pub n: usize,
}

impl LinearFit {
    /// Evaluate the fitted line at trend index `i`.
    pub fn predict(&self, i: f64) -> f64 {
        self.intercept + self.slope * i
    }
}

/// Fit `y` against the trend index `0..n`.
pub fn fit_trend_line(y: &[f64]) -> Result<LinearFit, FitError> {
    let n = y.len();
    if n < 3 {
        return Err(FitError::TooFewPoints(n));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }

    let design = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { row as f64 });
    let target = DVector::from_column_slice(y);
    let beta = solve_least_squares(&design, &target).ok_or(FitError::Degenerate)?;
    let (intercept, slope) = (beta[0], beta[1]);

    let ssr: f64 = y
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let r = v - (intercept + slope * i as f64);
            r * r
        })
        .sum();
    let x_mean = (n - 1) as f64 / 2.0;
    let sxx: f64 = (0..n).map(|i| (i as f64 - x_mean).powi(2)).sum();

    let s2 = ssr / (n - 2) as f64;
    let std_err = (s2 / sxx).sqrt();

    if !(slope.is_finite() && intercept.is_finite() && std_err.is_finite()) {
        return Err(FitError::Degenerate);
    }

    Ok(LinearFit {
        slope,
        intercept,
        std_err,
        n,
    })
}
