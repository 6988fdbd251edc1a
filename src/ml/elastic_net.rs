//! ElasticNet linear regression (combined L1 + L2 penalty), fitted by
//! cyclic coordinate descent.
//!
//! Minimises `1/(2n) ||y - Xw - b||² + alpha * l1_ratio * ||w||₁
//! + alpha * (1 - l1_ratio) / 2 * ||w||²`.

use crate::utils::error::{MlopsError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticNet {
    pub alpha: f64,
    /// 0.0 = pure ridge, 1.0 = pure lasso
    pub l1_ratio: f64,
    pub max_iter: usize,
    pub tol: f64,
    pub fit_intercept: bool,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl Default for ElasticNet {
    fn default() -> Self {
        Self::new(1.0, 0.5)
    }
}

impl ElasticNet {
    pub fn new(alpha: f64, l1_ratio: f64) -> Self {
        Self {
            alpha: alpha.max(0.0),
            l1_ratio: l1_ratio.clamp(0.0, 1.0),
            max_iter: 1000,
            tol: 1e-6,
            fit_intercept: true,
            coefficients: None,
            intercept: 0.0,
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    fn soft_threshold(value: f64, threshold: f64) -> f64 {
        if value > threshold {
            value - threshold
        } else if value < -threshold {
            value + threshold
        } else {
            0.0
        }
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 {
            return Err(MlopsError::ProcessingError {
                message: "Cannot fit on an empty training set".to_string(),
            });
        }
        if n_samples != y.len() {
            return Err(MlopsError::DimensionMismatch {
                expected: format!("{} targets", n_samples),
                actual: format!("{} targets", y.len()),
            });
        }

        // 先置中，截距最後再還原
        let (x_c, y_c, x_mean, y_mean) = if self.fit_intercept {
            let x_mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(n_features));
            let y_mean = y.mean().unwrap_or(0.0);
            (x - &x_mean.view().insert_axis(Axis(0)), y - y_mean, x_mean, y_mean)
        } else {
            (x.clone(), y.clone(), Array1::zeros(n_features), 0.0)
        };

        let col_norms: Vec<f64> = (0..n_features)
            .map(|j| x_c.column(j).mapv(|v| v * v).sum())
            .collect();

        let n = n_samples as f64;
        let l1_penalty = self.alpha * self.l1_ratio * n;
        let l2_penalty = self.alpha * (1.0 - self.l1_ratio) * n;

        let mut w = Array1::<f64>::zeros(n_features);
        let mut residual = y_c.clone();

        for iter in 0..self.max_iter {
            let mut max_delta: f64 = 0.0;

            for j in 0..n_features {
                let denom = col_norms[j] + l2_penalty;
                if denom < 1e-15 {
                    continue;
                }
                let old = w[j];
                let rho = x_c.column(j).dot(&residual) + col_norms[j] * old;
                let new = Self::soft_threshold(rho, l1_penalty) / denom;

                if new != old {
                    residual.scaled_add(old - new, &x_c.column(j));
                    w[j] = new;
                    max_delta = max_delta.max((new - old).abs());
                }
            }

            if max_delta < self.tol {
                tracing::debug!("ElasticNet converged after {} iterations", iter + 1);
                break;
            }
        }

        self.intercept = if self.fit_intercept {
            y_mean - w.dot(&x_mean)
        } else {
            0.0
        };
        self.coefficients = Some(w);
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or(MlopsError::ModelNotFitted)?;
        if x.ncols() != coefficients.len() {
            return Err(MlopsError::DimensionMismatch {
                expected: format!("{} feature columns", coefficients.len()),
                actual: format!("{} feature columns", x.ncols()),
            });
        }
        Ok(x.dot(coefficients) + self.intercept)
    }
}
