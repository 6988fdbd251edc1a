use crate::domain::model::EvaluationMetrics;
use crate::utils::error::{MlopsError, Result};
use ndarray::Array1;

pub fn rmse(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let n = actual.len().max(1) as f64;
    ((actual - predicted).mapv(|d| d * d).sum() / n).sqrt()
}

pub fn mae(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let n = actual.len().max(1) as f64;
    (actual - predicted).mapv(f64::abs).sum() / n
}

/// Coefficient of determination. A constant target scores 1.0 only when
/// predicted exactly, otherwise 0.0.
pub fn r2_score(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let mean = actual.mean().unwrap_or(0.0);
    let ss_res = (actual - predicted).mapv(|d| d * d).sum();
    let ss_tot = actual.mapv(|v| (v - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

pub fn evaluate(actual: &Array1<f64>, predicted: &Array1<f64>) -> Result<EvaluationMetrics> {
    if actual.len() != predicted.len() {
        return Err(MlopsError::DimensionMismatch {
            expected: format!("{} predictions", actual.len()),
            actual: format!("{} predictions", predicted.len()),
        });
    }
    if actual.is_empty() {
        return Err(MlopsError::ProcessingError {
            message: "Cannot evaluate on an empty test set".to_string(),
        });
    }

    Ok(EvaluationMetrics {
        rmse: rmse(actual, predicted),
        mae: mae(actual, predicted),
        r2: r2_score(actual, predicted),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_metrics_by_hand() {
        let actual = array![3.0, 5.0, 7.0, 9.0];
        let predicted = array![2.0, 5.0, 8.0, 9.0];

        let metrics = evaluate(&actual, &predicted).unwrap();
        // 殘差 [1, 0, -1, 0]
        assert!((metrics.rmse - (0.5f64).sqrt()).abs() < 1e-12);
        assert!((metrics.mae - 0.5).abs() < 1e-12);
        // ss_res = 2, ss_tot = 20
        assert!((metrics.r2 - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_constant_target() {
        let actual = array![4.0, 4.0];
        assert_eq!(r2_score(&actual, &array![4.0, 4.0]), 1.0);
        assert_eq!(r2_score(&actual, &array![4.0, 5.0]), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(evaluate(&array![1.0, 2.0], &array![1.0]).is_err());
        assert!(evaluate(&Array1::zeros(0), &Array1::zeros(0)).is_err());
    }
}
