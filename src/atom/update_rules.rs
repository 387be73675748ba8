use ndarray::Array2;

use crate::types::Factors;

/// Elementwise multiplicative update: base * numer / (denom + eps)
///
/// With `eps == 0.0` a zero denominator yields inf/NaN, which the caller
/// detects through [`all_finite`].
pub fn multiplicative_update(
    base: &Array2<f64>,
    numer: &Array2<f64>,
    denom: &Array2<f64>,
    eps: f64,
) -> Array2<f64> {
    let mut result = base.clone();
    ndarray::Zip::from(&mut result)
        .and(numer)
        .and(denom)
        .for_each(|r, &n, &d| {
            *r *= n / (d + eps);
        });
    result
}

/// Frobenius norm ||Z - R*B*C||_F
pub fn reconstruction_norm(z: &Array2<f64>, factors: &Factors) -> f64 {
    let diff = z - &factors.reconstruct();
    diff.iter().map(|v| v * v).sum::<f64>().sqrt()
}

pub fn all_finite(factors: &Factors) -> bool {
    [&factors.r, &factors.b, &factors.c]
        .iter()
        .all(|m| m.iter().all(|v| v.is_finite()))
}
