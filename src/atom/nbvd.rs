use ndarray::Array2;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use crate::types::{Factors, NbvdError};

use super::tri_factor_base::TriFactorUpdater;
use super::update_rules::multiplicative_update;

/// NBVD (Long 2005): multiplicative updates for Z ≈ R*B*C
pub struct NbvdUpdater {
    pub eps: f64,
}

impl TriFactorUpdater for NbvdUpdater {
    fn update_r(&self, z: &Array2<f64>, r: &mut Array2<f64>, b: &Array2<f64>, c: &Array2<f64>) {
        // R ← R * (Z*C^T*B^T) / (R*B*C*C^T*B^T)
        // Denominator through C*C^T (l×l) to skip the n×m product
        let cct = c.dot(&c.t()); // l×l
        let numer = z.dot(&c.t()).dot(&b.t()); // n×k
        let denom = r.dot(b).dot(&cct).dot(&b.t()); // n×k
        *r = multiplicative_update(r, &numer, &denom, self.eps);
    }

    fn update_b(&self, z: &Array2<f64>, r: &Array2<f64>, b: &mut Array2<f64>, c: &Array2<f64>) {
        // B ← B * (R^T*Z*C^T) / (R^T*R*B*C*C^T)
        let rtr = r.t().dot(r); // k×k
        let cct = c.dot(&c.t()); // l×l
        let numer = r.t().dot(z).dot(&c.t()); // k×l
        let denom = rtr.dot(&*b).dot(&cct); // k×l
        *b = multiplicative_update(b, &numer, &denom, self.eps);
    }

    fn update_c(&self, z: &Array2<f64>, r: &Array2<f64>, b: &Array2<f64>, c: &mut Array2<f64>) {
        // C ← C * (B^T*R^T*Z) / (B^T*R^T*R*B*C)
        let rtr = r.t().dot(r); // k×k
        let numer = b.t().dot(&r.t()).dot(z); // l×m
        let denom = b.t().dot(&rtr).dot(b).dot(&*c); // l×m
        *c = multiplicative_update(c, &numer, &denom, self.eps);
    }
}

/// Symmetric NBVD for square Z ≈ S*B*S^T. C is kept equal to S^T.
pub struct SymmetricNbvdUpdater {
    pub eps: f64,
}

impl TriFactorUpdater for SymmetricNbvdUpdater {
    fn update_r(&self, z: &Array2<f64>, s: &mut Array2<f64>, b: &Array2<f64>, _c: &Array2<f64>) {
        // S ← S * (Z*S*B) / (S*B*S^T*S*B)
        let sts = s.t().dot(&*s); // k×k
        let numer = z.dot(&*s).dot(b); // n×k
        let denom = s.dot(b).dot(&sts).dot(b); // n×k
        *s = multiplicative_update(s, &numer, &denom, self.eps);
    }

    fn update_b(&self, z: &Array2<f64>, s: &Array2<f64>, b: &mut Array2<f64>, _c: &Array2<f64>) {
        // B ← B * (S^T*Z*S) / (S^T*S*B*S^T*S)
        let sts = s.t().dot(s); // k×k
        let numer = s.t().dot(z).dot(s); // k×k
        let denom = sts.dot(&*b).dot(&sts); // k×k
        *b = multiplicative_update(b, &numer, &denom, self.eps);
    }

    fn update_c(&self, _z: &Array2<f64>, s: &Array2<f64>, _b: &Array2<f64>, c: &mut Array2<f64>) {
        *c = s.t().to_owned();
    }
}

/// Pick the update rule for the requested mode
pub fn updater(symmetric: bool, eps: f64) -> Box<dyn TriFactorUpdater> {
    if symmetric {
        Box::new(SymmetricNbvdUpdater { eps })
    } else {
        Box::new(NbvdUpdater { eps })
    }
}

/// Starting point of one attempt.
///
/// R ~ U[0,1) (n×k), B = mean(Z) everywhere (k×l), C ~ U[0,1) (l×m).
/// Symmetric mode draws only R and sets C = R^T.
pub fn init_factors(
    z: &Array2<f64>,
    k: usize,
    l: usize,
    symmetric: bool,
    rng: &mut StdRng,
) -> Result<Factors, NbvdError> {
    let (n, m) = z.dim();
    if k == 0 || l == 0 {
        return Err(NbvdError::InvalidClusterCount { rows: k, cols: l });
    }
    let mean = z.mean().ok_or(NbvdError::EmptyMatrix)?;

    let r = Array2::random_using((n, k), Uniform::new(0.0, 1.0), rng);
    let b = Array2::from_elem((k, l), mean);

    if symmetric {
        if n != m {
            return Err(NbvdError::NonSquareSymmetric { rows: n, cols: m });
        }
        if k != l {
            return Err(NbvdError::SymmetricClusterMismatch { rows: k, cols: l });
        }
        let c = r.t().to_owned();
        return Ok(Factors::new(r, b, c));
    }

    let c = Array2::random_using((l, m), Uniform::new(0.0, 1.0), rng);
    Ok(Factors::new(r, b, c))
}
