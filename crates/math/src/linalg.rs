//! Linear algebra operations for component decomposition.

use ndarray::{Array1, Array2};

use crate::MathError;

/// Upper bound on Jacobi sweeps; convergence is quadratic so this is never reached
/// for well-formed covariance matrices.
const MAX_SWEEPS: usize = 100;

/// Eigen-decomposition of a symmetric matrix.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// Eigenvalues, sorted in descending order.
    pub values: Array1<f64>,
    /// Eigenvectors as columns, aligned with `values`.
    pub vectors: Array2<f64>,
}

/// Decompose a symmetric matrix with the cyclic Jacobi method.
///
/// Rotations are applied in a fixed `(p, q)` order, so the result is fully
/// deterministic for a given input. Eigenvalues are returned in descending
/// order; ties keep their diagonal order.
///
/// # Arguments
/// * `a` - Symmetric matrix (n x n)
///
/// # Returns
/// Eigenvalues and column eigenvectors.
///
/// # Errors
/// Returns error if the matrix is empty, not square, or holds non-finite values.
pub fn symmetric_eigen(a: &Array2<f64>) -> Result<SymmetricEigen, MathError> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.ncols() != n {
        return Err(MathError::LinearAlgebra("matrix must be square".to_string()));
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("matrix contains NaN or Inf".to_string()));
    }

    let mut m = a.clone();
    let mut v = Array2::<f64>::eye(n);

    let frobenius_sq: f64 = m.iter().map(|x| x * x).sum();
    let tolerance = f64::EPSILON * f64::EPSILON * frobenius_sq;

    for _ in 0..MAX_SWEEPS {
        let off_diagonal_sq: f64 = (0..n)
            .flat_map(|p| ((p + 1)..n).map(move |q| (p, q)))
            .map(|(p, q)| m[[p, q]].powi(2))
            .sum();
        if off_diagonal_sq <= tolerance {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = m[[p, q]];
                if apq == 0.0 {
                    continue;
                }

                // Rotation angle chosen so that m[p, q] vanishes.
                let theta = (m[[q, q]] - m[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + theta.mul_add(theta, 1.0).sqrt());
                let c = 1.0 / t.mul_add(t, 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let mkp = m[[k, p]];
                    let mkq = m[[k, q]];
                    m[[k, p]] = c * mkp - s * mkq;
                    m[[k, q]] = s * mkp + c * mkq;
                }
                for k in 0..n {
                    let mpk = m[[p, k]];
                    let mqk = m[[q, k]];
                    m[[p, k]] = c * mpk - s * mqk;
                    m[[q, k]] = s * mpk + c * mqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| m[[j, j]].total_cmp(&m[[i, i]]));

    let values = Array1::from_iter(order.iter().map(|&i| m[[i, i]]));
    let mut vectors = Array2::zeros((n, n));
    for (dst, &src) in order.iter().enumerate() {
        vectors.column_mut(dst).assign(&v.column(src));
    }

    Ok(SymmetricEigen { values, vectors })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn eigen_diagonal_matrix() {
        let a = array![[1.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 2.0]];
        let eig = symmetric_eigen(&a).unwrap();

        assert_eq!(eig.values.to_vec(), vec![3.0, 2.0, 1.0]);
        assert_relative_eq!(eig.vectors[[1, 0]].abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn eigen_reconstructs_matrix() {
        let a = array![[4.0, 1.0, 0.5], [1.0, 3.0, 0.25], [0.5, 0.25, 2.0]];
        let eig = symmetric_eigen(&a).unwrap();

        let lambda = Array2::from_diag(&eig.values);
        let rebuilt = eig.vectors.dot(&lambda).dot(&eig.vectors.t());
        for (x, y) in rebuilt.iter().zip(a.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-10);
        }

        for w in eig.values.windows(2) {
            assert!(w[0] >= w[1]);
        }
    }

    #[test]
    fn eigen_vectors_orthonormal() {
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        let eig = symmetric_eigen(&a).unwrap();

        assert_relative_eq!(eig.values[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(eig.values[1], 1.0, epsilon = 1e-12);

        let gram = eig.vectors.t().dot(&eig.vectors);
        assert_relative_eq!(gram[[0, 0]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(gram[[0, 1]], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn eigen_rejects_bad_input() {
        assert!(matches!(symmetric_eigen(&Array2::zeros((0, 0))), Err(MathError::EmptyData)));
        assert!(symmetric_eigen(&Array2::zeros((2, 3))).is_err());
        assert!(symmetric_eigen(&array![[f64::NAN, 0.0], [0.0, 1.0]]).is_err());
    }
}
