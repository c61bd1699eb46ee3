//! Dimensionality reduction
//!
//! Projects every user's vote row onto the two dominant axes of disagreement
//! (principal components). Missing votes are imputed with the column mean of
//! the observed votes, so after centering they contribute exactly zero.
//!
//! The principal axes are found by power iteration on `XᵀX` without ever
//! materializing the covariance matrix, which keeps the cost at
//! `O(users × statements)` per iteration. Each axis is sign-normalized so
//! that its largest-magnitude loading is positive; this removes the sign
//! ambiguity of PCA and makes the projection reproducible.

use super::matrix::VoteMatrix;
use tracing::debug;

/// Eigenvalues at or below this fraction of the total variance are treated as zero
const DEGENERATE_AXIS_RATIO: f64 = 1e-9;

/// Output of [`DimensionalityReducer::project`]
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// One `[x, y]` per matrix row
    pub coordinates: Vec<[f64; 2]>,
    /// Share of total variance captured by each axis (0.0 for a collapsed axis)
    pub explained_variance: [f64; 2],
}

impl Projection {
    /// Whether every user landed on the same point
    pub fn is_collapsed(&self) -> bool {
        self.explained_variance.iter().all(|v| *v == 0.0)
    }
}

/// Two-axis principal component projection of a vote matrix
#[derive(Debug, Clone, Copy)]
pub struct DimensionalityReducer {
    max_iterations: usize,
    tolerance: f64,
}

impl Default for DimensionalityReducer {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-10,
        }
    }
}

impl DimensionalityReducer {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
        }
    }

    pub fn project(&self, matrix: &VoteMatrix) -> Projection {
        let n = matrix.n_users();
        let m = matrix.n_statements();
        let centered = centered_rows(matrix);

        let dof = n.saturating_sub(1).max(1) as f64;
        let total_variance: f64 =
            centered.iter().flatten().map(|x| x * x).sum::<f64>() / dof;

        let mut axes: Vec<Vec<f64>> = Vec::with_capacity(2);
        let mut explained = [0.0; 2];

        for (axis, ratio) in explained.iter_mut().enumerate() {
            let loadings = if total_variance > 0.0 {
                self.principal_axis(&centered, m, axis, &axes)
            } else {
                None
            };

            match loadings {
                Some(v) => {
                    let eigenvalue = squared_norm(&multiply(&centered, &v)) / dof;
                    if eigenvalue > DEGENERATE_AXIS_RATIO * total_variance {
                        *ratio = eigenvalue / total_variance;
                        axes.push(v);
                    } else {
                        axes.push(vec![0.0; m]);
                    }
                }
                None => axes.push(vec![0.0; m]),
            }
        }

        let coordinates = centered
            .iter()
            .map(|row| [dot(row, &axes[0]), dot(row, &axes[1])])
            .collect();

        debug!(
            explained_x = explained[0],
            explained_y = explained[1],
            total_variance,
            "Projected vote matrix onto principal axes"
        );

        Projection {
            coordinates,
            explained_variance: explained,
        }
    }

    /// Dominant unit eigenvector of `XᵀX` orthogonal to `previous`, or `None`
    /// when nothing is left in the orthogonal complement
    fn principal_axis(
        &self,
        x: &[Vec<f64>],
        width: usize,
        axis: usize,
        previous: &[Vec<f64>],
    ) -> Option<Vec<f64>> {
        let mut v: Vec<f64> = (0..width).map(|j| start_component(j, axis)).collect();
        orthogonalize(&mut v, previous);
        if !normalize(&mut v) {
            return None;
        }

        for _ in 0..self.max_iterations {
            let mut w = multiply_transposed(x, &multiply(x, &v), width);
            orthogonalize(&mut w, previous);
            if !normalize(&mut w) {
                return None;
            }

            let delta: f64 = w
                .iter()
                .zip(&v)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt();
            v = w;
            if delta < self.tolerance {
                break;
            }
        }

        normalize_sign(&mut v);
        Some(v)
    }
}

/// Column-centered rows with missing cells imputed by the column mean
fn centered_rows(matrix: &VoteMatrix) -> Vec<Vec<f64>> {
    let n = matrix.n_users();
    let m = matrix.n_statements();

    let means: Vec<f64> = (0..m)
        .map(|col| {
            let (sum, count) = (0..n)
                .filter_map(|row| matrix.get(row, col))
                .fold((0.0, 0usize), |(sum, count), vote| (sum + vote.score(), count + 1));
            if count == 0 { 0.0 } else { sum / count as f64 }
        })
        .collect();

    (0..n)
        .map(|row| {
            matrix
                .row(row)
                .iter()
                .zip(&means)
                .map(|(cell, mean)| cell.map_or(0.0, |vote| vote.score() - mean))
                .collect()
        })
        .collect()
}

/// Deterministic, non-symmetric start vector so the iteration never begins
/// orthogonal to a dominant axis by accident
fn start_component(j: usize, axis: usize) -> f64 {
    const GOLDEN: f64 = 0.618_033_988_749_895;
    1.0 + ((j as f64 + 1.0) * GOLDEN + axis as f64 * 0.5).fract()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn squared_norm(a: &[f64]) -> f64 {
    dot(a, a)
}

/// `X v`
fn multiply(x: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    x.iter().map(|row| dot(row, v)).collect()
}

/// `Xᵀ u`
fn multiply_transposed(x: &[Vec<f64>], u: &[f64], width: usize) -> Vec<f64> {
    let mut out = vec![0.0; width];
    for (row, weight) in x.iter().zip(u) {
        if *weight == 0.0 {
            continue;
        }
        for (o, value) in out.iter_mut().zip(row) {
            *o += weight * value;
        }
    }
    out
}

fn orthogonalize(v: &mut [f64], basis: &[Vec<f64>]) {
    for b in basis {
        let projection = dot(v, b);
        for (x, y) in v.iter_mut().zip(b) {
            *x -= projection * y;
        }
    }
}

/// Scale to unit length; returns `false` for a (numerically) zero vector
fn normalize(v: &mut [f64]) -> bool {
    let norm = squared_norm(v).sqrt();
    if norm <= f64::EPSILON {
        return false;
    }
    v.iter_mut().for_each(|x| *x /= norm);
    true
}

/// Flip so the largest-magnitude loading (first one on ties) is positive
fn normalize_sign(v: &mut [f64]) {
    let mut pivot = 0;
    for (j, x) in v.iter().enumerate() {
        if x.abs() > v[pivot].abs() {
            pivot = j;
        }
    }
    if v.get(pivot).is_some_and(|x| *x < 0.0) {
        v.iter_mut().for_each(|x| *x = -*x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::config::MatrixPreconditions;
    use crate::analysis::matrix::VoteMatrixBuilder;
    use crate::core::ids::StatementId;
    use crate::discussion::vote::{VoteChoice, VoteRecord};
    use std::collections::BTreeSet;

    fn build(votes: &[VoteRecord]) -> VoteMatrix {
        let live: BTreeSet<StatementId> = votes.iter().map(|v| v.statement_id).collect();
        VoteMatrixBuilder::new(MatrixPreconditions {
            min_users: 1,
            min_statements: 1,
            min_votes: 1,
        })
        .build(votes, &live)
        .unwrap()
    }

    /// Users 1..=5 agree with 1..=5 and disagree with 6..=10, users 6..=10 invert
    fn two_camps() -> Vec<VoteRecord> {
        let mut votes = Vec::new();
        for u in 1..=10u64 {
            for s in 1..=10u64 {
                let agrees = (u <= 5) == (s <= 5);
                let vote = if agrees {
                    VoteChoice::Agree
                } else {
                    VoteChoice::Disagree
                };
                votes.push(VoteRecord::new(u, s, vote));
            }
        }
        votes
    }

    #[test]
    fn test_two_camps_separate_on_first_axis() {
        let matrix = build(&two_camps());
        let projection = DimensionalityReducer::default().project(&matrix);

        assert_eq!(projection.coordinates.len(), 10);
        let first = projection.coordinates[0][0];
        let last = projection.coordinates[9][0];
        assert!(first.abs() > 1.0);
        assert!((first + last).abs() < 1e-9, "camps should mirror each other");
        for coords in &projection.coordinates[..5] {
            assert!((coords[0] - first).abs() < 1e-9);
        }
        assert!((projection.explained_variance[0] - 1.0).abs() < 1e-9);
        assert_eq!(projection.explained_variance[1], 0.0);
    }

    #[test]
    fn test_sign_is_normalized() {
        let matrix = build(&two_camps());
        let projection = DimensionalityReducer::default().project(&matrix);
        // The largest loading is positive; users agreeing with statement 1 land on +x
        assert!(projection.coordinates[0][0] > 0.0);
    }

    #[test]
    fn test_universal_agreement_collapses() {
        let mut votes = Vec::new();
        for u in 1..=8u64 {
            for s in 1..=8u64 {
                votes.push(VoteRecord::new(u, s, VoteChoice::Agree));
            }
        }
        let projection = DimensionalityReducer::default().project(&build(&votes));
        assert!(projection.is_collapsed());
        assert!(projection.coordinates.iter().all(|c| *c == [0.0, 0.0]));
    }

    #[test]
    fn test_tolerates_heavy_sparsity() {
        // 40 users × 50 statements, each user votes on 4 statements (92% missing)
        let mut votes = Vec::new();
        for u in 0..40u64 {
            for k in 0..4u64 {
                let s = (u * 7 + k * 13) % 50;
                let vote = if (u + k) % 3 == 0 {
                    VoteChoice::Disagree
                } else {
                    VoteChoice::Agree
                };
                votes.push(VoteRecord::new(u, s, vote));
            }
        }
        let matrix = build(&votes);
        assert!(matrix.sparsity() > 0.8);

        let projection = DimensionalityReducer::default().project(&matrix);
        assert_eq!(projection.coordinates.len(), matrix.n_users());
        assert!(
            projection
                .coordinates
                .iter()
                .all(|c| c[0].is_finite() && c[1].is_finite())
        );
    }

    #[test]
    fn test_projection_is_deterministic() {
        let matrix = build(&two_camps());
        let reducer = DimensionalityReducer::default();
        assert_eq!(reducer.project(&matrix), reducer.project(&matrix));
    }

    #[test]
    fn test_normalize_sign() {
        let mut v = vec![0.1, -0.9, 0.3];
        normalize_sign(&mut v);
        assert_eq!(v, vec![-0.1, 0.9, -0.3]);
    }
}
