//! Opinion-group discovery
//!
//! Users are grouped by agglomerative (hierarchical) clustering over their
//! projected coordinates, using average linkage and cosine distance: two
//! participants are close when they lean in the same *direction* on the
//! opinion map, regardless of how strongly.
//!
//! The dendrogram is built once with the nearest-neighbour-chain algorithm
//! and then cut at every candidate cluster count. Each cut is scored with the
//! mean silhouette coefficient; the best-scoring count wins, ties going to
//! the smaller count.
//!
//! # Example
//!
//! ```
//! use agora_domain::analysis::clustering::ClusterSelector;
//! use agora_domain::analysis::config::ClusteringParams;
//!
//! let coordinates = vec![
//!     [1.0, 0.1], [1.0, 0.0], [0.9, 0.1],
//!     [-1.0, 0.0], [-1.0, 0.1], [-0.9, -0.1],
//! ];
//! let selection = ClusterSelector::new(ClusteringParams::default()).select(&coordinates);
//!
//! assert_eq!(selection.cluster_count, 2);
//! assert_eq!(selection.labels, vec![0, 0, 0, 1, 1, 1]);
//! assert!(selection.quality_score > 0.9);
//! ```

use super::config::ClusteringParams;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Vectors shorter than this are treated as sitting on the origin
const ZERO_NORM: f64 = 1e-12;

/// Ties in silhouette within this margin go to the smaller cluster count
const SCORE_EPSILON: f64 = 1e-12;

/// Cosine distance `1 - cos θ` in `[0, 2]`
///
/// Cosine is undefined for a zero vector: two zero vectors are at distance 0,
/// a zero vector and any other vector are at distance 1 (orthogonal).
pub fn cosine_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let norm_a = a[0].hypot(a[1]);
    let norm_b = b[0].hypot(b[1]);
    match (norm_a <= ZERO_NORM, norm_b <= ZERO_NORM) {
        (true, true) => 0.0,
        (true, false) | (false, true) => 1.0,
        (false, false) => {
            let cos = (a[0] * b[0] + a[1] * b[1]) / (norm_a * norm_b);
            (1.0 - cos).clamp(0.0, 2.0)
        }
    }
}

/// One merge step of the dendrogram
///
/// `left` and `right` are point indices, each a member of one of the two
/// clusters being joined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    pub distance: f64,
}

/// Full agglomerative hierarchy over a set of points
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    points: usize,
    /// Sorted by ascending merge distance
    merges: Vec<Merge>,
}

impl Dendrogram {
    /// Average-linkage hierarchy built with the nearest-neighbour chain
    pub fn average_linkage(coordinates: &[[f64; 2]]) -> Self {
        let n = coordinates.len();
        let mut distances = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cosine_distance(&coordinates[i], &coordinates[j]);
                distances[i * n + j] = d;
                distances[j * n + i] = d;
            }
        }

        let mut active = vec![true; n];
        let mut sizes = vec![1usize; n];
        let mut remaining = n;
        let mut chain: Vec<usize> = Vec::with_capacity(n);
        let mut merges: Vec<Merge> = Vec::with_capacity(n.saturating_sub(1));

        while remaining > 1 {
            if chain.is_empty() {
                if let Some(first) = active.iter().position(|a| *a) {
                    chain.push(first);
                }
            }

            let (a, b) = loop {
                let top = chain[chain.len() - 1];
                let previous = chain.len().checked_sub(2).map(|i| chain[i]);
                let nearest = nearest_active(&distances, n, &active, top, previous);
                if Some(nearest) == previous {
                    break (top, nearest);
                }
                chain.push(nearest);
            };
            chain.truncate(chain.len() - 2);

            let (keep, drop) = if a < b { (a, b) } else { (b, a) };
            merges.push(Merge {
                left: keep,
                right: drop,
                distance: distances[keep * n + drop],
            });

            // Lance-Williams update for average linkage
            let (size_keep, size_drop) = (sizes[keep] as f64, sizes[drop] as f64);
            for k in 0..n {
                if !active[k] || k == keep || k == drop {
                    continue;
                }
                let merged = (size_keep * distances[keep * n + k]
                    + size_drop * distances[drop * n + k])
                    / (size_keep + size_drop);
                distances[keep * n + k] = merged;
                distances[k * n + keep] = merged;
            }
            sizes[keep] += sizes[drop];
            active[drop] = false;
            remaining -= 1;
        }

        // Stable: equal-distance merges keep discovery order, children first
        merges.sort_by(|x, y| x.distance.total_cmp(&y.distance));

        Self { points: n, merges }
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Flat clustering with exactly `k` clusters (`1 <= k <= points`)
    ///
    /// Labels are numbered in order of first appearance, so point 0 is always
    /// in cluster 0.
    pub fn cut(&self, k: usize) -> Vec<usize> {
        if self.points == 0 {
            return Vec::new();
        }
        let k = k.clamp(1, self.points);
        let mut parents: Vec<usize> = (0..self.points).collect();

        for merge in self.merges.iter().take(self.points - k) {
            let left = find(&mut parents, merge.left);
            let right = find(&mut parents, merge.right);
            if left != right {
                parents[right.max(left)] = right.min(left);
            }
        }

        let mut root_labels: Vec<Option<usize>> = vec![None; self.points];
        let mut next = 0;
        (0..self.points)
            .map(|point| {
                let root = find(&mut parents, point);
                *root_labels[root].get_or_insert_with(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect()
    }
}

/// Nearest active cluster to `from`, preferring `previous` on ties (required
/// for the chain to terminate) and otherwise the lowest index
fn nearest_active(
    distances: &[f64],
    n: usize,
    active: &[bool],
    from: usize,
    previous: Option<usize>,
) -> usize {
    let mut best: Option<(usize, f64)> = previous.map(|p| (p, distances[from * n + p]));
    for candidate in 0..n {
        if !active[candidate] || candidate == from {
            continue;
        }
        let d = distances[from * n + candidate];
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((candidate, d)),
        }
    }
    best.map(|(index, _)| index).unwrap_or(from)
}

fn find(parents: &mut [usize], mut x: usize) -> usize {
    while parents[x] != x {
        parents[x] = parents[parents[x]];
        x = parents[x];
    }
    x
}

/// Mean silhouette coefficient of a labelling, in `[-1, 1]`
///
/// Points alone in their cluster score 0. Returns 0 for fewer than two
/// clusters.
pub fn silhouette_score(coordinates: &[[f64; 2]], labels: &[usize]) -> f64 {
    let n = coordinates.len();
    let k = labels.iter().copied().max().map_or(0, |m| m + 1);
    if n == 0 || k < 2 {
        return 0.0;
    }

    let mut sizes = vec![0usize; k];
    for label in labels {
        sizes[*label] += 1;
    }

    let mut total = 0.0;
    for i in 0..n {
        let own = labels[i];
        if sizes[own] <= 1 {
            continue;
        }

        let mut sums = vec![0.0; k];
        for j in 0..n {
            if i != j {
                sums[labels[j]] += cosine_distance(&coordinates[i], &coordinates[j]);
            }
        }

        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|c| *c != own && sizes[*c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        let scale = a.max(b);
        if scale > 0.0 && scale.is_finite() {
            total += (b - a) / scale;
        }
    }

    total / n as f64
}

/// Silhouette score of one candidate cluster count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub k: usize,
    pub silhouette: f64,
}

/// Outcome of the cluster-count search
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSelection {
    /// Cluster index per input point
    pub labels: Vec<usize>,
    pub cluster_count: usize,
    /// Silhouette of the selected labelling
    pub quality_score: f64,
    /// Every candidate that was evaluated, ascending by k
    pub candidates: Vec<CandidateScore>,
}

/// Picks the number of opinion groups
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterSelector {
    params: ClusteringParams,
}

impl ClusterSelector {
    pub fn new(params: ClusteringParams) -> Self {
        Self { params }
    }

    /// Candidate cluster counts for `points` users
    pub fn candidate_range(&self, points: usize) -> std::ops::RangeInclusive<usize> {
        let upper = self.params.max_clusters.min(points.saturating_sub(1));
        self.params.min_clusters..=upper
    }

    pub fn select(&self, coordinates: &[[f64; 2]]) -> ClusterSelection {
        let dendrogram = Dendrogram::average_linkage(coordinates);
        let mut candidates = Vec::new();
        let mut best: Option<(usize, f64, Vec<usize>)> = None;

        for k in self.candidate_range(coordinates.len()) {
            let labels = dendrogram.cut(k);
            let silhouette = silhouette_score(coordinates, &labels);
            debug!(k, silhouette, "Scored candidate cluster count");
            candidates.push(CandidateScore { k, silhouette });

            let improves = best
                .as_ref()
                .is_none_or(|(_, best_score, _)| silhouette > best_score + SCORE_EPSILON);
            if improves {
                best = Some((k, silhouette, labels));
            }
        }

        match best {
            Some((cluster_count, quality_score, labels)) => ClusterSelection {
                labels,
                cluster_count,
                quality_score,
                candidates,
            },
            None => {
                // Too few points for any candidate: one cut at the smallest
                // feasible count, reported as structureless
                let cluster_count = self.params.min_clusters.min(coordinates.len()).max(1);
                ClusterSelection {
                    labels: dendrogram.cut(cluster_count),
                    cluster_count,
                    quality_score: 0.0,
                    candidates,
                }
            }
        }
    }
}
