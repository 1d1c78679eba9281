//! k-means++ seeded Lloyd iterations.
//!
//! Invariants maintained by every restart:
//!
//! * every cluster has at least one member after each assignment step
//!   (an emptied cluster takes the member farthest from its centroid out
//!   of a cluster with two or more members);
//! * a vector only changes cluster when another centroid is strictly
//!   closer, so ties never shuffle members back and forth.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::outcome::ClusterOutcome;
use crate::params::{ClusterCountPolicy, KMeansParams};
use crate::ClusterError;

/// Partitions `points` into clusters.
///
/// # Errors
///
/// Returns [`ClusterError`] if `params.clusters` is zero, `points` is
/// empty, vectors disagree on dimensionality or hold non-finite values,
/// or (under [`ClusterCountPolicy::Strict`]) there are fewer points than
/// clusters.
pub fn cluster(points: &[Vec<f64>], params: &KMeansParams) -> Result<ClusterOutcome, ClusterError> {
    validate(points)?;
    let k = effective_clusters(points.len(), params)?;

    let seed = params.seed.unwrap_or_else(|| {
        let seed = rand::rng().random::<u64>();
        log::info!("No clustering seed given, drew {seed} (pass it back to reproduce this run)");
        seed
    });
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let restarts = params.restarts.max(1);
    let mut best: Option<Run> = None;
    for restart in 0..restarts {
        let run = run_once(points, k, params, &mut rng);
        log::debug!(
            "k-means restart {}/{restarts}: inertia {:.6} after {} iterations",
            restart + 1,
            run.inertia,
            run.iterations
        );
        if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
            best = Some(run);
        }
    }

    let Some(best) = best else {
        return Err(ClusterError::NoPoints);
    };
    let (labels, centroids) = canonicalize(best.labels, best.centroids);

    log::info!(
        "Clustered {} districts into {k} groups (inertia {:.6}, seed {seed})",
        points.len(),
        best.inertia
    );

    Ok(ClusterOutcome {
        labels,
        requested_clusters: params.clusters,
        clusters: k,
        centroids,
        inertia: best.inertia,
        iterations: best.iterations,
        seed,
    })
}

fn validate(points: &[Vec<f64>]) -> Result<(), ClusterError> {
    let Some(first) = points.first() else {
        return Err(ClusterError::NoPoints);
    };
    let expected = first.len();
    if expected == 0 {
        return Err(ClusterError::ZeroDimension);
    }
    for (index, point) in points.iter().enumerate() {
        if point.len() != expected {
            return Err(ClusterError::DimensionMismatch {
                index,
                expected,
                found: point.len(),
            });
        }
        if point.iter().any(|v| !v.is_finite()) {
            return Err(ClusterError::NonFinite { index });
        }
    }
    Ok(())
}

fn effective_clusters(available: usize, params: &KMeansParams) -> Result<usize, ClusterError> {
    let requested = params.clusters;
    if requested == 0 {
        return Err(ClusterError::InvalidClusterCount);
    }
    if requested <= available {
        return Ok(requested);
    }
    match params.policy {
        ClusterCountPolicy::Strict => Err(ClusterError::TooFewPoints {
            requested,
            available,
        }),
        ClusterCountPolicy::Reduce => {
            log::warn!(
                "Requested {requested} clusters but only {available} districts; \
                 reducing cluster count to {available}"
            );
            Ok(available)
        }
    }
}

struct Run {
    labels: Vec<usize>,
    centroids: Vec<Vec<f64>>,
    inertia: f64,
    iterations: usize,
}

fn run_once(points: &[Vec<f64>], k: usize, params: &KMeansParams, rng: &mut ChaCha8Rng) -> Run {
    let mut centroids = kmeans_plus_plus(points, k, rng);
    let mut labels: Vec<usize> = points
        .iter()
        .map(|point| nearest(point, &centroids))
        .collect();
    fill_empty_clusters(points, &mut labels, &mut centroids);

    let mut iterations = 0;
    while iterations < params.max_iterations {
        iterations += 1;

        let updated = mean_centroids(points, &labels, k);
        let shift = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| squared_distance(old, new))
            .fold(0.0, f64::max);
        centroids = updated;

        let moved = reassign(points, &mut labels, &centroids)
            + fill_empty_clusters(points, &mut labels, &mut centroids);

        if moved == 0 || shift <= params.tolerance {
            break;
        }
    }

    let centroids = mean_centroids(points, &labels, k);
    let inertia = points
        .iter()
        .zip(&labels)
        .map(|(point, &label)| squared_distance(point, &centroids[label]))
        .sum();

    Run {
        labels,
        centroids,
        inertia,
        iterations,
    }
}

/// Picks `k` initial centroids: the first uniformly, each next one with
/// probability proportional to its squared distance from the nearest
/// chosen centroid. When every remaining point coincides with a chosen
/// centroid, an unchosen point is drawn uniformly instead.
fn kmeans_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut ChaCha8Rng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut chosen = vec![false; n];
    let mut centroids = Vec::with_capacity(k);

    let first = rng.random_range(0..n);
    chosen[first] = true;
    centroids.push(points[first].clone());

    let mut nearest_sq: Vec<f64> = points
        .iter()
        .map(|point| squared_distance(point, &points[first]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest_sq.iter().sum();
        let next = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            let mut cumulative = 0.0;
            let mut pick = None;
            for (index, &d) in nearest_sq.iter().enumerate() {
                if d <= 0.0 {
                    continue;
                }
                cumulative += d;
                pick = Some(index);
                if cumulative > target {
                    break;
                }
            }
            pick.unwrap_or(first)
        } else {
            let unchosen: Vec<usize> = (0..n).filter(|&i| !chosen[i]).collect();
            unchosen[rng.random_range(0..unchosen.len())]
        };

        chosen[next] = true;
        centroids.push(points[next].clone());
        for (d, point) in nearest_sq.iter_mut().zip(points) {
            *d = d.min(squared_distance(point, &points[next]));
        }
    }

    centroids
}

/// Index of the closest centroid; ties go to the lowest index.
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

/// Moves each point to a strictly closer centroid, if any. Returns the
/// number of points that moved.
fn reassign(points: &[Vec<f64>], labels: &mut [usize], centroids: &[Vec<f64>]) -> usize {
    let mut moved = 0;
    for (point, label) in points.iter().zip(labels.iter_mut()) {
        let candidate = nearest(point, centroids);
        if candidate != *label
            && squared_distance(point, &centroids[candidate])
                < squared_distance(point, &centroids[*label])
        {
            *label = candidate;
            moved += 1;
        }
    }
    moved
}

/// Gives every empty cluster one member. Returns the number of points
/// that moved.
///
/// Requires `points.len() >= centroids.len()`, which guarantees a donor
/// cluster with two or more members exists while any cluster is empty.
fn fill_empty_clusters(
    points: &[Vec<f64>],
    labels: &mut [usize],
    centroids: &mut [Vec<f64>],
) -> usize {
    let k = centroids.len();
    let mut sizes = vec![0usize; k];
    for &label in labels.iter() {
        sizes[label] += 1;
    }

    let mut moved = 0;
    for empty in 0..k {
        if sizes[empty] > 0 {
            continue;
        }
        let donor = points
            .iter()
            .zip(labels.iter())
            .enumerate()
            .filter(|(_, (_, label))| sizes[**label] > 1)
            .map(|(index, (point, &label))| (index, squared_distance(point, &centroids[label])))
            .fold(None, |best: Option<(usize, f64)>, (index, distance)| match best {
                Some((_, best_distance)) if best_distance >= distance => best,
                _ => Some((index, distance)),
            });

        let Some((index, _)) = donor else {
            break;
        };
        sizes[labels[index]] -= 1;
        sizes[empty] += 1;
        labels[index] = empty;
        centroids[empty].clone_from(&points[index]);
        moved += 1;
    }
    moved
}

#[allow(clippy::cast_precision_loss)]
fn mean_centroids(points: &[Vec<f64>], labels: &[usize], k: usize) -> Vec<Vec<f64>> {
    let dims = points[0].len();
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0usize; k];

    for (point, &label) in points.iter().zip(labels) {
        counts[label] += 1;
        for (sum, value) in sums[label].iter_mut().zip(point) {
            *sum += value;
        }
    }

    for (sum, &count) in sums.iter_mut().zip(&counts) {
        if count > 0 {
            for value in sum.iter_mut() {
                *value /= count as f64;
            }
        }
    }
    sums
}

/// Renumbers labels by order of first appearance and reorders the
/// centroids to match.
fn canonicalize(labels: Vec<usize>, centroids: Vec<Vec<f64>>) -> (Vec<usize>, Vec<Vec<f64>>) {
    let mut mapping: Vec<Option<usize>> = vec![None; centroids.len()];
    let mut next = 0;
    for &label in &labels {
        if mapping[label].is_none() {
            mapping[label] = Some(next);
            next += 1;
        }
    }

    let relabeled = labels
        .into_iter()
        .map(|label| mapping[label].unwrap_or(label))
        .collect();

    let mut ordered = vec![Vec::new(); centroids.len()];
    for (old, centroid) in centroids.into_iter().enumerate() {
        ordered[mapping[old].unwrap_or(old)] = centroid;
    }

    (relabeled, ordered)
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(k: usize) -> KMeansParams {
        KMeansParams::with_clusters(k).seed(42)
    }

    /// Two tight groups far apart.
    fn two_blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.0, 0.1],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
            vec![5.0, 5.1],
        ]
    }

    #[test]
    fn toy_city_groups_sparse_districts_together() {
        // A = [Café, Café, Park], B = [Park, Gym], C = no venues.
        let points = vec![vec![2.0 / 3.0, 1.0 / 3.0], vec![0.0, 0.5], vec![0.0, 0.0]];
        let outcome = cluster(&points, &params(2)).unwrap();
        assert_eq!(outcome.labels, vec![0, 1, 1]);
        assert!((outcome.inertia - 0.125).abs() < 1e-9);
    }

    #[test]
    fn separates_obvious_blobs() {
        let outcome = cluster(&two_blobs(), &params(2)).unwrap();
        assert_eq!(outcome.labels, vec![0, 0, 0, 1, 1, 1]);
        assert!((outcome.centroids[1][0] - 15.1 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn assignment_is_total_and_in_range() {
        let points: Vec<Vec<f64>> = (0..40)
            .map(|i| {
                let x = f64::from(i % 7) / 7.0;
                let y = f64::from(i % 5) / 5.0;
                vec![x, y, x * y]
            })
            .collect();
        let outcome = cluster(&points, &params(5)).unwrap();
        assert_eq!(outcome.labels.len(), points.len());
        assert!(outcome.labels.iter().all(|&l| l < 5));
        assert!(outcome.sizes().iter().all(|&s| s > 0));
        assert_eq!(outcome.sizes().iter().sum::<usize>(), points.len());
    }

    #[test]
    fn same_seed_gives_same_outcome() {
        let points: Vec<Vec<f64>> = (0..25)
            .map(|i| vec![f64::from(i * 7 % 11) / 11.0, f64::from(i * 3 % 13) / 13.0])
            .collect();
        let a = cluster(&points, &params(4)).unwrap();
        let b = cluster(&points, &params(4)).unwrap();
        assert_eq!(a, b);
        assert!(a.same_partition(&b));
    }

    #[test]
    fn unseeded_runs_report_their_seed() {
        let points = two_blobs();
        let first = cluster(&points, &KMeansParams::with_clusters(2)).unwrap();
        let replay = cluster(&points, &KMeansParams::with_clusters(2).seed(first.seed)).unwrap();
        assert_eq!(first.labels, replay.labels);
    }

    #[test]
    fn k_equal_to_point_count_isolates_every_point() {
        let points = vec![vec![0.0, 0.0], vec![0.0, 0.01], vec![1.0, 1.0], vec![0.5, 0.5]];
        let outcome = cluster(&points, &params(4)).unwrap();
        assert_eq!(outcome.labels, vec![0, 1, 2, 3]);
        assert!(outcome.inertia.abs() < 1e-12);
    }

    #[test]
    fn identical_points_still_fill_every_cluster() {
        let points = vec![vec![0.0, 0.0]; 3];
        let outcome = cluster(&points, &params(3)).unwrap();
        assert_eq!(outcome.labels, vec![0, 1, 2]);
    }

    #[test]
    fn duplicates_never_leave_empty_clusters() {
        let mut points = vec![vec![0.0, 0.0]; 6];
        points.push(vec![1.0, 1.0]);
        let outcome = cluster(&points, &params(4)).unwrap();
        assert_eq!(outcome.clusters, 4);
        assert!(outcome.sizes().iter().all(|&s| s > 0));
    }

    #[test]
    fn strict_policy_rejects_too_many_clusters() {
        let points = vec![vec![0.0], vec![1.0]];
        assert_eq!(
            cluster(&points, &params(3)),
            Err(ClusterError::TooFewPoints {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn reduce_policy_lowers_k_visibly() {
        let points = vec![vec![0.0], vec![1.0]];
        let outcome = cluster(&points, &params(5).policy(ClusterCountPolicy::Reduce)).unwrap();
        assert_eq!(outcome.requested_clusters, 5);
        assert_eq!(outcome.clusters, 2);
        assert!(outcome.was_reduced());
        assert_eq!(outcome.labels, vec![0, 1]);
    }

    #[test]
    fn rejects_zero_clusters() {
        assert_eq!(
            cluster(&[vec![0.0]], &params(0)),
            Err(ClusterError::InvalidClusterCount)
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(cluster(&[], &params(2)), Err(ClusterError::NoPoints));
        assert_eq!(
            cluster(&[], &params(2).policy(ClusterCountPolicy::Reduce)),
            Err(ClusterError::NoPoints)
        );
    }

    #[test]
    fn rejects_ragged_vectors() {
        let points = vec![vec![0.0, 1.0], vec![0.0]];
        assert_eq!(
            cluster(&points, &params(1)),
            Err(ClusterError::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        let points = vec![vec![0.0], vec![f64::NAN]];
        assert_eq!(
            cluster(&points, &params(1)),
            Err(ClusterError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn rejects_zero_dimensional_vectors() {
        assert_eq!(
            cluster(&[vec![], vec![]], &params(1)),
            Err(ClusterError::ZeroDimension)
        );
    }

    #[test]
    fn canonical_labels_follow_first_appearance() {
        let (labels, centroids) = canonicalize(
            vec![2, 0, 2, 1],
            vec![vec![0.0], vec![1.0], vec![2.0]],
        );
        assert_eq!(labels, vec![0, 1, 0, 2]);
        assert_eq!(centroids, vec![vec![2.0], vec![0.0], vec![1.0]]);
    }
}
