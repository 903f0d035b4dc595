//! K-means clustering over sparse term vectors
//!
//! Centroids start as k distinct documents drawn at random. Each pass assigns
//! every document to its nearest centroid and then moves every centroid to the
//! mean of its members. The run stops as soon as a pass reproduces the
//! previous assignment, or when the iteration budget is spent.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use crate::config::{CENTROID_PRUNE_THRESHOLD, DEFAULT_MAX_ITERATIONS};
use crate::core::{Clustering, Corpus, SparseVector};
use crate::processing::distance::{snap_distance, Distance, Metric};
use crate::ui;

#[derive(Error, Debug, PartialEq)]
pub enum ClusterError {
	#[error("negative distance {distance} between document '{document}' and centroid {centroid}")]
	NegativeDistance {
		document: String,
		centroid: usize,
		distance: f64,
	},

	#[error("cannot draw {k} initial centroids from {documents} documents")]
	InvalidClusterCount { k: usize, documents: usize },
}

/// Clustering parameters with an optional seed for reproducible runs
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
	pub k: usize,
	pub metric: Metric,
	pub max_iterations: usize,
	pub seed: Option<u64>,
}

impl KMeans {
	pub fn new(k: usize, metric: Metric) -> Self {
		Self {
			k,
			metric,
			max_iterations: DEFAULT_MAX_ITERATIONS,
			seed: None,
		}
	}

	pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
		self.max_iterations = max_iterations;
		self
	}

	pub fn with_seed(mut self, seed: Option<u64>) -> Self {
		self.seed = seed;
		self
	}

	pub fn run(&self, corpus: &Corpus) -> Result<Clustering, ClusterError> {
		ui::debug(&format!(
			"Running k-means: k={}, metric={}, max_iterations={}, seed={}",
			self.k,
			self.metric,
			self.max_iterations,
			self.seed.map(|s| s.to_string()).unwrap_or_else(|| "random".to_string())
		));

		match self.seed {
			Some(seed) => cluster(corpus, self.k, &self.metric, self.max_iterations, &mut StdRng::seed_from_u64(seed)),
			None => cluster(corpus, self.k, &self.metric, self.max_iterations, &mut rand::rng()),
		}
	}
}

/// Partition `corpus` into `k` buckets using `distance`.
///
/// At least one assignment pass always runs. A negative distance aborts the
/// whole run.
pub fn cluster<D, R>(
	corpus: &Corpus,
	k: usize,
	distance: &D,
	max_iterations: usize,
	rng: &mut R,
) -> Result<Clustering, ClusterError>
where
	D: Distance + Sync + ?Sized,
	R: Rng + ?Sized,
{
	let documents: Vec<(&String, &SparseVector)> = corpus.iter().collect();

	if k == 0 || k > documents.len() {
		return Err(ClusterError::InvalidClusterCount {
			k,
			documents: documents.len(),
		});
	}

	let mut centroids: Vec<SparseVector> = index::sample(rng, documents.len(), k)
		.into_iter()
		.map(|i| documents[i].1.clone())
		.collect();

	let mut previous: Option<Vec<usize>> = None;
	let mut assignment = Vec::new();
	let mut iterations = 0;
	let mut converged = false;

	for iteration in 0..max_iterations.max(1) {
		iterations = iteration + 1;
		assignment = assign(&documents, &centroids, distance)?;

		// Buckets are built in corpus order, so equal assignments mean equal buckets
		if let Some(last) = &previous {
			let moved = last.iter().zip(&assignment).filter(|(a, b)| a != b).count();
			ui::debug(&format!("Iteration {}: {} documents moved", iteration, moved));
			if moved == 0 {
				converged = true;
				break;
			}
		} else {
			ui::debug(&format!("Iteration {}: initial assignment", iteration));
		}

		centroids = recompute_centroids(&documents, &assignment, k);
		previous = Some(assignment.clone());
	}

	if !converged {
		ui::debug(&format!("Stopped after {} iterations without converging", iterations));
	}

	Ok(Clustering {
		centroids,
		buckets: group(&documents, &assignment, k),
		iterations,
		converged,
	})
}

/// Index of the nearest centroid; the first centroid wins ties
pub fn nearest_centroid<D>(
	id: &str,
	vector: &SparseVector,
	centroids: &[SparseVector],
	distance: &D,
) -> Result<usize, ClusterError>
where
	D: Distance + ?Sized,
{
	let mut best = (0, f64::INFINITY);

	for (index, centroid) in centroids.iter().enumerate() {
		let d = snap_distance(distance.distance(vector, centroid));
		if d < 0.0 {
			return Err(ClusterError::NegativeDistance {
				document: id.to_string(),
				centroid: index,
				distance: d,
			});
		}
		if d < best.1 {
			best = (index, d);
		}
	}

	Ok(best.0)
}

fn assign<D>(
	documents: &[(&String, &SparseVector)],
	centroids: &[SparseVector],
	distance: &D,
) -> Result<Vec<usize>, ClusterError>
where
	D: Distance + Sync + ?Sized,
{
	let nearest: Vec<Result<usize, ClusterError>> = documents
		.par_iter()
		.map(|(id, vector)| nearest_centroid(id, vector, centroids, distance))
		.collect();

	// Report the first failing document in corpus order
	nearest.into_iter().collect()
}

/// Term-wise mean of each bucket, dropping near-zero terms
fn recompute_centroids(documents: &[(&String, &SparseVector)], assignment: &[usize], k: usize) -> Vec<SparseVector> {
	let mut sums = vec![SparseVector::new(); k];
	let mut counts = vec![0usize; k];

	for ((_, vector), &bucket) in documents.iter().zip(assignment) {
		counts[bucket] += 1;
		for (term, weight) in vector.iter() {
			sums[bucket].add(term, weight);
		}
	}

	sums.into_iter()
		.zip(counts)
		.map(|(sum, count)| {
			let n = count as f64;
			sum.iter()
				.map(|(term, total)| (term, total / n))
				.filter(|(_, mean)| *mean >= CENTROID_PRUNE_THRESHOLD)
				.collect()
		})
		.collect()
}

fn group(documents: &[(&String, &SparseVector)], assignment: &[usize], k: usize) -> Vec<Vec<String>> {
	let mut buckets = vec![Vec::new(); k];
	for ((id, _), &bucket) in documents.iter().zip(assignment) {
		buckets[bucket].push((*id).clone());
	}
	buckets
}
