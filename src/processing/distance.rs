//! Pairwise distances between sparse term vectors
//!
//! Every metric treats an absent term as a zero weight. Metrics with an
//! undefined formula for some inputs (zero norm, empty overlap, zero
//! variance) substitute a fixed fallback value instead of failing, so the
//! clustering engine always receives a finite number.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, DISTANCE_SNAP_EPSILON, PEARSON_MIN_DENOMINATOR};
use crate::core::SparseVector;

/// Anything that measures how far apart two vectors are
pub trait Distance {
	fn distance(&self, a: &SparseVector, b: &SparseVector) -> f64;
}

impl<F> Distance for F
where
	F: Fn(&SparseVector, &SparseVector) -> f64,
{
	fn distance(&self, a: &SparseVector, b: &SparseVector) -> f64 {
		self(a, b)
	}
}

/// Distance metrics available for clustering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
	/// Sum of absolute differences
	Manhattan,
	/// Straight-line distance
	Euclidean,
	/// One minus cosine similarity
	Cosine,
	/// One minus Pearson correlation over shared terms
	Pearson,
	/// One minus Tanimoto coefficient
	#[default]
	Tanimoto,
}

impl Metric {
	pub const ALL: [Metric; 5] = [
		Metric::Manhattan,
		Metric::Euclidean,
		Metric::Cosine,
		Metric::Pearson,
		Metric::Tanimoto,
	];

	pub fn name(self) -> &'static str {
		match self {
			Metric::Manhattan => "manhattan",
			Metric::Euclidean => "euclidean",
			Metric::Cosine => "cosine",
			Metric::Pearson => "pearson",
			Metric::Tanimoto => "tanimoto",
		}
	}

	/// Symmetric metrics satisfy d(a, b) == d(b, a) for every input
	pub fn is_symmetric(self) -> bool {
		!matches!(self, Metric::Pearson)
	}
}

impl Distance for Metric {
	fn distance(&self, a: &SparseVector, b: &SparseVector) -> f64 {
		match self {
			Metric::Manhattan => manhattan_distance(a, b),
			Metric::Euclidean => euclidean_distance(a, b),
			Metric::Cosine => cosine_distance(a, b),
			Metric::Pearson => pearson_distance(a, b),
			Metric::Tanimoto => tanimoto_distance(a, b),
		}
	}
}

impl std::fmt::Display for Metric {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

impl std::str::FromStr for Metric {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Metric::ALL
			.into_iter()
			.find(|m| m.name() == s)
			.ok_or_else(|| ConfigError::InvalidMetric(s.to_string()))
	}
}

/// Per-term differences over the union of both key sets
fn union_differences<'a>(a: &'a SparseVector, b: &'a SparseVector) -> impl Iterator<Item = f64> + 'a {
	let from_a = a.iter().map(move |(term, wa)| wa - b.get(term));
	let only_b = b.iter().filter(move |(term, _)| !a.contains(term)).map(|(_, wb)| -wb);
	from_a.chain(only_b)
}

pub fn manhattan_distance(a: &SparseVector, b: &SparseVector) -> f64 {
	union_differences(a, b).map(f64::abs).sum()
}

pub fn euclidean_distance(a: &SparseVector, b: &SparseVector) -> f64 {
	union_differences(a, b).map(|d| d * d).sum::<f64>().sqrt()
}

/// Sample correlation over the terms present in both vectors.
///
/// No shared terms gives 0.0. A denominator below 1e-9 (no variance on the
/// shared terms) gives 1.0 whatever the sign of the data.
pub fn pearson_correlation(a: &SparseVector, b: &SparseVector) -> f64 {
	let shared: Vec<(f64, f64)> = a
		.iter()
		.filter(|(term, _)| b.contains(term))
		.map(|(term, wa)| (wa, b.get(term)))
		.collect();

	if shared.is_empty() {
		return 0.0;
	}

	let n = shared.len() as f64;
	let (mut sum_a, mut sum_b, mut sum_a_sq, mut sum_b_sq, mut sum_ab) = (0.0, 0.0, 0.0, 0.0, 0.0);
	for &(x, y) in &shared {
		sum_a += x;
		sum_b += y;
		sum_a_sq += x * x;
		sum_b_sq += y * y;
		sum_ab += x * y;
	}

	let numerator = sum_ab - (sum_a * sum_b / n);
	let denominator = ((sum_a_sq - sum_a * sum_a / n) * (sum_b_sq - sum_b * sum_b / n)).abs().sqrt();
	if denominator < PEARSON_MIN_DENOMINATOR {
		return 1.0;
	}

	numerator / denominator
}

pub fn pearson_distance(a: &SparseVector, b: &SparseVector) -> f64 {
	1.0 - pearson_correlation(a, b)
}

/// Dot product over the full norms; 0.0 when either vector has zero length
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
	let denominator = a.norm() * b.norm();
	if denominator == 0.0 {
		return 0.0;
	}
	a.dot(b) / denominator
}

pub fn cosine_distance(a: &SparseVector, b: &SparseVector) -> f64 {
	1.0 - cosine_similarity(a, b)
}

/// dot / (|a|² + |b|² - dot); 0.0 when the denominator vanishes
pub fn tanimoto_coefficient(a: &SparseVector, b: &SparseVector) -> f64 {
	let dot = a.dot(b);
	let denominator = a.norm_sq() + b.norm_sq() - dot;
	if denominator == 0.0 {
		return 0.0;
	}
	dot / denominator
}

pub fn tanimoto_distance(a: &SparseVector, b: &SparseVector) -> f64 {
	1.0 - tanimoto_coefficient(a, b)
}

/// Flush floating-point noise around zero to exactly 0.0
pub fn snap_distance(distance: f64) -> f64 {
	if distance.abs() < DISTANCE_SNAP_EPSILON {
		0.0
	} else {
		distance
	}
}
