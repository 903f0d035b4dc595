//! Cluster assignment produced by the k-means engine

use std::collections::BTreeMap;

use serde::Serialize;

use super::SparseVector;

/// Document id → term vector, iterated in id order
pub type Corpus = BTreeMap<String, SparseVector>;

/// Partition of a corpus into `k` buckets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clustering {
	/// One centroid per bucket
	pub centroids: Vec<SparseVector>,
	/// Document ids per bucket, in corpus order
	pub buckets: Vec<Vec<String>>,
	/// Assignment passes that were run
	pub iterations: usize,
	/// Whether the last pass reproduced the previous assignment
	pub converged: bool,
}

impl Clustering {
	pub fn k(&self) -> usize {
		self.buckets.len()
	}

	pub fn total_documents(&self) -> usize {
		self.buckets.iter().map(Vec::len).sum()
	}

	pub fn empty_buckets(&self) -> usize {
		self.buckets.iter().filter(|b| b.is_empty()).count()
	}

	/// Bucket index holding `id`
	pub fn bucket_of(&self, id: &str) -> Option<usize> {
		self.buckets.iter().position(|bucket| bucket.iter().any(|member| member == id))
	}
}
