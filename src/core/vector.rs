//! Sparse term-frequency vectors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Term → weight mapping where absent terms are implicit zeros.
///
/// Zero weights are never stored, so `len()` is the number of non-zero terms.
/// Terms are kept ordered so summations and serialization are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct SparseVector(BTreeMap<String, f64>);

impl SparseVector {
	pub fn new() -> Self {
		Self(BTreeMap::new())
	}

	/// Weight of `term`, 0.0 when absent
	pub fn get(&self, term: &str) -> f64 {
		self.0.get(term).copied().unwrap_or(0.0)
	}

	pub fn contains(&self, term: &str) -> bool {
		self.0.contains_key(term)
	}

	/// Set the weight of `term`. A zero weight removes the term.
	pub fn insert(&mut self, term: impl Into<String>, weight: f64) {
		let term = term.into();
		if weight == 0.0 {
			self.0.remove(&term);
		} else {
			self.0.insert(term, weight);
		}
	}

	/// Add `amount` to the weight of `term`, inserting it on first write
	pub fn add(&mut self, term: &str, amount: f64) {
		if amount == 0.0 {
			return;
		}
		match self.0.get_mut(term) {
			Some(weight) => {
				*weight += amount;
				if *weight == 0.0 {
					self.0.remove(term);
				}
			}
			None => {
				self.0.insert(term.to_string(), amount);
			}
		}
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
		self.0.iter().map(|(term, weight)| (term.as_str(), *weight))
	}

	/// Sum of squared weights
	pub fn norm_sq(&self) -> f64 {
		self.0.values().map(|w| w * w).sum()
	}

	/// Euclidean length
	pub fn norm(&self) -> f64 {
		self.norm_sq().sqrt()
	}

	/// Dot product over the terms both vectors share
	pub fn dot(&self, other: &Self) -> f64 {
		let (small, large) = if self.len() <= other.len() { (self, other) } else { (other, self) };
		small
			.0
			.iter()
			.filter_map(|(term, a)| large.0.get(term).map(|b| a * b))
			.sum()
	}

	/// Heaviest terms first, ties broken alphabetically
	pub fn top_terms(&self, limit: usize) -> Vec<(&str, f64)> {
		let mut terms: Vec<(&str, f64)> = self.iter().collect();
		terms.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(b.0)));
		terms.truncate(limit);
		terms
	}
}

impl<S: Into<String>> FromIterator<(S, f64)> for SparseVector {
	fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
		let mut vector = Self::new();
		for (term, weight) in iter {
			vector.insert(term, weight);
		}
		vector
	}
}

impl From<BTreeMap<String, f64>> for SparseVector {
	fn from(map: BTreeMap<String, f64>) -> Self {
		map.into_iter().collect()
	}
}

impl From<SparseVector> for BTreeMap<String, f64> {
	fn from(vector: SparseVector) -> Self {
		vector.0
	}
}
