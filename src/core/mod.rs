//! Core domain types

pub mod cluster;
pub mod document;
pub mod vector;

pub use cluster::{Clustering, Corpus};
pub use document::Document;
pub use vector::SparseVector;
