//! Text indexing, distance metrics and clustering

pub mod distance;
pub mod kmeans;
pub mod tokenize;

pub use distance::{Distance, Metric};
pub use kmeans::{cluster, ClusterError, KMeans};
pub use tokenize::{build_index, index, index_document};
