//! kmeans-core: K-means clustering over owned, identity-tracked points
//!
//! Points live in exactly one cluster at a time; clusters cache their
//! centroid and know when it is stale.
//!
//! # Modules
//! - `core`: `Point` arithmetic and the id allocators.
//! - `clustering`: `Cluster`, `Move`, `KMeans` and the YAML configuration.
//! - `distances`: Euclidean distance over ndarray views.
//! - `io`: point sources and cluster sinks (in-memory and CSV).
//! - `visualization`: terminal report of a finished clustering.

pub mod clustering;
pub mod core;
pub mod distances;
pub mod error;
pub mod io;
pub mod visualization;

pub use clustering::{Cluster, ClusteringState, KMeans, KMeansParams};
pub use crate::core::{ClusterId, Point, PointId};
pub use error::{ClusteringError, Result};
