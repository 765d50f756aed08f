pub mod cluster;
pub mod config;
pub mod kmeans;
pub mod utils;

pub use cluster::{inter_cluster_distance, inter_cluster_edges, Centroid, Cluster, Move, OwnedPoint};
pub use config::Config;
pub use kmeans::{ClusteringState, KMeans, KMeansParams, DEFAULT_MAX_ITERATIONS};
