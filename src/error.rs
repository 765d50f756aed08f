use crate::core::id::{ClusterId, PointId};
use std::num::ParseFloatError;
use thiserror::Error;

/// Error types for point, cluster and clustering operations
#[derive(Debug, Error)]
pub enum ClusteringError {
    /// Operands (or a point and its container) differ in dimensionality
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Indexed access outside the valid range
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// The point is already owned by the cluster
    #[error("point {point} is already a member of cluster {cluster}")]
    DuplicateMember { point: PointId, cluster: ClusterId },
    /// The point is not owned by the cluster
    #[error("point is not a member of cluster {cluster}")]
    NotAMember { cluster: ClusterId },
    /// A coordinate is NaN or infinite; `index` is 1-based
    #[error("coordinate {index} is not finite")]
    NonFiniteCoordinate { index: usize },
    /// The point has no coordinates
    #[error("points need at least one coordinate")]
    ZeroDimensional,
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error(transparent)]
    ParseFloat(#[from] ParseFloatError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ClusteringError>;
