//! External collaborators: where points come from and where clusterings go.

pub mod sink;
pub mod source;

pub use sink::{ClusterSink, CsvClusterSink};
pub use source::{CsvPointSource, PointSource, VecSource};
