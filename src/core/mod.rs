pub mod id;
pub mod point;

pub use id::{cluster_ids, point_ids, ClusterId, IdAllocator, PointId};
pub use point::Point;
