pub mod distance;

pub use distance::{euclidean, squared_euclidean};
