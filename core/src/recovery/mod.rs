pub mod checkpoint;
pub mod persist;

pub use checkpoint::*;
pub use persist::*;
