pub mod geometry;
pub mod id_generator;

pub use geometry::*;
pub use id_generator::*;
