pub mod bounds;
pub mod ids;
pub mod math;

// Geometry and identifier primitives shared by every crate.
pub use bounds::*;
pub use ids::*;
