pub mod labels;
pub mod placement;

pub use labels::*;
pub use placement::*;
