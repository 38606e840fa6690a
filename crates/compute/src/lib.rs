pub mod analysis;

pub use analysis::ranking::*;
