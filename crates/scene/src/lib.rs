pub mod location;
pub mod navigation;
pub mod stack;
pub mod store;

pub use location::*;
pub use navigation::*;
pub use stack::*;
pub use store::*;
