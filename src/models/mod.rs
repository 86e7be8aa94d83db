pub mod product;
pub mod stats;

pub use product::*;
pub use stats::*;
