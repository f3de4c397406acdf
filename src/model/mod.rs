pub mod common;
pub mod configurator;
pub mod variant;

pub use common::*;
pub use configurator::*;
pub use variant::*;
