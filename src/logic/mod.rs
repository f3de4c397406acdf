pub mod annotate;
pub mod combinations;

pub use annotate::*;
pub use combinations::*;
