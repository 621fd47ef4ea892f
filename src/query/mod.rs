mod catalog;
mod runner;

pub use catalog::*;
pub use runner::*;
