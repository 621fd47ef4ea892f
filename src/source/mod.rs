pub mod model;
pub mod reader;

pub use model::*;
pub use reader::*;
