pub mod detail;
pub mod record;
pub mod rows;

pub use detail::*;
pub use record::*;
pub use rows::*;
