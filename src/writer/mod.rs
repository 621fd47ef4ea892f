pub mod rowset;
pub mod schema_gen;
pub mod sqlite;

pub use rowset::*;
pub use schema_gen::*;
pub use sqlite::*;
