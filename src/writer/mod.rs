pub mod row;
pub mod schema_gen;
pub mod sqlite;
pub mod staging;

pub use row::{SqlValue, ToRow};
pub use schema_gen::{generate_create_table, generate_indexes, generate_schema};
pub use sqlite::{LoadCounts, SqliteWriter};
pub use staging::Staging;
