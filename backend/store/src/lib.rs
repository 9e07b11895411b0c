//! Storage backends: the SQLite forum store and the TTL cache.

pub mod cache;
pub mod sqlite;

pub use cache::MokaCache;
pub use sqlite::{NewUser, SqliteActivityStore, TableNames};
