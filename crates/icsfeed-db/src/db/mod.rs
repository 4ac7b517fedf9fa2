pub mod connection;
pub mod query;
pub mod schema;
pub mod store;

pub use store::{EventStore, MysqlEventStore, PgEventStore, StoreProvider};
