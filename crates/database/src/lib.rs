mod connect;
mod retry;
mod schema;
mod store;

pub use connect::{connect, PostgresClient};
pub use retry::with_backoff;
pub use schema::{CREATE_TABLES_SQL, DROP_TABLES_SQL};
pub use store::PgGachaStore;
