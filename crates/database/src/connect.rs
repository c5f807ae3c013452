use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::OnceCell;

use satintin_common::ModuleClient;

use crate::schema::{CREATE_TABLES_SQL, DROP_TABLES_SQL};

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// Process-wide pool, connected from `DATABASE_URL`. `drop_tables` and
/// `create_tables` exist for the sandbox/init binaries; the service
/// itself connects with both off.
pub async fn connect(drop_tables: bool, create_tables: bool) -> &'static PgPool {
    POOL.get_or_init(|| async {
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL environment variable not set");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to postgres");

        if drop_tables {
            for statement in split_statements(DROP_TABLES_SQL) {
                sqlx::query(statement)
                    .execute(&pool)
                    .await
                    .unwrap_or_else(|e| panic!("failed to drop tables: {e:?}"));
            }
        }

        if create_tables {
            for statement in split_statements(CREATE_TABLES_SQL) {
                sqlx::query(statement)
                    .execute(&pool)
                    .await
                    .unwrap_or_else(|e| panic!("failed to create tables: {e:?}"));
            }
        }

        tracing::info!("postgres connection established");
        pool
    })
    .await
}

fn split_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Clone)]
pub struct PostgresClient {
    pool: &'static PgPool,
}

#[async_trait]
impl ModuleClient for PostgresClient {
    const NAME: &'static str = "postgres";
    type Client = PgPool;

    async fn setup_connection() -> Self {
        Self {
            pool: connect(false, false).await,
        }
    }

    fn get_client(&self) -> &PgPool {
        self.pool
    }
}
