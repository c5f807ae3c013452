use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use satintin_common::get_current_timestamp;
use satintin_engine::{
    CardPoolDefinition, CardPoolStore, DrawHistoryStore, DrawRecord, GachaError, HistoryPage,
    PityState, PityStore, PoolType, Rarity,
};

use crate::retry::with_backoff;

/// Postgres-backed engine store. One row per (user, pool) in
/// `pity_state`, append-only rows in `draw_history`, JSONB pool
/// definitions in `card_pool`.
#[derive(Clone)]
pub struct PgGachaStore {
    pool: PgPool,
}

impl PgGachaStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a pool definition; used by the init binary and admin
    /// tooling, not by the draw path.
    pub async fn save_pool(&self, definition: &CardPoolDefinition) -> Result<(), GachaError> {
        definition.validate()?;
        sqlx::query(
            r#"INSERT INTO "card_pool" ("pool_type", "definition", "updated_at")
               VALUES ($1, $2, $3)
               ON CONFLICT ("pool_type") DO UPDATE
               SET "definition" = EXCLUDED."definition",
                   "updated_at" = EXCLUDED."updated_at""#,
        )
        .bind(definition.pool_type.as_str())
        .bind(Json(definition))
        .bind(get_current_timestamp())
        .execute(&self.pool)
        .await
        .map_err(persistence)?;
        Ok(())
    }
}

fn persistence(err: sqlx::Error) -> GachaError {
    GachaError::Persistence(anyhow::Error::new(err))
}

#[derive(FromRow)]
struct PityRow {
    user_id: Uuid,
    pool_type: String,
    pulls_since_rare: i64,
    pulls_since_legendary: i64,
    next_legendary_is_guaranteed_up: bool,
    total_pulls: i64,
    version: i64,
    updated_at: i64,
}

impl PityRow {
    fn into_state(self) -> Result<PityState, GachaError> {
        Ok(PityState {
            user_id: self.user_id,
            pool_type: PoolType::parse(&self.pool_type)?,
            pulls_since_rare: self.pulls_since_rare,
            pulls_since_legendary: self.pulls_since_legendary,
            next_legendary_is_guaranteed_up: self.next_legendary_is_guaranteed_up,
            total_pulls: self.total_pulls,
            version: self.version,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct DrawRow {
    id: Uuid,
    user_id: Uuid,
    pool_type: String,
    card_id: Uuid,
    rarity: i16,
    is_up_card: bool,
    draw_sequence: i64,
    created_at: i64,
}

impl DrawRow {
    fn into_record(self) -> Result<DrawRecord, GachaError> {
        Ok(DrawRecord {
            id: self.id,
            user_id: self.user_id,
            pool_type: PoolType::parse(&self.pool_type)?,
            card_id: self.card_id,
            rarity: Rarity::from_stars(self.rarity)?,
            is_up_card: self.is_up_card,
            sequence: self.draw_sequence,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl PityStore for PgGachaStore {
    async fn load_pity(&self, user_id: Uuid, pool: PoolType) -> Result<PityState, GachaError> {
        let row: Option<PityRow> = with_backoff("load_pity", || {
            sqlx::query_as(
                r#"SELECT * FROM "pity_state" WHERE "user_id" = $1 AND "pool_type" = $2"#,
            )
            .bind(user_id)
            .bind(pool.as_str())
            .fetch_optional(&self.pool)
        })
        .await
        .map_err(persistence)?;

        match row {
            Some(row) => row.into_state(),
            None => Ok(PityState::zeroed(user_id, pool)),
        }
    }

    async fn commit_draw(
        &self,
        pity: &mut PityState,
        record: &DrawRecord,
    ) -> Result<(), GachaError> {
        let mut tx = self.pool.begin().await.map_err(persistence)?;

        // CAS upsert: the insert arm covers the first-ever draw, the
        // update arm only fires while the stored version still matches
        // what we loaded.
        let new_version: Option<(i64,)> = sqlx::query_as(
            r#"INSERT INTO "pity_state"
                   ("user_id", "pool_type", "pulls_since_rare", "pulls_since_legendary",
                    "next_legendary_is_guaranteed_up", "total_pulls", "version", "updated_at")
               VALUES ($1, $2, $3, $4, $5, $6, $7 + 1, $8)
               ON CONFLICT ("user_id", "pool_type") DO UPDATE SET
                   "pulls_since_rare" = EXCLUDED."pulls_since_rare",
                   "pulls_since_legendary" = EXCLUDED."pulls_since_legendary",
                   "next_legendary_is_guaranteed_up" = EXCLUDED."next_legendary_is_guaranteed_up",
                   "total_pulls" = EXCLUDED."total_pulls",
                   "version" = "pity_state"."version" + 1,
                   "updated_at" = EXCLUDED."updated_at"
               WHERE "pity_state"."version" = $7
               RETURNING "version""#,
        )
        .bind(pity.user_id)
        .bind(pity.pool_type.as_str())
        .bind(pity.pulls_since_rare)
        .bind(pity.pulls_since_legendary)
        .bind(pity.next_legendary_is_guaranteed_up)
        .bind(pity.total_pulls)
        .bind(pity.version)
        .bind(record.created_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(persistence)?;

        let Some((version,)) = new_version else {
            tx.rollback().await.ok();
            return Err(GachaError::ConcurrentDrawConflict);
        };

        sqlx::query(
            r#"INSERT INTO "draw_history"
                   ("id", "user_id", "pool_type", "card_id", "rarity",
                    "is_up_card", "draw_sequence", "created_at")
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(record.pool_type.as_str())
        .bind(record.card_id)
        .bind(record.rarity.stars())
        .bind(record.is_up_card)
        .bind(record.sequence)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await
        .map_err(persistence)?;

        tx.commit().await.map_err(persistence)?;

        pity.version = version;
        pity.updated_at = record.created_at;
        Ok(())
    }
}

#[async_trait]
impl DrawHistoryStore for PgGachaStore {
    async fn history(
        &self,
        user_id: Uuid,
        pool: Option<PoolType>,
        page: HistoryPage,
    ) -> Result<Vec<DrawRecord>, GachaError> {
        let rows: Vec<DrawRow> = with_backoff("history", || {
            let query = match pool {
                Some(pool) => sqlx::query_as(
                    r#"SELECT * FROM "draw_history"
                       WHERE "user_id" = $1 AND "pool_type" = $2
                       ORDER BY "created_at" DESC, "draw_sequence" DESC
                       LIMIT $3 OFFSET $4"#,
                )
                .bind(user_id)
                .bind(pool.as_str())
                .bind(page.page_size)
                .bind(page.offset()),
                None => sqlx::query_as(
                    r#"SELECT * FROM "draw_history"
                       WHERE "user_id" = $1
                       ORDER BY "created_at" DESC, "draw_sequence" DESC
                       LIMIT $2 OFFSET $3"#,
                )
                .bind(user_id)
                .bind(page.page_size)
                .bind(page.offset()),
            };
            query.fetch_all(&self.pool)
        })
        .await
        .map_err(persistence)?;

        rows.into_iter().map(DrawRow::into_record).collect()
    }

    async fn drawn_card_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, GachaError> {
        let ids: Vec<(Uuid,)> = with_backoff("drawn_card_ids", || {
            sqlx::query_as(
                r#"SELECT DISTINCT "card_id" FROM "draw_history" WHERE "user_id" = $1"#,
            )
            .bind(user_id)
            .fetch_all(&self.pool)
        })
        .await
        .map_err(persistence)?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}

#[async_trait]
impl CardPoolStore for PgGachaStore {
    async fn load_pool(&self, pool: PoolType) -> Result<CardPoolDefinition, GachaError> {
        let row: Option<(Json<CardPoolDefinition>,)> = with_backoff("load_pool", || {
            sqlx::query_as(r#"SELECT "definition" FROM "card_pool" WHERE "pool_type" = $1"#)
                .bind(pool.as_str())
                .fetch_optional(&self.pool)
        })
        .await
        .map_err(persistence)?;

        match row {
            Some((Json(definition),)) => Ok(definition),
            None => Err(GachaError::InvalidPool(pool.to_string())),
        }
    }
}
