/// Schema for the three engine tables.
///
/// `pity_state` is keyed by (user, pool) and carries the CAS `version`;
/// `draw_history` is append-only with the per-pool `draw_sequence`
/// disambiguating same-second draws; `card_pool` holds one JSONB
/// definition per pool type.
pub const CREATE_TABLES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "pity_state" (
    "user_id" UUID NOT NULL,
    "pool_type" TEXT NOT NULL,
    "pulls_since_rare" BIGINT NOT NULL DEFAULT 0,
    "pulls_since_legendary" BIGINT NOT NULL DEFAULT 0,
    "next_legendary_is_guaranteed_up" BOOLEAN NOT NULL DEFAULT FALSE,
    "total_pulls" BIGINT NOT NULL DEFAULT 0,
    "version" BIGINT NOT NULL DEFAULT 0,
    "updated_at" BIGINT NOT NULL DEFAULT 0,
    PRIMARY KEY ("user_id", "pool_type")
);

CREATE TABLE IF NOT EXISTS "draw_history" (
    "id" UUID PRIMARY KEY,
    "user_id" UUID NOT NULL,
    "pool_type" TEXT NOT NULL,
    "card_id" UUID NOT NULL,
    "rarity" SMALLINT NOT NULL,
    "is_up_card" BOOLEAN NOT NULL DEFAULT FALSE,
    "draw_sequence" BIGINT NOT NULL,
    "created_at" BIGINT NOT NULL
);

CREATE INDEX IF NOT EXISTS "idx_draw_history_user_time"
    ON "draw_history" ("user_id", "created_at" DESC, "draw_sequence" DESC);
CREATE INDEX IF NOT EXISTS "idx_draw_history_user_card"
    ON "draw_history" ("user_id", "card_id");

CREATE TABLE IF NOT EXISTS "card_pool" (
    "pool_type" TEXT PRIMARY KEY,
    "definition" JSONB NOT NULL,
    "updated_at" BIGINT NOT NULL DEFAULT 0
);
"#;

pub const DROP_TABLES_SQL: &str = r#"
DROP TABLE IF EXISTS "pity_state" CASCADE;
DROP TABLE IF EXISTS "draw_history" CASCADE;
DROP TABLE IF EXISTS "card_pool" CASCADE;
"#;
