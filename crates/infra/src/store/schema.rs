//! Relational schema for the asset ledger.
//!
//! Applied idempotently by [`super::postgres::PostgresAssetStore::migrate`].
//! The `CHECK` on `in_use` is the last line of enforcement for the counter
//! bounds: even a buggy writer cannot persist an out-of-range value.
//!
//! Table and column names match the hosted datastore the ledger replaced, so
//! an existing `assets` / `asset_has_assets` pair can be pointed at directly.

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS assets (
        id          UUID PRIMARY KEY,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        name        TEXT NOT NULL,
        "type"      TEXT NOT NULL DEFAULT '',
        quantity    BIGINT NOT NULL,
        in_use      BIGINT NOT NULL DEFAULT 0,
        attributes  JSONB NOT NULL DEFAULT '{}'::jsonb,
        CONSTRAINT assets_quantity_non_negative CHECK (quantity >= 0),
        CONSTRAINT assets_in_use_bounds CHECK (in_use >= 0 AND in_use <= quantity)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS asset_has_assets (
        parent      UUID NOT NULL REFERENCES assets (id),
        child       UUID NOT NULL REFERENCES assets (id),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (parent, child),
        CONSTRAINT asset_has_assets_distinct CHECK (parent <> child)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS asset_has_assets_child_idx ON asset_has_assets (child)",
    "CREATE INDEX IF NOT EXISTS assets_created_idx ON assets (created_at, id)",
    "CREATE INDEX IF NOT EXISTS assets_updated_idx ON assets (updated_at DESC, id DESC)",
    r#"
    CREATE INDEX IF NOT EXISTS assets_name_fts_idx
        ON assets USING GIN (to_tsvector('simple', name))
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS assets_keyword_fts_idx
        ON assets USING GIN (to_tsvector('simple', name || ' ' || "type"))
    "#,
];
