//! Postgres-backed asset store.
//!
//! Every `in_use` transition is a single guarded statement evaluated by the
//! database; attach and detach run the edge write and the counter write in
//! one transaction, and check-in counts parent edges under a table lock. The schema `CHECK` constraint backs both up.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Duplicate` | Same id / same edge inserted twice |
//! | Database (foreign key violation) | `23503` | `NotFound` | Edge references a missing asset |
//! | Database (check constraint violation) | `23514` | `Constraint` | Counter bounds or self-nesting |
//! | Database (other) | Any other | `Backend` | Other database errors |
//! | PoolClosed / PoolTimedOut / Io / Tls | N/A | `Unavailable` | Store unreachable |
//! | RowNotFound | N/A | `NotFound` | Unexpected (we use `fetch_optional`) |
//! | Commit transport failure | N/A | `OutcomeUnknown` | Commit sent, reply lost |

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgExecutor, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{Span, instrument};
use uuid::Uuid;

use stocktag_core::AssetId;
use stocktag_inventory::{
    Asset, AssetRelationship, Attributes, ChildLink, CounterChange, SearchTerms,
};

use super::r#trait::{AssetStore, ParentCount, StoreError};

macro_rules! asset_columns {
    () => {
        r#"a.id, a.created_at, a.updated_at, a.name, a."type", a.quantity, a.in_use, a.attributes"#
    };
}

/// Postgres-backed asset store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync`; clones share it.
#[derive(Debug, Clone)]
pub struct PostgresAssetStore {
    pool: Arc<PgPool>,
}

impl PostgresAssetStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `url`.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Apply [`super::schema::STATEMENTS`]. Safe to run on every startup.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let mut tx = self.begin("migrate").await?;
        for statement in super::schema::STATEMENTS {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        commit(tx, "migrate").await
    }

    async fn begin(&self, operation: &str) -> Result<Transaction<'static, Postgres>, StoreError> {
        self.pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(operation, e))
    }

    /// Tell "row missing" apart from "no spare unit" after a guarded
    /// increment matched nothing.
    async fn classify_miss<'e, E>(exec: E, id: AssetId, operation: &str) -> StoreError
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query("SELECT quantity, in_use FROM assets WHERE id = $1")
            .bind(Uuid::from(id))
            .fetch_optional(exec)
            .await;
        match row {
            Ok(Some(row)) => {
                let quantity: i64 = row.try_get("quantity").unwrap_or_default();
                StoreError::Capacity(format!("all {quantity} unit(s) of asset {id} are already in use"))
            }
            Ok(None) => StoreError::NotFound(format!("asset {id}")),
            Err(e) => map_sqlx_error(operation, e),
        }
    }
}

async fn commit(tx: Transaction<'static, Postgres>, operation: &str) -> Result<(), StoreError> {
    tx.commit().await.map_err(|e| match e {
        // The server answered: the transaction was rolled back.
        sqlx::Error::Database(_) => map_sqlx_error(operation, e),
        other => StoreError::OutcomeUnknown(format!("commit in {operation}: {other}")),
    })
}

/// `in_use + 1` if a unit is spare. Returns the new count, or `None` when the
/// guard matched no row.
async fn bump_in_use<'e, E>(exec: E, id: AssetId, now: DateTime<Utc>) -> Result<Option<i64>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE assets
        SET in_use = in_use + 1, updated_at = $2
        WHERE id = $1 AND in_use < quantity
        RETURNING in_use
        "#,
    )
    .bind(Uuid::from(id))
    .bind(now)
    .fetch_optional(exec)
    .await
}

/// `in_use - 1` floored at zero. Returns `(before, after)`, or `None` when
/// the row does not exist.
async fn drop_in_use<'e, E>(exec: E, id: AssetId, now: DateTime<Utc>) -> Result<Option<CounterChange>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query(
        r#"
        WITH prev AS (
            SELECT id, in_use FROM assets WHERE id = $1 FOR UPDATE
        )
        UPDATE assets a
        SET in_use = GREATEST(prev.in_use - 1, 0), updated_at = $2
        FROM prev
        WHERE a.id = prev.id
        RETURNING prev.in_use AS before, a.in_use AS after
        "#,
    )
    .bind(Uuid::from(id))
    .bind(now)
    .fetch_optional(exec)
    .await?;

    row.map(|row| {
        Ok::<_, sqlx::Error>(CounterChange {
            before: row.try_get("before")?,
            after: row.try_get("after")?,
        })
    })
    .transpose()
}

#[async_trait::async_trait]
impl AssetStore for PostgresAssetStore {
    #[instrument(skip(self, asset), fields(asset_id = %asset.id), err)]
    async fn insert_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO assets (id, created_at, updated_at, name, "type", quantity, in_use, attributes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::from(asset.id))
        .bind(asset.created_at)
        .bind(asset.updated_at)
        .bind(&asset.name)
        .bind(&asset.asset_type)
        .bind(asset.quantity)
        .bind(asset.in_use)
        .bind(Json(&asset.attributes))
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_asset", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(asset_id = %id), err)]
    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>, StoreError> {
        let row = sqlx::query(concat!("SELECT ", asset_columns!(), " FROM assets a WHERE a.id = $1"))
            .bind(Uuid::from(id))
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_asset", e))?;
        row.map(|r| asset_from_row(&r)).transpose()
    }

    #[instrument(skip(self, attributes), fields(asset_id = %id), err)]
    async fn replace_attributes(
        &self,
        id: AssetId,
        attributes: &Attributes,
        now: DateTime<Utc>,
    ) -> Result<Asset, StoreError> {
        let row = sqlx::query(concat!(
            "UPDATE assets a SET attributes = $2, updated_at = $3 WHERE a.id = $1 RETURNING ",
            asset_columns!()
        ))
        .bind(Uuid::from(id))
        .bind(Json(attributes))
        .bind(now)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("replace_attributes", e))?
        .ok_or_else(|| StoreError::NotFound(format!("asset {id}")))?;
        asset_from_row(&row)
    }

    #[instrument(skip(self), fields(asset_id = %id), err)]
    async fn set_quantity(
        &self,
        id: AssetId,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> Result<Asset, StoreError> {
        let row = sqlx::query(concat!(
            "UPDATE assets a SET quantity = $2, updated_at = $3 WHERE a.id = $1 AND a.in_use <= $2 RETURNING ",
            asset_columns!()
        ))
        .bind(Uuid::from(id))
        .bind(quantity)
        .bind(now)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("set_quantity", e))?;

        match row {
            Some(row) => asset_from_row(&row),
            None => match self.get_asset(id).await? {
                Some(current) => Err(StoreError::Constraint(format!(
                    "quantity {quantity} is below the {} unit(s) currently in use",
                    current.in_use
                ))),
                None => Err(StoreError::NotFound(format!("asset {id}"))),
            },
        }
    }

    #[instrument(skip(self), fields(asset_id = %id, operation), err)]
    async fn increment_in_use(&self, id: AssetId, now: DateTime<Utc>) -> Result<CounterChange, StoreError> {
        Span::current().record("operation", "increment_in_use");

        match bump_in_use(&*self.pool, id, now)
            .await
            .map_err(|e| map_sqlx_error("increment_in_use", e))?
        {
            Some(after) => Ok(CounterChange { before: after - 1, after }),
            None => Err(Self::classify_miss(&*self.pool, id, "increment_in_use").await),
        }
    }

    #[instrument(skip(self), fields(asset_id = %id, operation), err)]
    async fn decrement_in_use(&self, id: AssetId, now: DateTime<Utc>) -> Result<CounterChange, StoreError> {
        Span::current().record("operation", "decrement_in_use");
        let op = "decrement_in_use";
        let mut tx = self.begin(op).await?;

        // SHARE blocks attach/detach until commit, so the edge count below
        // cannot change under the guarded update.
        sqlx::query("LOCK TABLE asset_has_assets IN SHARE MODE")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(op, e))?;

        let row = sqlx::query(
            r#"
            WITH prev AS (
                SELECT id, in_use FROM assets WHERE id = $1 FOR UPDATE
            ),
            held AS (
                SELECT COUNT(*) AS parents FROM asset_has_assets WHERE child = $1
            )
            UPDATE assets a
            SET in_use = GREATEST(prev.in_use - 1, 0), updated_at = $2
            FROM prev, held
            WHERE a.id = prev.id AND (held.parents = 0 OR prev.in_use > held.parents)
            RETURNING prev.in_use AS before, a.in_use AS after
            "#,
        )
        .bind(Uuid::from(id))
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(op, e))?;

        let Some(row) = row else {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM assets WHERE id = $1)")
                .bind(Uuid::from(id))
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error(op, e))?;
            return Err(if exists {
                StoreError::Held(format!(
                    "no unit of asset {id} is checked out; its units in use are nested under parents"
                ))
            } else {
                StoreError::NotFound(format!("asset {id}"))
            });
        };
        let change = CounterChange {
            before: row.try_get("before").map_err(decode_error)?,
            after: row.try_get("after").map_err(decode_error)?,
        };

        commit(tx, op).await?;
        Ok(change)
    }

    /// Steps, all inside one transaction:
    /// 1. Serialize edge writers (`SHARE ROW EXCLUSIVE` on the edge table)
    /// 2. Check both endpoints exist and the edge is new
    /// 3. Walk the child's descendants to reject a cycle
    /// 4. Guarded increment of the child's `in_use`
    /// 5. Insert the edge and commit
    #[instrument(
        skip(self, relationship),
        fields(parent = %relationship.parent, child = %relationship.child, operation),
        err
    )]
    async fn attach(&self, relationship: &AssetRelationship) -> Result<CounterChange, StoreError> {
        Span::current().record("operation", "attach");
        let op = "attach";
        let (parent, child) = (relationship.parent, relationship.child);
        let mut tx = self.begin(op).await?;

        sqlx::query("LOCK TABLE asset_has_assets IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(op, e))?;

        let present: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM assets WHERE id = ANY($1)")
            .bind(vec![Uuid::from(parent), Uuid::from(child)])
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(op, e))?;
        for id in [parent, child] {
            if !present.contains(&Uuid::from(id)) {
                return Err(StoreError::NotFound(format!("asset {id}")));
            }
        }

        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM asset_has_assets WHERE parent = $1 AND child = $2)",
        )
        .bind(Uuid::from(parent))
        .bind(Uuid::from(child))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(op, e))?;
        if duplicate {
            return Err(StoreError::Duplicate(format!("{child} is already nested under {parent}")));
        }

        let cycle: bool = sqlx::query_scalar(
            r#"
            WITH RECURSIVE descendants(id) AS (
                SELECT child FROM asset_has_assets WHERE parent = $1
                UNION
                SELECT r.child FROM asset_has_assets r JOIN descendants d ON r.parent = d.id
            )
            SELECT EXISTS (SELECT 1 FROM descendants WHERE id = $2)
            "#,
        )
        .bind(Uuid::from(child))
        .bind(Uuid::from(parent))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(op, e))?;
        if cycle {
            return Err(StoreError::Cycle(format!(
                "attaching {child} under {parent} would create a nesting cycle"
            )));
        }

        let after = match bump_in_use(&mut *tx, child, relationship.created_at)
            .await
            .map_err(|e| map_sqlx_error(op, e))?
        {
            Some(after) => after,
            None => return Err(Self::classify_miss(&mut *tx, child, op).await),
        };

        sqlx::query(
            "INSERT INTO asset_has_assets (parent, child, created_at, updated_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::from(parent))
        .bind(Uuid::from(child))
        .bind(relationship.created_at)
        .bind(relationship.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(op, e))?;

        commit(tx, op).await?;
        Ok(CounterChange { before: after - 1, after })
    }

    #[instrument(skip(self), fields(parent = %parent, child = %child, operation), err)]
    async fn detach(
        &self,
        parent: AssetId,
        child: AssetId,
        now: DateTime<Utc>,
    ) -> Result<CounterChange, StoreError> {
        Span::current().record("operation", "detach");
        let op = "detach";
        let mut tx = self.begin(op).await?;

        let deleted: Option<Uuid> = sqlx::query_scalar(
            "DELETE FROM asset_has_assets WHERE parent = $1 AND child = $2 RETURNING child",
        )
        .bind(Uuid::from(parent))
        .bind(Uuid::from(child))
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error(op, e))?;
        if deleted.is_none() {
            return Err(StoreError::NotFound(format!("{child} is not nested under {parent}")));
        }

        let change = drop_in_use(&mut *tx, child, now)
            .await
            .map_err(|e| map_sqlx_error(op, e))?
            .ok_or_else(|| StoreError::NotFound(format!("asset {child}")))?;

        commit(tx, op).await?;
        Ok(change)
    }

    #[instrument(skip(self), fields(parent = %parent, child_count), err)]
    async fn list_children(&self, parent: AssetId) -> Result<Vec<ChildLink>, StoreError> {
        let parent_asset = self
            .get_asset(parent)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("asset {parent}")))?;

        let rows = sqlx::query(concat!(
            "SELECT r.created_at AS link_created_at, r.updated_at AS link_updated_at, ",
            asset_columns!(),
            " FROM asset_has_assets r JOIN assets a ON a.id = r.child",
            " WHERE r.parent = $1",
            " ORDER BY r.updated_at DESC, r.created_at DESC, a.id DESC"
        ))
        .bind(Uuid::from(parent))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_children", e))?;

        let mut links = Vec::with_capacity(rows.len());
        for row in rows {
            links.push(ChildLink {
                parent: parent_asset.clone(),
                child: asset_from_row(&row)?,
                created_at: row.try_get("link_created_at").map_err(decode_error)?,
                updated_at: row.try_get("link_updated_at").map_err(decode_error)?,
            });
        }
        Span::current().record("child_count", links.len());
        Ok(links)
    }

    #[instrument(skip(self), err)]
    async fn list_page(&self, offset: u64, limit: u64) -> Result<(Vec<Asset>, u64), StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM assets")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_page", e))?;

        let rows = sqlx::query(concat!(
            "SELECT ",
            asset_columns!(),
            " FROM assets a ORDER BY a.created_at ASC, a.id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(clamp_i64(limit))
        .bind(clamp_i64(offset))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_page", e))?;

        let items = rows
            .iter()
            .map(|r| asset_from_row(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((items, total.max(0) as u64))
    }

    #[instrument(skip(self, terms), fields(query = %terms.as_query()), err)]
    async fn search(&self, terms: &SearchTerms, limit: u64) -> Result<Vec<Asset>, StoreError> {
        let rows = sqlx::query(concat!(
            "SELECT ",
            asset_columns!(),
            r#" FROM assets a WHERE to_tsvector('simple', a.name || ' ' || a."type") @@ plainto_tsquery('simple', $1)"#,
            " ORDER BY a.updated_at DESC, a.id DESC LIMIT $2"
        ))
        .bind(terms.as_query())
        .bind(clamp_i64(limit))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("search", e))?;

        rows.iter().map(|r| asset_from_row(r)).collect()
    }

    /// Exclusions (self, existing children, transitive ancestors) are part of
    /// the `WHERE` clause, so `LIMIT` only ever trims valid candidates.
    #[instrument(skip(self, terms), fields(parent = %parent), err)]
    async fn suggest_attachable(
        &self,
        parent: AssetId,
        terms: Option<&SearchTerms>,
        limit: u64,
    ) -> Result<Vec<Asset>, StoreError> {
        let rows = sqlx::query(concat!(
            r#"
            WITH RECURSIVE ancestors(id) AS (
                SELECT parent FROM asset_has_assets WHERE child = $1
                UNION
                SELECT r.parent FROM asset_has_assets r JOIN ancestors an ON r.child = an.id
            )
            SELECT "#,
            asset_columns!(),
            r#"
            FROM assets a
            WHERE a.id <> $1
              AND NOT EXISTS (SELECT 1 FROM asset_has_assets r WHERE r.parent = $1 AND r.child = a.id)
              AND NOT EXISTS (SELECT 1 FROM ancestors an WHERE an.id = a.id)
              AND ($2::text IS NULL OR to_tsvector('simple', a.name) @@ plainto_tsquery('simple', $2))
            ORDER BY a.updated_at DESC, a.id DESC
            LIMIT $3
            "#
        ))
        .bind(Uuid::from(parent))
        .bind(terms.map(SearchTerms::as_query))
        .bind(clamp_i64(limit))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("suggest_attachable", e))?;

        rows.iter().map(|r| asset_from_row(r)).collect()
    }

    #[instrument(skip(self), err)]
    async fn parent_counts(&self) -> Result<Vec<ParentCount>, StoreError> {
        let rows = sqlx::query("SELECT child, COUNT(*) AS parents FROM asset_has_assets GROUP BY child ORDER BY child")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("parent_counts", e))?;

        rows.iter()
            .map(|row| {
                let child: Uuid = row.try_get("child").map_err(decode_error)?;
                let parents: i64 = row.try_get("parents").map_err(decode_error)?;
                Ok(ParentCount {
                    child: AssetId::from_uuid(child),
                    parents: parents.max(0) as u64,
                })
            })
            .collect()
    }

    #[instrument(skip(self), err)]
    async fn all_assets(&self) -> Result<Vec<Asset>, StoreError> {
        let rows = sqlx::query(concat!(
            "SELECT ",
            asset_columns!(),
            " FROM assets a ORDER BY a.created_at ASC, a.id ASC"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("all_assets", e))?;

        rows.iter().map(|r| asset_from_row(r)).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

fn asset_from_row(row: &PgRow) -> Result<Asset, StoreError> {
    let id: Uuid = row.try_get("id").map_err(decode_error)?;
    let Json(attributes): Json<Attributes> = row.try_get("attributes").map_err(decode_error)?;

    Ok(Asset {
        id: AssetId::from_uuid(id),
        created_at: row.try_get("created_at").map_err(decode_error)?,
        updated_at: row.try_get("updated_at").map_err(decode_error)?,
        name: row.try_get("name").map_err(decode_error)?,
        asset_type: row.try_get("type").map_err(decode_error)?,
        quantity: row.try_get("quantity").map_err(decode_error)?,
        in_use: row.try_get("in_use").map_err(decode_error)?,
        attributes,
    })
}

fn decode_error(err: sqlx::Error) -> StoreError {
    StoreError::Backend(format!("failed to decode asset row: {err}"))
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Map SQLx errors to store errors.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());

            match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate(msg),
                Some("23503") => StoreError::NotFound(msg),
                Some("23514") => StoreError::Constraint(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {}: {}", operation, e)),
        sqlx::Error::RowNotFound => {
            StoreError::NotFound(format!("unexpected row not found in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_beyond_i64_are_clamped() {
        assert_eq!(clamp_i64(10), 10);
        assert_eq!(clamp_i64(u64::MAX), i64::MAX);
    }

    #[test]
    fn transport_failures_are_unavailable() {
        let err = map_sqlx_error("get_asset", sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Unavailable(_)));
        let err = map_sqlx_error("get_asset", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn schema_declares_counter_bounds() {
        let ddl = super::super::schema::STATEMENTS.join("\n");
        assert!(ddl.contains("in_use >= 0 AND in_use <= quantity"));
        assert!(ddl.contains("PRIMARY KEY (parent, child)"));
    }
}
