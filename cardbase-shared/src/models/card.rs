/// Card model and database operations
///
/// Cards are the atomic notes of a project. Each card carries a tag list
/// (stored as `TEXT[]`, always in canonical form — see [`crate::tags`]) and
/// a category label written by the clustering engine. Cards inherit their
/// owner from the project at creation time; the invariant
/// `card.user_id == project.user_id` is enforced by re-checking project
/// ownership before every insert rather than by a composite foreign key.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cards (
///     id BIGSERIAL PRIMARY KEY,
///     text TEXT NOT NULL,
///     url VARCHAR(2048) NOT NULL DEFAULT '',
///     tags TEXT[] NOT NULL DEFAULT '{}',
///     category VARCHAR(100) NOT NULL DEFAULT 'unclassified',
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use cardbase_shared::models::card::{Card, CreateCard};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i64, project_id: i64) -> Result<(), sqlx::Error> {
/// let card = Card::create(&pool, user_id, CreateCard {
///     text: "Borrow checker notes".to_string(),
///     url: String::new(),
///     tags: vec!["rust".to_string()],
///     project_id,
/// }).await?;
///
/// let cards = Card::list_by_project(&pool, user_id, project_id).await?;
/// assert!(cards.iter().any(|c| c.id == card.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::ai::{CardSnapshot, CategoryGroup, ClusterAssignment};
use crate::tags;

/// Sentinel category for cards no cluster has claimed
pub const UNCLASSIFIED_CATEGORY: &str = "unclassified";

/// Card model representing one atomic note
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    /// Unique card ID
    pub id: i64,

    /// Note text
    pub text: String,

    /// Optional source URL (empty string when absent)
    pub url: String,

    /// Canonical tag list
    pub tags: Vec<String>,

    /// Category label; `"unclassified"` until the clustering engine
    /// assigns one
    pub category: String,

    /// Project this card belongs to; never changes after creation
    pub project_id: i64,

    /// Owning user, inherited from the project at creation
    pub user_id: i64,

    /// When the card was created
    pub created_at: DateTime<Utc>,

    /// When the card was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCard {
    /// Note text
    pub text: String,

    /// Optional source URL
    #[serde(default)]
    pub url: String,

    /// Tags in list or comma-joined form; normalized before storage
    #[serde(default)]
    pub tags: Vec<String>,

    /// Parent project
    pub project_id: i64,
}

/// Input for updating a card
///
/// Project linkage and ownership are immutable; only content fields appear
/// here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCard {
    /// New note text
    pub text: String,

    /// New source URL
    #[serde(default)]
    pub url: String,

    /// New tags; normalized before storage
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Card {
    /// Creates a new card owned by `user_id`
    ///
    /// The caller is responsible for verifying project ownership first (see
    /// [`crate::auth::authorization::require_project_owner`]); this method
    /// only persists. Tags are normalized on the way in.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(pool: &PgPool, user_id: i64, data: CreateCard) -> Result<Self, sqlx::Error> {
        let normalized = tags::normalize(data.tags);

        let card = sqlx::query_as::<_, Card>(
            r#"
            INSERT INTO cards (text, url, tags, project_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, text, url, tags, category, project_id, user_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.text)
        .bind(data.url)
        .bind(normalized)
        .bind(data.project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(card)
    }

    /// Finds a card by ID, scoped to its owner
    ///
    /// Returns `None` both for missing and for foreign cards.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, text, url, tags, category, project_id, user_id,
                   created_at, updated_at
            FROM cards
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(card)
    }

    /// Lists all cards in a project, scoped to the owner
    ///
    /// An empty project yields an empty vector, not an error. Callers must
    /// have passed the project ownership check before listing.
    pub async fn list_by_project(
        pool: &PgPool,
        user_id: i64,
        project_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let cards = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, text, url, tags, category, project_id, user_id,
                   created_at, updated_at
            FROM cards
            WHERE project_id = $1 AND user_id = $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(cards)
    }

    /// Updates a card's content fields, scoped to its owner
    ///
    /// Returns `None` when no row matched (missing or foreign).
    pub async fn update(
        pool: &PgPool,
        user_id: i64,
        id: i64,
        data: UpdateCard,
    ) -> Result<Option<Self>, sqlx::Error> {
        let normalized = tags::normalize(data.tags);

        let card = sqlx::query_as::<_, Card>(
            r#"
            UPDATE cards
            SET text = $3,
                url = $4,
                tags = $5,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, text, url, tags, category, project_id, user_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.text)
        .bind(data.url)
        .bind(normalized)
        .fetch_optional(pool)
        .await?;

        Ok(card)
    }

    /// Deletes a card, scoped to its owner
    ///
    /// Returns `false` when no row matched.
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Snapshots `(id, text)` of every card in a project for the AI service
    pub async fn snapshot_for_clustering(
        pool: &PgPool,
        user_id: i64,
        project_id: i64,
    ) -> Result<Vec<CardSnapshot>, sqlx::Error> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            r#"
            SELECT id, text
            FROM cards
            WHERE project_id = $1 AND user_id = $2
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, content)| CardSnapshot { id, content })
            .collect())
    }

    /// Applies a full set of category assignments as one atomic transaction
    ///
    /// Two phases inside a single transaction:
    /// 1. every card in the project is reset to the unclassified sentinel;
    /// 2. each non-empty cluster runs one bulk update, scoped by
    ///    `project_id` so ids the backend echoes from elsewhere cannot
    ///    touch foreign rows.
    ///
    /// If any statement fails the transaction rolls back and every category
    /// keeps its pre-call value; readers never observe the intermediate
    /// all-reset state.
    ///
    /// Returns the number of cards that received a named category.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement in the transaction fails (the
    /// rollback has already happened by the time the error is returned)
    pub async fn apply_category_assignments(
        pool: &PgPool,
        project_id: i64,
        assignments: &[ClusterAssignment],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE cards SET category = $2, updated_at = NOW() WHERE project_id = $1")
            .bind(project_id)
            .bind(UNCLASSIFIED_CATEGORY)
            .execute(&mut *tx)
            .await?;

        let mut classified = 0u64;
        for cluster in assignments {
            if cluster.card_ids.is_empty() {
                continue;
            }

            let result = sqlx::query(
                r#"
                UPDATE cards
                SET category = $2, updated_at = NOW()
                WHERE project_id = $1 AND id = ANY($3)
                "#,
            )
            .bind(project_id)
            .bind(&cluster.category_name)
            .bind(&cluster.card_ids)
            .execute(&mut *tx)
            .await?;

            classified += result.rows_affected();
        }

        tx.commit().await?;

        Ok(classified)
    }

    /// Returns the distinct tags across a project's cards, sorted
    ///
    /// Tags are normalized at write time, so a plain `DISTINCT` over the
    /// unnested arrays is the whole computation. Order carries no meaning;
    /// sorting just keeps the output stable.
    pub async fn unique_tags(
        pool: &PgPool,
        user_id: i64,
        project_id: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        let tags: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT t.tag
            FROM cards
            CROSS JOIN LATERAL unnest(cards.tags) AS t(tag)
            WHERE project_id = $1 AND user_id = $2
            ORDER BY t.tag
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tags.into_iter().map(|(tag,)| tag).collect())
    }

    /// Groups a project's cards by named category
    ///
    /// Unclassified and empty categories are not reported as groups; those
    /// cards form the implicit leftover bucket.
    pub async fn categories(
        pool: &PgPool,
        user_id: i64,
        project_id: i64,
    ) -> Result<Vec<CategoryGroup>, sqlx::Error> {
        let rows: Vec<(String, Vec<i64>)> = sqlx::query_as(
            r#"
            SELECT category, ARRAY_AGG(id ORDER BY id) AS card_ids
            FROM cards
            WHERE project_id = $1 AND user_id = $2
              AND category <> '' AND category <> $3
            GROUP BY category
            ORDER BY category
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(UNCLASSIFIED_CATEGORY)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, card_ids)| CategoryGroup { category, card_ids })
            .collect())
    }
}
