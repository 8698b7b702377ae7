/// Card clustering engine
///
/// Reassigns category labels across all cards of a project in one atomic
/// operation, driven by the external classification backend. The protocol
/// is strictly ordered:
///
/// 1. verify project ownership (short-circuits with no side effects);
/// 2. snapshot `(id, text)` of every card under the project/owner pair;
/// 3. an empty snapshot fails with [`ClusterError::NoCards`] before any
///    transaction is opened;
/// 4. submit the full snapshot to the backend in one batched call; a
///    backend failure aborts before any database mutation;
/// 5. apply the returned clusters via
///    [`Card::apply_category_assignments`]: reset every card to the
///    unclassified sentinel, then one bulk update per cluster, all inside
///    a single transaction.
///
/// The full reset (instead of a diff) is what guarantees that no label
/// from a previous run survives when the backend renames or merges
/// categories; cluster membership is not stable across calls. Atomicity
/// comes from the database transaction, not from request-level locking:
/// two concurrent runs on the same project race and the last commit wins,
/// but no reader ever observes a half-reset project.
///
/// # Example
///
/// ```no_run
/// use cardbase_shared::ai::AiBackend;
/// use cardbase_shared::cluster::cluster_project_cards;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, backend: &dyn AiBackend, user_id: i64, project_id: i64)
/// # -> Result<(), Box<dyn std::error::Error>> {
/// let summary = cluster_project_cards(&pool, backend, user_id, project_id).await?;
/// println!(
///     "{} of {} cards classified into {} clusters",
///     summary.cards_classified, summary.cards_considered, summary.clusters_applied
/// );
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::ai::{AiBackend, AiError};
use crate::auth::authorization::{require_project_owner, OwnershipError};
use crate::models::card::Card;

/// Error type for the clustering engine
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// Ownership check failed
    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    /// The project has no cards to classify
    #[error("Project {0} has no cards to classify")]
    NoCards(i64),

    /// The classification backend failed before any mutation was attempted
    #[error(transparent)]
    Backend(#[from] AiError),

    /// Applying the assignments failed (the transaction rolled back)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of a successful clustering run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Cards snapshotted and submitted to the backend
    pub cards_considered: usize,

    /// Non-empty clusters applied
    pub clusters_applied: usize,

    /// Cards that received a named category; the remainder fell back to
    /// the unclassified sentinel
    pub cards_classified: u64,
}

/// Reclassifies every card in a project against the backend's clustering
///
/// See the module documentation for the protocol. On any error after the
/// apply step has begun, the transaction has already rolled back and every
/// card keeps its previous category.
///
/// # Errors
///
/// - `ClusterError::Ownership` when the caller does not own the project
/// - `ClusterError::NoCards` when the project has nothing to classify
/// - `ClusterError::Backend` when the backend call fails (no mutation done)
/// - `ClusterError::Database` when the apply transaction fails (rolled back)
pub async fn cluster_project_cards(
    pool: &PgPool,
    backend: &dyn AiBackend,
    user_id: i64,
    project_id: i64,
) -> Result<ClusterSummary, ClusterError> {
    require_project_owner(pool, project_id, user_id).await?;

    let snapshot = Card::snapshot_for_clustering(pool, user_id, project_id).await?;
    if snapshot.is_empty() {
        return Err(ClusterError::NoCards(project_id));
    }

    info!(
        project_id,
        cards = snapshot.len(),
        "Submitting cards for clustering"
    );

    let assignments = match backend.cluster_cards(&snapshot).await {
        Ok(assignments) => assignments,
        Err(e) => {
            warn!(project_id, error = %e, "Clustering backend failed");
            return Err(ClusterError::Backend(e));
        }
    };

    let applied: Vec<_> = assignments
        .iter()
        .filter(|a| !a.card_ids.is_empty())
        .cloned()
        .collect();

    let cards_classified = Card::apply_category_assignments(pool, project_id, &applied).await?;

    info!(
        project_id,
        clusters = applied.len(),
        cards_classified,
        "Clustering applied"
    );

    Ok(ClusterSummary {
        cards_considered: snapshot.len(),
        clusters_applied: applied.len(),
        cards_classified,
    })
}
