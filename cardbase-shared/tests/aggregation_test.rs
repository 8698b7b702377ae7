/// Integration tests for tag and category aggregation
///
/// These tests require a running PostgreSQL database (see tests/common).

mod common;

use cardbase_shared::ai::ClusterAssignment;
use cardbase_shared::models::card::{Card, UpdateCard};
use common::{create_test_card, create_test_project, create_test_user, test_pool};

#[tokio::test]
async fn test_unique_tags_set_semantics() {
    let pool = test_pool().await;
    let user_id = create_test_user(&pool).await;
    let project = create_test_project(&pool, user_id).await;

    // Legacy comma-joined entries with duplicates and empties on one card,
    // a plain list on the other.
    create_test_card(&pool, user_id, project.id, "one", vec!["x, y,,x".to_string()]).await;
    create_test_card(&pool, user_id, project.id, "two", vec!["y,z".to_string()]).await;

    let tags = Card::unique_tags(&pool, user_id, project.id).await.unwrap();
    assert_eq!(tags, vec!["x", "y", "z"]);
}

#[tokio::test]
async fn test_unique_tags_insertion_order_independent() {
    let pool = test_pool().await;
    let user_id = create_test_user(&pool).await;

    let forward = create_test_project(&pool, user_id).await;
    create_test_card(&pool, user_id, forward.id, "a", vec!["x, y,,x".to_string()]).await;
    create_test_card(&pool, user_id, forward.id, "b", vec!["y,z".to_string()]).await;

    let reverse = create_test_project(&pool, user_id).await;
    create_test_card(&pool, user_id, reverse.id, "b", vec!["y,z".to_string()]).await;
    create_test_card(&pool, user_id, reverse.id, "a", vec!["x, y,,x".to_string()]).await;

    let forward_tags = Card::unique_tags(&pool, user_id, forward.id).await.unwrap();
    let reverse_tags = Card::unique_tags(&pool, user_id, reverse.id).await.unwrap();

    assert_eq!(forward_tags, reverse_tags);
}

#[tokio::test]
async fn test_unique_tags_empty_project() {
    let pool = test_pool().await;
    let user_id = create_test_user(&pool).await;
    let project = create_test_project(&pool, user_id).await;

    let tags = Card::unique_tags(&pool, user_id, project.id).await.unwrap();
    assert!(tags.is_empty());
}

#[tokio::test]
async fn test_unique_tags_idempotent() {
    let pool = test_pool().await;
    let user_id = create_test_user(&pool).await;
    let project = create_test_project(&pool, user_id).await;

    create_test_card(&pool, user_id, project.id, "a", vec!["rust".to_string()]).await;

    let first = Card::unique_tags(&pool, user_id, project.id).await.unwrap();
    let second = Card::unique_tags(&pool, user_id, project.id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_tags_normalized_on_update() {
    let pool = test_pool().await;
    let user_id = create_test_user(&pool).await;
    let project = create_test_project(&pool, user_id).await;

    let card = create_test_card(&pool, user_id, project.id, "a", vec![]).await;

    let updated = Card::update(
        &pool,
        user_id,
        card.id,
        UpdateCard {
            text: "a".to_string(),
            url: String::new(),
            tags: vec![" rust , web, rust,".to_string()],
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.tags, vec!["rust", "web"]);
}

#[tokio::test]
async fn test_categories_exclude_unclassified_bucket() {
    let pool = test_pool().await;
    let user_id = create_test_user(&pool).await;
    let project = create_test_project(&pool, user_id).await;

    let first = create_test_card(&pool, user_id, project.id, "one", vec![]).await;
    let second = create_test_card(&pool, user_id, project.id, "two", vec![]).await;
    let third = create_test_card(&pool, user_id, project.id, "three", vec![]).await;

    Card::apply_category_assignments(
        &pool,
        project.id,
        &[
            ClusterAssignment {
                category_name: "Alpha".to_string(),
                card_ids: vec![first.id, second.id],
            },
            // third gets no assignment and stays unclassified
        ],
    )
    .await
    .unwrap();

    let groups = Card::categories(&pool, user_id, project.id).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].category, "Alpha");
    assert_eq!(groups[0].card_ids, vec![first.id, second.id]);

    // The unclassified card appears in no group.
    assert!(groups.iter().all(|g| !g.card_ids.contains(&third.id)));
}

#[tokio::test]
async fn test_categories_scoped_to_owner() {
    let pool = test_pool().await;
    let owner = create_test_user(&pool).await;
    let intruder = create_test_user(&pool).await;
    let project = create_test_project(&pool, owner).await;

    let card = create_test_card(&pool, owner, project.id, "one", vec![]).await;
    Card::apply_category_assignments(
        &pool,
        project.id,
        &[ClusterAssignment {
            category_name: "Alpha".to_string(),
            card_ids: vec![card.id],
        }],
    )
    .await
    .unwrap();

    let groups = Card::categories(&pool, intruder, project.id).await.unwrap();
    assert!(groups.is_empty());

    let tags = Card::unique_tags(&pool, intruder, project.id).await.unwrap();
    assert!(tags.is_empty());
}
