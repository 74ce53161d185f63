//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `quescheetah_test`)
//!   `TEST_DB_PASSWORD` (default: `quescheetah_test`)
//!   `TEST_DB_NAME` (default: `quescheetah_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use quescheetah_common::AppError;
use quescheetah_db::entities::{answer, api_key, question, user_answer};
use quescheetah_db::repositories::{
    AnswerRepository, ApiKeyRepository, QuestionRepository, UserAnswerRepository,
};
use quescheetah_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::Set;

async fn seed_owner(db: &TestDatabase, id: &str) -> api_key::Model {
    let now = Utc::now();
    ApiKeyRepository::new(Arc::new(db.conn.clone()))
        .create(api_key::ActiveModel {
            id: Set(id.to_string()),
            name: Set(format!("owner {id}")),
            key_hash: Set(format!("{id:0>64}")),
            created_dt: Set(now.into()),
            updated_dt: Set(now.into()),
        })
        .await
        .unwrap()
}

fn new_question(id: &str, owner: &str, title: &str) -> question::ActiveModel {
    let now = Utc::now();
    question::ActiveModel {
        id: Set(id.to_string()),
        api_key_id: Set(owner.to_string()),
        question_type: Set(question::QuestionType::Vote),
        multi_question_id: Set(None),
        question_title: Set(title.to_string()),
        question_text: Set("text".to_string()),
        is_closed: Set(false),
        start_dt: Set(now.into()),
        end_dt: Set((now + Duration::days(30)).into()),
        is_editable: Set(true),
        is_private: Set(false),
        created_dt: Set(now.into()),
        updated_dt: Set(now.into()),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_title_rejected_by_unique_index() {
    let db = TestDatabase::create_unique().await.expect("Failed to connect");
    seed_owner(&db, "k1").await;
    seed_owner(&db, "k2").await;
    let repo = QuestionRepository::new(Arc::new(db.conn.clone()));

    repo.create(new_question("q1", "k1", "Lunch")).await.unwrap();
    let duplicate = repo.create(new_question("q2", "k1", "Lunch")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // Same title under another owner is fine.
    repo.create(new_question("q3", "k2", "Lunch")).await.unwrap();

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_answer_count_and_respondent_uniqueness() {
    let db = TestDatabase::create_unique().await.expect("Failed to connect");
    seed_owner(&db, "k1").await;
    let conn = Arc::new(db.conn.clone());
    QuestionRepository::new(conn.clone())
        .create(new_question("q1", "k1", "Lunch"))
        .await
        .unwrap();

    let now = Utc::now();
    AnswerRepository::new(conn.clone())
        .create(answer::ActiveModel {
            id: Set("a1".to_string()),
            question_id: Set("q1".to_string()),
            answer_text: Set("Pizza".to_string()),
            answer_num: Set(Some(1)),
            created_dt: Set(now.into()),
            updated_dt: Set(now.into()),
        })
        .await
        .unwrap();

    let responses = UserAnswerRepository::new(conn);
    assert_eq!(responses.count_by_answer("a1").await.unwrap(), 0);

    for user in ["alice", "bob", "carol"] {
        responses
            .create(user_answer::ActiveModel {
                id: Set(format!("ua_{user}")),
                answer_id: Set("a1".to_string()),
                question_id: Set("q1".to_string()),
                unique_user: Set(user.to_string()),
                created_dt: Set(now.into()),
                updated_dt: Set(now.into()),
            })
            .await
            .unwrap();
    }
    assert_eq!(responses.count_by_answer("a1").await.unwrap(), 3);

    let again = responses
        .create(user_answer::ActiveModel {
            id: Set("ua_alice_2".to_string()),
            answer_id: Set("a1".to_string()),
            question_id: Set("q1".to_string()),
            unique_user: Set("alice".to_string()),
            created_dt: Set(now.into()),
            updated_dt: Set(now.into()),
        })
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    db.drop_database().await.unwrap();
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testdb"));
}
