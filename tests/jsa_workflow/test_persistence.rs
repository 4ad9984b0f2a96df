//! Aggregate persistence below the HTTP layer: atomic create and orphan cleanup.

use ehs_dashboard_lib::error::AppError;
use ehs_dashboard_lib::models::{JsaInput, JsaStatus, NewJsa, NewJsaStep, StepInput};
use ehs_dashboard_lib::services::{Submission, UploadedFile};

use super::test_helpers::*;

fn record(task: &str) -> NewJsa {
    NewJsa {
        task: task.to_string(),
        location_id: None,
        department: None,
        responsible_person_id: None,
        team_members: None,
        required_ppe: None,
        status: JsaStatus::Draft,
        review_date: None,
        attachment_path: None,
    }
}

fn steps(n: usize) -> Vec<NewJsaStep> {
    (1..=n)
        .map(|i| NewJsaStep {
            description: format!("Step {}", i),
            hazards: "Hazard".to_string(),
            controls: "Control".to_string(),
            risk_level_before: None,
            risk_level_after: None,
        })
        .collect()
}

#[actix_rt::test]
async fn test_failed_step_insert_rolls_back_everything() {
    let env = create_test_env().await;
    env.fail_step_insert(2).await;

    let result = env.pool.create_jsa(record("Strip paint from hull"), steps(3)).await;
    assert!(matches!(result, Err(AppError::Database(_))), "{:?}", result);

    assert_eq!(env.count_rows("jsa").await, 0);
    assert_eq!(env.count_rows("jsa_steps").await, 0);
    assert!(env.pool.list_jsas().await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_pool_still_usable_after_rollback() {
    let env = create_test_env().await;
    env.fail_step_insert(2).await;

    assert!(env.pool.create_jsa(record("Strip paint from hull"), steps(2)).await.is_err());

    let id = env
        .pool
        .create_jsa(record("Single step job"), steps(1))
        .await
        .expect("create after rollback");
    assert_eq!(env.pool.get_jsa_steps(id).await.unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_failed_create_removes_its_attachment() {
    let env = create_test_env().await;
    env.fail_step_insert(2).await;

    let step = |d: &str| StepInput {
        description: d.to_string(),
        hazards: "Noise".to_string(),
        controls: "Ear defenders".to_string(),
        ..Default::default()
    };
    let submission = Submission {
        form: JsaInput {
            task: "Jackhammer slab".to_string(),
            steps: vec![step("Mark out"), step("Break slab")],
            ..Default::default()
        },
        attachment: Some(UploadedFile {
            original_name: "slab.pdf".to_string(),
            bytes: b"%PDF".to_vec(),
        }),
        warnings: Vec::new(),
    };

    let failure = env.service().create(submission).await.unwrap_err();
    assert!(matches!(failure.error, AppError::Database(_)));
    assert!(env.stored_files().is_empty(), "No orphaned file may remain");
    assert_eq!(env.count_rows("jsa").await, 0);
}

#[actix_rt::test]
async fn test_delete_reports_missing_without_error() {
    let env = create_test_env().await;

    let outcome = env.pool.delete_jsa(77).await.unwrap();
    assert!(!outcome.removed);
    assert_eq!(outcome.attachment_path, None);
}

#[actix_rt::test]
async fn test_delete_returns_stored_attachment() {
    let env = create_test_env().await;

    let mut rec = record("Weld handrail");
    rec.attachment_path = Some("/uploads/jsa/1-deadbeef-rail.pdf".to_string());
    let id = env.pool.create_jsa(rec, steps(2)).await.unwrap();

    let outcome = env.pool.delete_jsa(id).await.unwrap();
    assert!(outcome.removed);
    assert_eq!(
        outcome.attachment_path.as_deref(),
        Some("/uploads/jsa/1-deadbeef-rail.pdf")
    );
    assert!(env.pool.get_jsa_steps(id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_delete_that_removes_nothing_is_not_reported_as_removed() {
    let env = create_test_env().await;

    let mut rec = record("Change forklift battery");
    rec.attachment_path = Some("/uploads/jsa/1-cafebabe-battery.pdf".to_string());
    let id = env.pool.create_jsa(rec, steps(2)).await.unwrap();
    env.ignore_jsa_delete().await;

    let outcome = env.pool.delete_jsa(id).await.unwrap();
    assert!(!outcome.removed);
    assert_eq!(outcome.attachment_path, None);

    // The step delete was rolled back with the rest of the transaction
    assert_eq!(env.count_rows("jsa").await, 1);
    assert_eq!(env.pool.get_jsa_steps(id).await.unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_press_operation_lifecycle_without_attachment() {
    let env = create_test_env().await;
    let line = env
        .pool
        .create_location("Press Line 2", None)
        .await
        .unwrap();

    let mut rec = record("Operate Press P-10");
    rec.location_id = Some(line.id);
    let step = NewJsaStep {
        description: "Load blank".to_string(),
        hazards: "Crush".to_string(),
        controls: "Two-hand control".to_string(),
        risk_level_before: None,
        risk_level_after: None,
    };
    let id = env.pool.create_jsa(rec, vec![step]).await.unwrap();

    let jsa = env.pool.get_jsa(id).await.unwrap().expect("created JSA");
    assert_eq!(jsa.location_name.as_deref(), Some("Press Line 2"));
    assert_eq!(jsa.attachment_path, None);

    let stored = env.pool.get_jsa_steps(id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].step_order, 1);
    assert_eq!(stored[0].description, "Load blank");

    let outcome = env.pool.delete_jsa(id).await.unwrap();
    assert!(outcome.removed);
    assert_eq!(outcome.attachment_path, None);
    assert!(env.pool.get_jsa_steps(id).await.unwrap().is_empty());
    assert!(env.pool.get_jsa(id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_unknown_stored_status_is_a_database_error() {
    use sea_orm::ConnectionTrait;

    let env = create_test_env().await;
    let id = env.pool.create_jsa(record("Clean paint booth"), steps(1)).await.unwrap();

    env.pool
        .connection()
        .execute_unprepared(&format!("UPDATE jsa SET status = 'Archived' WHERE id = {}", id))
        .await
        .unwrap();

    assert!(matches!(env.pool.get_jsa(id).await, Err(AppError::Database(_))));
    assert!(matches!(env.pool.list_jsas().await, Err(AppError::Database(_))));
}

#[actix_rt::test]
async fn test_schema_cascade_removes_steps() {
    use sea_orm::ConnectionTrait;

    let env = create_test_env().await;
    let id = env.pool.create_jsa(record("Test fire pump"), steps(3)).await.unwrap();

    env.pool
        .connection()
        .execute_unprepared(&format!("DELETE FROM jsa WHERE id = {}", id))
        .await
        .unwrap();

    assert_eq!(env.count_rows("jsa_steps").await, 0);
}

#[actix_rt::test]
async fn test_version_check_in_update() {
    let env = create_test_env().await;
    let id = env.pool.create_jsa(record("Inspect ladders"), steps(0)).await.unwrap();

    let outcome = env
        .pool
        .update_jsa(id, record("Inspect ladders quarterly"), Some(1))
        .await
        .unwrap();
    assert_eq!(outcome.version, 2);
    assert_eq!(outcome.previous_attachment, None);

    let err = env
        .pool
        .update_jsa(id, record("Inspect ladders yearly"), Some(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = env
        .pool
        .update_jsa(id + 1, record("Inspect ladders yearly"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
