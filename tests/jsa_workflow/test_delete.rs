//! Deleting JSAs: cascade to steps and attachment cleanup.

use actix_web::test::TestRequest;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_delete_round_trip() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let payload = jsa_payload(
        "Change forklift tyre",
        &[
            ("Chock wheels", "Roll-away", "Chocks"),
            ("Jack axle", "Crush", "Axle stands"),
        ],
    );
    let photo = Some(("tyre.jpg", b"\xff\xd8\xff".as_slice()));
    let (_, body) = post_jsa(&app, &env, &payload, photo).await;
    let id = body["id"].as_i64().unwrap();

    let (_, detail) = get_json(&app, &env, &format!("/api/v1/jsa/{}", id)).await;
    let file = env.attachment_file(detail["jsa"]["attachmentPath"].as_str().unwrap());
    assert!(file.exists());

    let (status, steps) = get_json(&app, &env, &format!("/api/v1/jsa/{}/steps", id)).await;
    assert_eq!(status, 200);
    assert_eq!(steps["steps"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &app,
        &env,
        TestRequest::delete().uri(&format!("/api/v1/jsa/{}", id)),
    )
    .await;
    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(body["success"], true);

    let (status, steps) = get_json(&app, &env, &format!("/api/v1/jsa/{}/steps", id)).await;
    assert_eq!(status, 200);
    assert!(steps["steps"].as_array().unwrap().is_empty());
    assert_eq!(env.count_rows("jsa_steps").await, 0);
    assert!(!file.exists(), "Attachment must be removed with the record");

    let (status, _) = get_json(&app, &env, &format!("/api/v1/jsa/{}", id)).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_delete_only_removes_own_steps() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let (_, a) = post_jsa(
        &app,
        &env,
        &jsa_payload("Paint stairwell", &[("Mask", "Fumes", "Ventilation")]),
        None,
    )
    .await;
    let (_, b) = post_jsa(
        &app,
        &env,
        &jsa_payload("Sweep loading bay", &[("Sweep", "Dust", "Mask"), ("Bag", "Cuts", "Gloves")]),
        None,
    )
    .await;

    let a = a["id"].as_i64().unwrap();
    let b = b["id"].as_i64().unwrap();

    let req = TestRequest::delete().uri(&format!("/api/v1/jsa/{}", a));
    let (status, _) = send(&app, &env, req).await;
    assert_eq!(status, 200);

    let (_, steps) = get_json(&app, &env, &format!("/api/v1/jsa/{}/steps", b)).await;
    assert_eq!(steps["steps"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_delete_missing_is_soft_failure() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    post_jsa(&app, &env, &jsa_payload("Inspect fire doors", &[]), None).await;

    let (status, body) = send(&app, &env, TestRequest::delete().uri("/api/v1/jsa/9999")).await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "JSA 9999 not found");

    let (status, list) = get_json(&app, &env, "/api/v1/jsa").await;
    assert_eq!(status, 200);
    assert_eq!(list["jsas"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_delete_with_already_missing_attachment_succeeds() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let (_, body) = post_jsa(
        &app,
        &env,
        &jsa_payload("Replace roof sheet", &[("Harness on", "Fall", "Anchor")]),
        Some(("roof.png", b"\x89PNG".as_slice())),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    for file in env.stored_files() {
        std::fs::remove_file(file).unwrap();
    }

    let req = TestRequest::delete().uri(&format!("/api/v1/jsa/{}", id));
    let (status, body) = send(&app, &env, req).await;
    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(body["success"], true);
    assert!(body.get("warnings").is_none());
}
