//! Updating JSAs: field rewrite, version checks and attachment replacement.

use super::test_helpers::*;

#[actix_rt::test]
async fn test_update_rewrites_fields_and_bumps_version() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let (_, body) = post_jsa(
        &app,
        &env,
        &jsa_payload("Descale boiler tubes", &[("Drain", "Scalding", "Cool-down")]),
        None,
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let mut changes = jsa_payload("Descale boiler tubes (revised)", &[]);
    changes["status"] = "active".into();
    changes["version"] = 1.into();
    let (status, body) = put_jsa(&app, &env, id, &changes, None).await;
    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(body["success"], true);

    let (_, detail) = get_json(&app, &env, &format!("/api/v1/jsa/{}", id)).await;
    assert_eq!(detail["jsa"]["task"], "Descale boiler tubes (revised)");
    assert_eq!(detail["jsa"]["status"], "Active");
    assert_eq!(detail["jsa"]["version"], 2);
    // Steps are not part of an update.
    assert_eq!(detail["steps"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_stale_version_is_rejected() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let (_, body) = post_jsa(&app, &env, &jsa_payload("Calibrate gas detectors", &[]), None).await;
    let id = body["id"].as_i64().unwrap();

    let mut first = jsa_payload("Calibrate gas detectors weekly", &[]);
    first["version"] = 1.into();
    let (status, _) = put_jsa(&app, &env, id, &first, None).await;
    assert_eq!(status, 200);

    let mut stale = jsa_payload("Calibrate gas detectors monthly", &[]);
    stale["version"] = 1.into();
    let cert = Some(("cert.pdf", b"%PDF".as_slice()));
    let (status, body) = put_jsa(&app, &env, id, &stale, cert).await;
    assert_eq!(status, 409, "{:?}", body);
    assert_eq!(body["success"], false);

    let (_, detail) = get_json(&app, &env, &format!("/api/v1/jsa/{}", id)).await;
    assert_eq!(detail["jsa"]["task"], "Calibrate gas detectors weekly");
    assert!(env.stored_files().is_empty(), "Rejected update must not leave its file");
}

#[actix_rt::test]
async fn test_update_without_version_is_last_write_wins() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let (_, body) = post_jsa(&app, &env, &jsa_payload("Clear storm drains", &[]), None).await;
    let id = body["id"].as_i64().unwrap();

    for task in ["Clear storm drains (north)", "Clear storm drains (south)"] {
        let (status, _) = put_jsa(&app, &env, id, &jsa_payload(task, &[]), None).await;
        assert_eq!(status, 200);
    }

    let (_, detail) = get_json(&app, &env, &format!("/api/v1/jsa/{}", id)).await;
    assert_eq!(detail["jsa"]["task"], "Clear storm drains (south)");
    assert_eq!(detail["jsa"]["version"], 3);
}

#[actix_rt::test]
async fn test_new_attachment_replaces_old_file() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let (_, body) = post_jsa(
        &app,
        &env,
        &jsa_payload("Lift pump with crane", &[]),
        Some(("lift-plan-v1.pdf", b"v1".as_slice())),
    )
    .await;
    let id = body["id"].as_i64().unwrap();
    let (_, detail) = get_json(&app, &env, &format!("/api/v1/jsa/{}", id)).await;
    let old_file = env.attachment_file(detail["jsa"]["attachmentPath"].as_str().unwrap());

    // Without a new file the old reference stays.
    let same = jsa_payload("Lift pump with crane", &[]);
    let (status, _) = put_jsa(&app, &env, id, &same, None).await;
    assert_eq!(status, 200);
    assert!(old_file.exists());

    let (status, _) = put_jsa(
        &app,
        &env,
        id,
        &jsa_payload("Lift pump with crane", &[]),
        Some(("lift-plan-v2.pdf", b"v2".as_slice())),
    )
    .await;
    assert_eq!(status, 200);

    let (_, detail) = get_json(&app, &env, &format!("/api/v1/jsa/{}", id)).await;
    let reference = detail["jsa"]["attachmentPath"].as_str().unwrap();
    assert!(reference.ends_with("-lift_plan_v2.pdf"));
    assert!(!old_file.exists());
    assert_eq!(env.stored_files().len(), 1);
}

#[actix_rt::test]
async fn test_update_missing_returns_not_found() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let (status, body) = put_jsa(&app, &env, 4242, &jsa_payload("Nothing to see", &[]), None).await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn test_update_is_validated() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let (_, body) = post_jsa(&app, &env, &jsa_payload("Repair dock leveller", &[]), None).await;
    let id = body["id"].as_i64().unwrap();

    let mut bad = jsa_payload("Fix", &[]);
    bad["status"] = "Archived".into();
    let (status, body) = put_jsa(&app, &env, id, &bad, None).await;
    assert_eq!(status, 400);
    assert_eq!(body["fieldErrors"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_update_ignores_resent_steps() {
    let env = create_test_env().await;
    let app = create_test_app(&env).await;

    let created = jsa_payload(
        "Replace roof sheeting",
        &[("Set up harness", "Fall", "Anchor point")],
    );
    let (_, body) = post_jsa(&app, &env, &created, None).await;
    let id = body["id"].as_i64().unwrap();

    // An edit form resending a blank step must not fail on it
    let edited = jsa_payload("Replace roof sheeting panels", &[("", "", "")]);
    let (status, body) = put_jsa(&app, &env, id, &edited, None).await;
    assert_eq!(status, 200, "{:?}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["warnings"].as_array().unwrap().len(), 1);

    let (_, detail) = get_json(&app, &env, &format!("/api/v1/jsa/{}", id)).await;
    assert_eq!(detail["jsa"]["task"], "Replace roof sheeting panels");
    let steps = detail["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0]["description"], "Set up harness");
}
