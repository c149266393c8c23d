//! Route tests for accounts, bounties, submissions and the leaderboard.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{IMAGE_BASE64, TestApp};

async fn create_bounty(app: &TestApp, token: &str, species: &str, reward: f64, needed: i64) -> i64 {
    let (status, body) = app
        .post(
            "/api/create_bounty",
            Some(token),
            json!({
                "title": format!("Photos of {species}"),
                "plant_species": species,
                "reward": reward,
                "num_submissions_needed": needed,
                "username": "ignored",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "success");
    body["bounty_id"].as_i64().unwrap()
}

async fn submit(app: &TestApp, token: &str, bounty_id: i64) -> i64 {
    let (status, body) = app
        .post(
            "/api/submit_bounty",
            Some(token),
            json!({
                "bounty_id": bounty_id.to_string(),
                "image_base64": IMAGE_BASE64,
                "submission_type": "research",
                "submitter_note": "by the creek",
                "latitude": 45.5,
                "longitude": -122.6,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["submission_id"].as_i64().unwrap()
}

#[tokio::test]
async fn register_twice_is_user_exists() {
    let app = TestApp::new().await;
    app.register("ana").await;

    let (status, body) = app
        .post(
            "/api/add_user",
            None,
            json!({ "username": "ana", "password": "other" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "user_exists");
}

#[tokio::test]
async fn login_reports_stable_messages() {
    let app = TestApp::new().await;
    app.register("ana").await;

    let (status, body) = app
        .post(
            "/api/verify_login",
            None,
            json!({ "username": "ana", "password": "wrong" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid_password");

    let (status, body) = app
        .post(
            "/api/verify_login",
            None,
            json!({ "username": "nobody", "password": "hunter22" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "invalid_user");

    let (status, body) = app
        .post(
            "/api/verify_login",
            None,
            json!({ "username": "ana", "password": "hunter22" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");
    assert_eq!(body["username"], "ana");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn empty_registration_is_bad_request() {
    let app = TestApp::new().await;

    let (status, _) = app.post("/api/add_user", None, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_filters_by_species_and_reward() {
    let app = TestApp::new().await;
    let token = app.register("creator").await;
    create_bounty(&app, &token, "Dandelion", 2.0, 3).await;
    create_bounty(&app, &token, "Wild Garlic", 5.0, 3).await;
    let newest = create_bounty(&app, &token, "Dandelion hybrid", 10.0, 3).await;

    let (status, body) = app.get("/api/search_bounties?plant_species=DANDE", None).await;
    assert_eq!(status, StatusCode::OK);
    let found = body.as_array().unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0]["id"], newest, "newest first");

    let (_, body) = app.get("/api/search_bounties?min_reward=5", None).await;
    let rewards: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["reward"].as_f64().unwrap())
        .collect();
    assert_eq!(rewards, vec![10.0, 5.0]);
}

#[tokio::test]
async fn negative_reward_is_rejected() {
    let app = TestApp::new().await;
    let token = app.register("creator").await;

    let (status, body) = app
        .post(
            "/api/create_bounty",
            Some(&token),
            json!({ "title": "t", "plant_species": "Oak", "reward": -1.0 }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "reward must be a non-negative amount");
}

#[tokio::test]
async fn unknown_bounty_is_bounty_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/get_bounty_details?bounty_id=999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "bounty_not_found");
}

#[tokio::test]
async fn submission_is_identified_and_listed() {
    let app = TestApp::new().await;
    let creator = app.register("creator").await;
    let photographer = app.register("photographer").await;
    let bounty_id = create_bounty(&app, &creator, "Dandelion", 1.5, 2).await;

    let (status, body) = app
        .post(
            "/api/submit_bounty",
            Some(&photographer),
            json!({ "bounty_id": bounty_id, "image_base64": IMAGE_BASE64 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["identified_species"], "Common dandelion");
    assert_eq!(body["scientific_name"], "Taraxacum officinale");

    let (_, details) = app
        .get(&format!("/api/get_bounty_details?bounty_id={bounty_id}"), None)
        .await;
    assert_eq!(details["message"], "success");
    assert_eq!(details["bounty"]["current_submissions"], 1);
    assert_eq!(details["submissions"][0]["status"], "pending_verification");

    let (_, mine) = app
        .get("/api/get_user_bounties?username=photographer", None)
        .await;
    assert_eq!(mine["submitted_bounties"].as_array().unwrap().len(), 1);
    assert!(mine["created_bounties"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn identifier_outage_stores_unknown_but_preview_fails() {
    let app = TestApp::new().await;
    app.fakes.identifier.set_answer(None);
    let creator = app.register("creator").await;
    let photographer = app.register("photographer").await;
    let bounty_id = create_bounty(&app, &creator, "Dandelion", 1.0, 1).await;

    let (status, body) = app
        .post(
            "/api/submit_bounty",
            Some(&photographer),
            json!({ "bounty_id": bounty_id, "image_base64": IMAGE_BASE64 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["identified_species"], "unknown");
    assert_eq!(body["confidence"], 0.0);

    let (status, body) = app
        .post(
            "/api/identify_plant",
            Some(&photographer),
            json!({ "image_base64": IMAGE_BASE64 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["type"], "PROVIDER_FAILED");
}

#[tokio::test]
async fn identify_plant_returns_result() {
    let app = TestApp::new().await;
    let token = app.register("ana").await;

    let (status, body) = app
        .post(
            "/api/identify_plant",
            Some(&token),
            json!({ "image_base64": format!("data:image/jpeg;base64,{IMAGE_BASE64}") }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["species"], "Common dandelion");
}

#[tokio::test]
async fn invalid_base64_is_bad_request() {
    let app = TestApp::new().await;
    let creator = app.register("creator").await;
    let bounty_id = create_bounty(&app, &creator, "Dandelion", 1.0, 1).await;

    let (status, _) = app
        .post(
            "/api/submit_bounty",
            Some(&creator),
            json!({ "bounty_id": bounty_id, "image_base64": "%%%" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approving_twice_credits_once_and_completes_bounty() {
    let app = TestApp::new().await;
    let creator = app.register("creator").await;
    let photographer = app.register("photographer").await;
    let bounty_id = create_bounty(&app, &creator, "Dandelion", 2.5, 1).await;
    let submission_id = submit(&app, &photographer, bounty_id).await;

    let verify = json!({
        "submission_id": submission_id,
        "verified_by": "creator",
        "is_approved": true,
    });
    let (status, body) = app
        .post("/api/verify_submission", Some(&creator), verify.clone())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["modified_count"], 1);

    let (_, body) = app
        .post("/api/verify_submission", Some(&creator), verify)
        .await;
    assert_eq!(body["modified_count"], 0);

    let (_, profile) = app
        .get("/api/get_user_profile?username=photographer", None)
        .await;
    assert_eq!(profile["earnings"], 2.5);
    assert_eq!(profile["earnings_cents"], 250);
    assert_eq!(profile["total_approved_submissions"], 1);

    let (_, details) = app
        .get(&format!("/api/get_bounty_details?bounty_id={bounty_id}"), None)
        .await;
    assert_eq!(details["bounty"]["status"], "completed");

    let (status, _) = app
        .post(
            "/api/submit_bounty",
            Some(&photographer),
            json!({ "bounty_id": bounty_id, "image_base64": IMAGE_BASE64 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "completed bounty takes no submissions");
}

#[tokio::test]
async fn only_creator_can_verify() {
    let app = TestApp::new().await;
    let creator = app.register("creator").await;
    let photographer = app.register("photographer").await;
    let bounty_id = create_bounty(&app, &creator, "Dandelion", 1.0, 1).await;
    let submission_id = submit(&app, &photographer, bounty_id).await;

    let (status, _) = app
        .post(
            "/api/verify_submission",
            Some(&photographer),
            json!({ "submission_id": submission_id, "is_approved": true }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn leaderboard_ranks_by_approved_count() {
    let app = TestApp::new().await;
    let creator = app.register("creator").await;
    let ana = app.register("ana").await;
    let bo = app.register("bo").await;
    let bounty_id = create_bounty(&app, &creator, "Dandelion", 1.0, 10).await;

    for token in [&ana, &bo, &bo] {
        let submission_id = submit(&app, token, bounty_id).await;
        app.post(
            "/api/verify_submission",
            Some(&creator),
            json!({ "submission_id": submission_id, "is_approved": true }),
        )
        .await;
    }

    let (status, body) = app.get("/api/leaderboard?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    let board = body.as_array().unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["username"], "bo");
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[0]["total_approved_submissions"], 2);
    assert_eq!(board[0]["total_earned"], 2.0);
    assert_eq!(board[1]["username"], "ana");
    assert_eq!(board[1]["rank"], 2);
}
