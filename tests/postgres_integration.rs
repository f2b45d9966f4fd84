// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Postgres integration tests.
//!
//! These tests require a disposable Postgres database:
//!   DATABASE_URL=postgres://localhost/trip_planner_test cargo test
//!
//! Every test creates its own users with unique emails, so runs do not
//! interfere with each other or with leftover rows.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use std::collections::HashSet;
use tower::ServiceExt;
use trip_planner::config::Config;
use trip_planner::db::Db;
use trip_planner::error::AppError;
use trip_planner::models::{NewExpense, NewPlan, NewUser, Plan, PlanUpdate, User};

mod common;
use common::test_db;

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, uuid::Uuid::new_v4())
}

async fn create_user(db: &Db, prefix: &str) -> User {
    db.create_user(&NewUser {
        name: prefix.to_string(),
        email: unique_email(prefix),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$not-a-real-hash".to_string(),
    })
    .await
    .unwrap()
}

async fn create_plan(db: &Db, owner: &User, is_published: bool) -> Plan {
    db.create_plan(
        &owner.id,
        &NewPlan {
            title: "Kyoto in autumn".to_string(),
            destination: Some("Kyoto".to_string()),
            content: serde_json::json!({ "days": [{ "title": "Arashiyama" }] }),
            is_published,
        },
    )
    .await
    .unwrap()
}

async fn add_expense(db: &Db, plan: &Plan, label: &str, amount: f64) -> String {
    db.create_expense(
        &plan.id,
        &NewExpense {
            amount,
            label: label.to_string(),
            category: None,
            spent_at: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn expense_ids(db: &Db, plan: &Plan) -> HashSet<String> {
    db.list_expenses_for_plan(&plan.id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPENSE REPOSITORY
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_delete_expenses_removes_exactly_listed_rows() {
    require_database!();

    let db = test_db().await;
    let owner = create_user(&db, "bulk").await;
    let plan = create_plan(&db, &owner, false).await;
    let other_plan = create_plan(&db, &owner, false).await;

    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(add_expense(&db, &plan, &format!("item {}", i), 10.0).await);
    }
    let untouched = add_expense(&db, &other_plan, "hotel", 250.0).await;

    let before = expense_ids(&db, &plan).await;
    let to_delete = vec![ids[1].clone(), ids[3].clone()];

    let deleted = db.delete_expenses(&to_delete, &owner.id).await.unwrap();
    assert_eq!(deleted, 2);

    let after = expense_ids(&db, &plan).await;
    let removed: HashSet<String> = before.difference(&after).cloned().collect();
    assert_eq!(removed, to_delete.iter().cloned().collect());
    assert!(expense_ids(&db, &other_plan).await.contains(&untouched));

    // Repeating the delete is a no-op.
    let deleted = db.delete_expenses(&to_delete, &owner.id).await.unwrap();
    assert_eq!(deleted, 0);
    assert_eq!(expense_ids(&db, &plan).await, after);
}

#[tokio::test]
async fn test_delete_expenses_skips_other_owners() {
    require_database!();

    let db = test_db().await;
    let alice = create_user(&db, "alice").await;
    let mallory = create_user(&db, "mallory").await;
    let plan = create_plan(&db, &alice, true).await;
    let id = add_expense(&db, &plan, "train", 42.0).await;

    let deleted = db
        .delete_expenses(&[id.clone()], &mallory.id)
        .await
        .unwrap();
    assert_eq!(deleted, 0);
    assert!(expense_ids(&db, &plan).await.contains(&id));
}

#[tokio::test]
async fn test_expenses_are_scoped_to_plan_and_cascade() {
    require_database!();

    let db = test_db().await;
    let owner = create_user(&db, "scope").await;
    let plan_a = create_plan(&db, &owner, false).await;
    let plan_b = create_plan(&db, &owner, false).await;

    let a = add_expense(&db, &plan_a, "museum", 15.0).await;
    let b = add_expense(&db, &plan_b, "ferry", 30.0).await;

    assert_eq!(expense_ids(&db, &plan_a).await, HashSet::from([a.clone()]));
    assert!(!db.delete_expense(&plan_a.id, &b).await.unwrap());
    assert!(db.delete_expense(&plan_b.id, &b).await.unwrap());

    assert!(db.delete_plan(&plan_a.id, &owner.id).await.unwrap());
    assert!(db.list_expenses_for_plan(&plan_a.id).await.unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// PLAN REPOSITORY
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_update_plan_clears_destination_only_when_null() {
    require_database!();

    let db = test_db().await;
    let owner = create_user(&db, "update").await;
    let plan = create_plan(&db, &owner, false).await;
    assert_eq!(plan.destination.as_deref(), Some("Kyoto"));

    let retitle = PlanUpdate {
        title: Some("Kyoto and Nara".to_string()),
        ..Default::default()
    };
    let updated = db
        .update_plan(&plan.id, &owner.id, &retitle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, "Kyoto and Nara");
    assert_eq!(updated.destination.as_deref(), Some("Kyoto"));

    let clear = PlanUpdate {
        destination: Some(None),
        ..Default::default()
    };
    let updated = db
        .update_plan(&plan.id, &owner.id, &clear)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.destination, None);
    assert_eq!(updated.title, "Kyoto and Nara");
}

#[tokio::test]
async fn test_published_total_survives_page_past_end() {
    require_database!();

    let db = test_db().await;
    let owner = create_user(&db, "pastend").await;
    create_plan(&db, &owner, true).await;

    let page = db.list_published_plans(50, 1_000_000).await.unwrap();
    assert!(page.plans.is_empty());
    assert!(page.total >= 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// USERS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    require_database!();

    let db = test_db().await;
    let user = create_user(&db, "dup").await;

    let err = db
        .create_user(&NewUser {
            name: "Again".to_string(),
            email: user.email.clone(),
            password_hash: "x".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let found = db.find_user_by_email(&user.email).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
}

// ═══════════════════════════════════════════════════════════════════════════
// HTTP FLOWS
// ═══════════════════════════════════════════════════════════════════════════

async fn app_with_db() -> (axum::Router, std::sync::Arc<trip_planner::AppState>) {
    common::create_test_app_with(test_db().await, Config::test_default())
}

#[tokio::test]
async fn test_public_fetch_of_unpublished_plan_is_404() {
    require_database!();

    let (app, state) = app_with_db().await;
    let owner = create_user(&state.db, "private").await;
    let plan = create_plan(&state.db, &owner, false).await;
    let owner_token = common::create_test_token(&state, &owner.id);

    // Even the owner gets 404 in public mode.
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/plans/{}?public=true", plan.id))
                .header(header::AUTHORIZATION, format!("Bearer {}", owner_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = common::body_json(response).await;
    assert_eq!(body, serde_json::json!({ "error": "Plan not found or not public" }));
}

#[tokio::test]
async fn test_public_fetch_of_published_plan() {
    require_database!();

    let (app, state) = app_with_db().await;
    let owner = create_user(&state.db, "public").await;
    let plan = create_plan(&state.db, &owner, true).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/plans/{}?public=true", plan.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["plan"]["id"], plan.id);
    assert_eq!(body["plan"]["isPublished"], true);
    assert_eq!(body["plan"]["content"]["days"][0]["title"], "Arashiyama");
}

#[tokio::test]
async fn test_member_fetch_of_someone_elses_private_plan_is_404() {
    require_database!();

    let (app, state) = app_with_db().await;
    let owner = create_user(&state.db, "owner").await;
    let other = create_user(&state.db, "other").await;
    let plan = create_plan(&state.db, &owner, false).await;

    for (user, expected) in [(&owner, StatusCode::OK), (&other, StatusCode::NOT_FOUND)] {
        let token = common::create_test_token(&state, &user.id);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/plans/{}", plan.id))
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn test_expenses_of_someone_elses_published_plan_are_404() {
    require_database!();

    let (app, state) = app_with_db().await;
    let owner = create_user(&state.db, "sharer").await;
    let reader = create_user(&state.db, "reader").await;
    let plan = create_plan(&state.db, &owner, true).await;
    add_expense(&state.db, &plan, "hotel", 120.0).await;
    let token = common::create_test_token(&state, &reader.id);

    let list = Request::builder()
        .uri(format!("/api/plans/{}/expenses", plan.id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let create = Request::builder()
        .method("POST")
        .uri(format!("/api/plans/{}/expenses", plan.id))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(r#"{"amount": 5.0, "label": "Snack"}"#))
        .unwrap();

    for request in [list, create] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            common::body_json(response).await,
            serde_json::json!({ "error": "Plan not found or not public" })
        );
    }

    assert_eq!(
        state.db.list_expenses_for_plan(&plan.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_put_null_destination_clears_it() {
    require_database!();

    let (app, state) = app_with_db().await;
    let owner = create_user(&state.db, "editor").await;
    let plan = create_plan(&state.db, &owner, false).await;
    let token = common::create_test_token(&state, &owner.id);

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/plans/{}", plan.id))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(r#"{"destination": null, "title": "t2"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["plan"]["title"], "t2");
    assert!(body["plan"]["destination"].is_null());
}

#[tokio::test]
async fn test_bulk_delete_then_listing() {
    require_database!();

    let (app, state) = app_with_db().await;
    let owner = create_user(&state.db, "flow").await;
    let plan = create_plan(&state.db, &owner, false).await;
    let a1 = add_expense(&state.db, &plan, "breakfast", 8.0).await;
    let a2 = add_expense(&state.db, &plan, "lunch", 14.0).await;
    let keep = add_expense(&state.db, &plan, "dinner", 30.0).await;
    let token = common::create_test_token(&state, &owner.id);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/plans/expenses/delete-multiple")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(
                    serde_json::json!({ "ids": [a1.clone(), a2.clone()] }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        common::body_json(response).await,
        serde_json::json!({ "success": true })
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/plans/{}/expenses", plan.id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let listed: Vec<&str> = body["expenses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec![keep.as_str()]);
    assert_eq!(body["count"], 1);
    assert_eq!(body["total"], 30.0);
}

#[tokio::test]
async fn test_signup_duplicate_email_returns_409() {
    require_database!();

    let (app, state) = app_with_db().await;
    let email = unique_email("signup");
    let body = serde_json::json!({
        "name": "Grace",
        "email": email,
        "password": "a long enough password",
    })
    .to_string();

    let signup = |body: String| {
        Request::builder()
            .method("POST")
            .uri("/api/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    };

    let response = app.clone().oneshot(signup(body.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("auth-token=")));
    let created = common::body_json(response).await;
    assert!(created["user"].get("passwordHash").is_none());

    // Same address with different casing still collides.
    let shouting = body.replace(&email, &email.to_uppercase());
    let response = app.oneshot(signup(shouting)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let found = state.db.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, created["user"]["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_community_listing_only_published() {
    require_database!();

    let (app, state) = app_with_db().await;
    let owner = create_user(&state.db, "community").await;
    let hidden = create_plan(&state.db, &owner, false).await;
    let shown = create_plan(&state.db, &owner, true).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/community-plans?page=1&limit=50")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let plans = body["plans"].as_array().unwrap();
    assert!(plans.iter().all(|p| p["isPublished"] == true));
    assert!(plans.iter().all(|p| p["id"] != hidden.id.as_str()));
    // Newest first, so the plan just published is on the first page.
    assert!(plans.iter().any(|p| p["id"] == shown.id.as_str()));
    assert!(body["total"].as_i64().unwrap() >= 1);
    assert!(body["hasMore"].is_boolean());
}

#[tokio::test]
async fn test_community_page_past_end_keeps_total() {
    require_database!();

    let (app, state) = app_with_db().await;
    let owner = create_user(&state.db, "late").await;
    create_plan(&state.db, &owner, true).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/community-plans?page=100000&limit=50")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert!(body["plans"].as_array().unwrap().is_empty());
    assert!(body["total"].as_i64().unwrap() >= 1);
    assert_eq!(body["hasMore"], false);
}
