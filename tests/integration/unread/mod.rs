//! Unread badge tests, including the end-to-end marketplace exchange

use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{authed_request, parse_body, TestApp, TestUser, ITEM_ID};

async fn unread_count(app: &TestApp, user: &TestUser) -> i64 {
    let req = authed_request(
        Method::GET,
        "/v1/conversations/unread-count",
        &user.jwt,
        None,
    );
    let resp = app.router().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    parse_body(resp).await["count"].as_i64().unwrap()
}

#[tokio::test]
async fn test_new_user_has_no_unread() {
    let app = TestApp::new();
    let user = app.create_user("Nina");
    assert_eq!(unread_count(&app, &user).await, 0);
}

#[tokio::test]
async fn test_unread_count_spans_conversations() {
    let app = TestApp::new();
    let seller = app.create_user("Sally");
    let first = app.create_user("Bob");
    let second = app.create_user("Olga");

    for buyer in [&first, &second] {
        let req = authed_request(
            Method::POST,
            "/v1/conversations",
            &buyer.jwt,
            Some(json!({
                "seller_id": seller.id(),
                "item_id": ITEM_ID,
                "initial_message": "Is this available?",
            })),
        );
        app.router().oneshot(req).await.unwrap();
    }

    assert_eq!(unread_count(&app, &seller).await, 2);
    assert_eq!(unread_count(&app, &first).await, 0);
}

#[tokio::test]
async fn test_marketplace_exchange_end_to_end() {
    let app = TestApp::new();
    let buyer = app.create_user("Bob");
    let seller = app.create_user("Sally");

    // Buyer contacts the seller about the bike
    let req = authed_request(
        Method::POST,
        "/v1/conversations",
        &buyer.jwt,
        Some(json!({
            "seller_id": seller.id(),
            "item_id": ITEM_ID,
            "initial_message": "Is this still available?",
        })),
    );
    let started = parse_body(app.router().oneshot(req).await.unwrap()).await;
    let id = started["conversation"]["id"].as_str().unwrap().to_string();
    assert_eq!(app.email.conversation_email_count(&seller.profile.email), 1);
    assert_eq!(unread_count(&app, &seller).await, 1);

    // Seller opens the thread and replies
    let req = authed_request(
        Method::GET,
        &format!("/v1/conversations/{}/messages", id),
        &seller.jwt,
        None,
    );
    app.router().oneshot(req).await.unwrap();
    assert_eq!(unread_count(&app, &seller).await, 0);

    let req = authed_request(
        Method::POST,
        &format!("/v1/conversations/{}/messages", id),
        &seller.jwt,
        Some(json!({ "content": "Yes! Want to see it Saturday?" })),
    );
    assert_eq!(
        app.router().oneshot(req).await.unwrap().status(),
        StatusCode::CREATED
    );
    assert_eq!(unread_count(&app, &buyer).await, 1);

    // Buyer's list shows the reply as the latest message
    let req = authed_request(Method::GET, "/v1/conversations", &buyer.jwt, None);
    let list = parse_body(app.router().oneshot(req).await.unwrap()).await;
    assert_eq!(list[0]["latest_message"]["content"], "Yes! Want to see it Saturday?");
    assert_eq!(list[0]["unread_count"], 1);

    // Contacting again about the same bike continues the same thread
    let req = authed_request(
        Method::POST,
        "/v1/conversations",
        &buyer.jwt,
        Some(json!({
            "seller_id": seller.id(),
            "item_id": ITEM_ID,
            "initial_message": "Saturday works",
        })),
    );
    let again = parse_body(app.router().oneshot(req).await.unwrap()).await;
    assert_eq!(again["conversation"]["id"], id.as_str());
    assert_eq!(again["created"], false);
    assert_eq!(app.email.conversation_email_count(&seller.profile.email), 1);
    assert_eq!(unread_count(&app, &seller).await, 1);

    let req = authed_request(
        Method::GET,
        &format!("/v1/conversations/{}/messages", id),
        &buyer.jwt,
        None,
    );
    let messages = parse_body(app.router().oneshot(req).await.unwrap()).await;
    assert_eq!(messages.as_array().unwrap().len(), 3);
    assert_eq!(unread_count(&app, &buyer).await, 0);
}
