//! Message endpoint tests: sending, reading and read-state transitions

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{authed_request, parse_body, TestApp, TestUser, ITEM_ID};

/// Start a conversation as `buyer` and return its id
async fn start(app: &TestApp, buyer: &TestUser, seller: &TestUser, message: &str) -> String {
    let req = authed_request(
        Method::POST,
        "/v1/conversations",
        &buyer.jwt,
        Some(json!({
            "seller_id": seller.id(),
            "item_id": ITEM_ID,
            "initial_message": message,
        })),
    );
    let body = parse_body(app.router().oneshot(req).await.unwrap()).await;
    body["conversation"]["id"].as_str().unwrap().to_string()
}

async fn send(app: &TestApp, sender: &TestUser, conversation_id: &str, content: &str) -> StatusCode {
    let req = authed_request(
        Method::POST,
        &format!("/v1/conversations/{}/messages", conversation_id),
        &sender.jwt,
        Some(json!({ "content": content })),
    );
    app.router().oneshot(req).await.unwrap().status()
}

async fn read(app: &TestApp, viewer: &TestUser, conversation_id: &str) -> (StatusCode, Value) {
    let req = authed_request(
        Method::GET,
        &format!("/v1/conversations/{}/messages", conversation_id),
        &viewer.jwt,
        None,
    );
    let resp = app.router().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, parse_body(resp).await)
}

mod test_send_message {
    use super::*;

    #[tokio::test]
    async fn test_participant_reply_returns_message() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        let id = start(&app, &buyer, &seller, "Is this available?").await;

        let req = authed_request(
            Method::POST,
            &format!("/v1/conversations/{}/messages", id),
            &seller.jwt,
            Some(json!({ "content": "Yes, still available" })),
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = parse_body(resp).await;
        assert_eq!(body["conversation_id"], id);
        assert_eq!(body["sender_id"], seller.id().to_string());
        assert_eq!(body["content"], "Yes, still available");
        assert_eq!(body["read"], false);
    }

    #[tokio::test]
    async fn test_replies_do_not_notify_seller_again() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        let id = start(&app, &buyer, &seller, "Hi").await;

        send(&app, &seller, &id, "Hello").await;
        send(&app, &buyer, &id, "Can you ship?").await;

        assert_eq!(app.email.email_count(), 1);
    }

    #[tokio::test]
    async fn test_stranger_cannot_send() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        let stranger = app.create_user("Eve");
        let id = start(&app, &buyer, &seller, "Hi").await;

        assert_eq!(send(&app, &stranger, &id, "Me too").await, StatusCode::FORBIDDEN);
        assert_eq!(app.store.message_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");

        let status = send(&app, &buyer, &Uuid::new_v4().to_string(), "Hello?").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_content_is_rejected() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        let id = start(&app, &buyer, &seller, "Hi").await;

        assert_eq!(send(&app, &seller, &id, "").await, StatusCode::BAD_REQUEST);
        assert_eq!(send(&app, &seller, &id, "  \n ").await, StatusCode::BAD_REQUEST);
        assert_eq!(app.store.message_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_conversation_id_is_rejected() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");

        let status = send(&app, &buyer, "not-a-uuid", "Hello").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

mod test_get_messages {
    use super::*;

    #[tokio::test]
    async fn test_messages_are_oldest_first_with_sender() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        let id = start(&app, &buyer, &seller, "first").await;
        send(&app, &seller, &id, "second").await;
        send(&app, &buyer, &id, "third").await;

        let (status, body) = read(&app, &buyer, &id).await;
        assert_eq!(status, StatusCode::OK);

        let contents: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(body[1]["sender"]["id"], seller.id().to_string());
        assert_eq!(body[1]["sender"]["name"], "Sally");
    }

    #[tokio::test]
    async fn test_reading_marks_only_incoming_messages() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        let id = start(&app, &buyer, &seller, "Is this available?").await;

        // The sender's own view leaves their message unread for the seller
        let (_, buyer_view) = read(&app, &buyer, &id).await;
        assert_eq!(buyer_view[0]["read"], false);

        let (_, seller_view) = read(&app, &seller, &id).await;
        assert_eq!(seller_view[0]["read"], true);

        // Reading again is a no-op
        let (status, again) = read(&app, &seller, &id).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again[0]["read"], true);
    }

    #[tokio::test]
    async fn test_stranger_cannot_read_or_mark() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        let stranger = app.create_user("Eve");
        let id = start(&app, &buyer, &seller, "Hi").await;

        let (status, _) = read(&app, &stranger, &id).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let req = authed_request(
            Method::GET,
            "/v1/conversations/unread-count",
            &seller.jwt,
            None,
        );
        let body = parse_body(app.router().oneshot(req).await.unwrap()).await;
        assert_eq!(body["count"], 1);
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let app = TestApp::new();
        let user = app.create_user("Bob");

        let (status, body) = read(&app, &user, &Uuid::new_v4().to_string()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
