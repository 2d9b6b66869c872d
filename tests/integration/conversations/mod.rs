//! Conversation endpoint tests: contacting sellers, listing and detail

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use swapshop_conversations::ItemSummary;

use crate::common::{authed_request, parse_body, TestApp, TestUser, ITEM_ID};

async fn contact_seller(
    app: &TestApp,
    buyer: &TestUser,
    seller_id: Uuid,
    item_id: Option<i64>,
    message: &str,
) -> (StatusCode, Value) {
    let mut body = json!({
        "seller_id": seller_id,
        "initial_message": message,
    });
    if let Some(item_id) = item_id {
        body["item_id"] = json!(item_id);
    }

    let req = authed_request(Method::POST, "/v1/conversations", &buyer.jwt, Some(body));
    let resp = app.router().oneshot(req).await.unwrap();
    let status = resp.status();
    (status, parse_body(resp).await)
}

mod test_start_conversation {
    use super::*;

    #[tokio::test]
    async fn test_first_contact_creates_conversation_and_notifies_seller() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");

        let (status, body) = contact_seller(
            &app,
            &buyer,
            seller.id(),
            Some(ITEM_ID),
            "Is this available?",
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["created"], true);
        assert_eq!(body["conversation"]["buyer_id"], buyer.id().to_string());
        assert_eq!(body["conversation"]["seller_id"], seller.id().to_string());
        assert_eq!(body["conversation"]["item_id"], ITEM_ID);
        assert_eq!(body["message"]["content"], "Is this available?");
        assert_eq!(body["message"]["sender_id"], buyer.id().to_string());
        assert_eq!(body["message"]["read"], false);

        let email = app
            .email
            .get_latest_conversation_email(&seller.profile.email)
            .expect("seller should be notified");
        assert!(email.is_conversation_started());
        assert_eq!(email.item_id(), Some(ITEM_ID));
        assert!(email.message.subject.contains("Bob"));
        assert!(email.message.body_text.contains("Is this available?"));
    }

    #[tokio::test]
    async fn test_repeat_contact_reuses_conversation_without_notifying() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");

        let (_, first) = contact_seller(&app, &buyer, seller.id(), Some(ITEM_ID), "Hi").await;
        let (status, second) =
            contact_seller(&app, &buyer, seller.id(), Some(ITEM_ID), "Still there?").await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(second["created"], false);
        assert_eq!(second["conversation"]["id"], first["conversation"]["id"]);
        assert_eq!(second["message"]["content"], "Still there?");

        assert_eq!(app.store.conversation_count(), 1);
        assert_eq!(app.store.message_count(), 2);
        assert_eq!(app.email.conversation_email_count(&seller.profile.email), 1);
    }

    #[tokio::test]
    async fn test_each_listing_gets_its_own_conversation() {
        let app = TestApp::new();
        app.directory.add_item(ItemSummary {
            id: ITEM_ID + 1,
            name: Some("Helmet".to_string()),
            image_url: None,
        });
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");

        let (_, bike) = contact_seller(&app, &buyer, seller.id(), Some(ITEM_ID), "Bike?").await;
        let (_, helmet) =
            contact_seller(&app, &buyer, seller.id(), Some(ITEM_ID + 1), "Helmet?").await;
        let (_, general) = contact_seller(&app, &buyer, seller.id(), None, "Hello").await;

        assert_ne!(bike["conversation"]["id"], helmet["conversation"]["id"]);
        assert_ne!(bike["conversation"]["id"], general["conversation"]["id"]);
        assert!(general["conversation"]["item_id"].is_null());
        assert_eq!(app.store.conversation_count(), 3);
        assert_eq!(app.email.conversation_email_count(&seller.profile.email), 3);
    }

    #[tokio::test]
    async fn test_contacting_yourself_is_rejected() {
        let app = TestApp::new();
        let seller = app.create_user("Sally");

        let (status, body) =
            contact_seller(&app, &seller, seller.id(), Some(ITEM_ID), "Hi me").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(app.store.conversation_count(), 0);
        assert_eq!(app.email.email_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_seller_is_not_found() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");

        let (status, body) =
            contact_seller(&app, &buyer, Uuid::new_v4(), Some(ITEM_ID), "Hi").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(app.store.conversation_count(), 0);
        assert_eq!(app.store.message_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");

        let (status, _) = contact_seller(&app, &buyer, seller.id(), Some(9_999), "Hi").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(app.store.conversation_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_initial_message_is_rejected() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");

        for message in ["", "   \n\t"] {
            let (status, body) =
                contact_seller(&app, &buyer, seller.id(), Some(ITEM_ID), message).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "message {:?}", message);
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        }
        assert_eq!(app.store.conversation_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_initial_message_is_rejected() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");

        let long = "a".repeat(swapshop_conversations::MAX_MESSAGE_LENGTH + 1);
        let (status, _) = contact_seller(&app, &buyer, seller.id(), Some(ITEM_ID), &long).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.store.message_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_seller_id_is_rejected() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");

        let req = authed_request(
            Method::POST,
            "/v1/conversations",
            &buyer.jwt,
            Some(json!({"seller_id": "not-a-uuid", "initial_message": "Hi"})),
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let app = TestApp::new();
        let seller = app.create_user("Sally");

        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/v1/conversations")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(
                json!({"seller_id": seller.id(), "initial_message": "Hi"}).to_string(),
            ))
            .unwrap();
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = parse_body(resp).await;
        assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");
    }

    #[tokio::test]
    async fn test_token_for_another_secret_is_rejected() {
        let app = TestApp::new();
        let seller = app.create_user("Sally");
        let forged = crate::common::create_test_jwt(Uuid::new_v4(), "some-other-secret").unwrap();

        let req = authed_request(
            Method::POST,
            "/v1/conversations",
            &forged,
            Some(json!({"seller_id": seller.id(), "initial_message": "Hi"})),
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

mod test_list_conversations {
    use super::*;

    #[tokio::test]
    async fn test_list_shows_role_counterpart_item_and_unread() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        contact_seller(&app, &buyer, seller.id(), Some(ITEM_ID), "Is this available?").await;

        let req = authed_request(Method::GET, "/v1/conversations", &seller.jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        let entry = &list[0];
        assert_eq!(entry["role"], "seller");
        assert_eq!(entry["other_user"]["id"], buyer.id().to_string());
        assert_eq!(entry["other_user"]["name"], "Bob");
        assert!(entry["other_user"].get("email").is_none());
        assert_eq!(entry["item"]["name"], "Road Bike");
        assert_eq!(entry["latest_message"]["content"], "Is this available?");
        assert_eq!(entry["unread_count"], 1);

        let req = authed_request(Method::GET, "/v1/conversations", &buyer.jwt, None);
        let body = parse_body(app.router().oneshot(req).await.unwrap()).await;
        assert_eq!(body[0]["role"], "buyer");
        assert_eq!(body[0]["unread_count"], 0);
    }

    #[tokio::test]
    async fn test_list_is_empty_for_new_user() {
        let app = TestApp::new();
        let user = app.create_user("Nina");

        let req = authed_request(Method::GET, "/v1/conversations", &user.jwt, None);
        let resp = app.router().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(parse_body(resp).await, json!([]));
    }
}

mod test_get_conversation {
    use super::*;

    #[tokio::test]
    async fn test_participant_can_view_conversation() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        let (_, started) = contact_seller(&app, &buyer, seller.id(), Some(ITEM_ID), "Hi").await;
        let id = started["conversation"]["id"].as_str().unwrap();

        let req = authed_request(
            Method::GET,
            &format!("/v1/conversations/{}", id),
            &seller.jwt,
            None,
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = parse_body(resp).await;
        assert_eq!(body["id"], id);
        assert_eq!(body["unread_count"], 1);
    }

    #[tokio::test]
    async fn test_stranger_is_forbidden() {
        let app = TestApp::new();
        let buyer = app.create_user("Bob");
        let seller = app.create_user("Sally");
        let stranger = app.create_user("Eve");
        let (_, started) = contact_seller(&app, &buyer, seller.id(), Some(ITEM_ID), "Hi").await;
        let id = started["conversation"]["id"].as_str().unwrap();

        let req = authed_request(
            Method::GET,
            &format!("/v1/conversations/{}", id),
            &stranger.jwt,
            None,
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(parse_body(resp).await["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_not_found() {
        let app = TestApp::new();
        let user = app.create_user("Bob");

        let req = authed_request(
            Method::GET,
            &format!("/v1/conversations/{}", Uuid::new_v4()),
            &user.jwt,
            None,
        );
        let resp = app.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
