//! Reviews, hotel ratings and the notification inbox through the HTTP API.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{days_ahead, TestApp};
use domain::{NotificationDraft, NotificationKind, NotificationTarget};
use hotel_booking::services::ServiceContainer;

/// Book a stay and have the owner walk it to `completed`; returns the booking id
async fn completed_stay(app: &TestApp, owner: &str, guest: &str, room_id: &str) -> String {
    let (status, booking) = app.book(guest, room_id, days_ahead(1), 1).await;
    assert_eq!(status, StatusCode::CREATED, "{}", booking);
    let id = booking["id"].as_str().unwrap().to_string();

    for next in ["checked_in", "completed"] {
        let (status, body) = app
            .put(
                &format!("/api/bookings/{}/status", id),
                Some(owner),
                json!({ "status": next }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }
    id
}

async fn review(
    app: &TestApp,
    guest: &str,
    hotel_id: &str,
    booking_id: Option<&str>,
    rating: i32,
) -> (StatusCode, Value) {
    app.post(
        "/api/reviews",
        Some(guest),
        json!({
            "hotel_id": hotel_id,
            "booking_id": booking_id,
            "rating": rating,
            "comment": "Pleasant stay"
        }),
    )
    .await
}

#[tokio::test]
async fn test_ratings_roll_up_into_hotel() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (first, _) = app.sign_up("first@example.com", "user").await;
    let (second, _) = app.sign_up("second@example.com", "user").await;
    let (hotel_id, room_id) = app.listed_room(&owner, &admin, 1000.0, 2).await;

    let first_stay = completed_stay(&app, &owner, &first, &room_id).await;
    let (status, body) = review(&app, &first, &hotel_id, Some(&first_stay), 5).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    completed_stay(&app, &owner, &second, &room_id).await;
    let (status, _) = review(&app, &second, &hotel_id, None, 2).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, hotel) = app.get(&format!("/api/hotels/{}", hotel_id), None).await;
    assert_eq!(hotel["review_count"], 2);
    assert_eq!(hotel["average_rating"].as_f64(), Some(3.5));

    let (_, reviews) = app
        .get(&format!("/api/reviews/hotel/{}", hotel_id), None)
        .await;
    assert_eq!(reviews.as_array().map(Vec::len), Some(2));

    // Removing a review recomputes the aggregate
    let doomed = reviews[0]["id"].as_str().unwrap();
    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/admin/reviews/{}", doomed),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, hotel) = app.get(&format!("/api/hotels/{}", hotel_id), None).await;
    assert_eq!(hotel["review_count"], 1);
}

#[tokio::test]
async fn test_review_requires_completed_stay() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (hotel_id, room_id) = app.listed_room(&owner, &admin, 1000.0, 1).await;

    let (status, _) = review(&app, &guest, &hotel_id, None, 4).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, booking) = app.book(&guest, &room_id, days_ahead(2), 1).await;
    let (status, _) = review(&app, &guest, &hotel_id, booking["id"].as_str(), 4).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = review(&app, &guest, &hotel_id, None, 9).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_booking_reviewed_once() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (hotel_id, room_id) = app.listed_room(&owner, &admin, 1000.0, 1).await;
    let stay = completed_stay(&app, &owner, &guest, &room_id).await;

    let (status, _) = review(&app, &guest, &hotel_id, Some(&stay), 4).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = review(&app, &guest, &hotel_id, Some(&stay), 5).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_owner_replies_once() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (rival, _) = app.sign_up("rival@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (hotel_id, room_id) = app.listed_room(&owner, &admin, 1000.0, 1).await;
    let stay = completed_stay(&app, &owner, &guest, &room_id).await;
    let (_, created) = review(&app, &guest, &hotel_id, Some(&stay), 4).await;
    let uri = format!("/api/reviews/{}/reply", created["id"].as_str().unwrap());

    let (status, _) = app
        .put(&uri, Some(&rival), json!({ "reply": "Come to us instead" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, replied) = app
        .put(&uri, Some(&owner), json!({ "reply": "Thank you!" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replied["reply"], "Thank you!");

    let (status, _) = app
        .put(&uri, Some(&owner), json!({ "reply": "Thanks again" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(&uri, Some(&guest), json!({ "reply": "Me too" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mark_all_read_is_idempotent() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (_, room_id) = app.listed_room(&owner, &admin, 1000.0, 3).await;
    app.book(&guest, &room_id, days_ahead(2), 1).await;
    app.book(&guest, &room_id, days_ahead(5), 1).await;

    let (_, count) = app
        .get("/api/notifications/unread-count", Some(&owner))
        .await;
    assert_eq!(count["count"], 3);

    let (status, changed) = app
        .put("/api/notifications/read-all", Some(&owner), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(changed["count"], 3);

    let (status, changed) = app
        .put("/api/notifications/read-all", Some(&owner), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(changed["count"], 0);

    let (_, unread) = app
        .get("/api/notifications?unread_only=true", Some(&owner))
        .await;
    assert_eq!(unread.as_array().map(Vec::len), Some(0));

    let (_, all) = app.get("/api/notifications", Some(&owner)).await;
    let all = all.as_array().cloned().unwrap_or_default();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|n| n["is_read"] == true));
}

#[tokio::test]
async fn test_inbox_entries_belong_to_recipient() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    app.listed_room(&owner, &admin, 1000.0, 1).await;

    let (_, inbox) = app.get("/api/notifications", Some(&owner)).await;
    let id = inbox[0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(&format!("/api/notifications/{}/read", id), Some(&guest), json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, read) = app
        .put(&format!("/api/notifications/{}/read", id), Some(&owner), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["is_read"], true);

    let (status, _) = app
        .request(
            Method::DELETE,
            &format!("/api/notifications/{}", id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_admin_broadcast_to_role() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    app.sign_up("h1@example.com", "hotelier").await;
    app.sign_up("h2@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;

    let (status, sent) = app
        .post(
            "/api/admin/notifications",
            Some(&admin),
            json!({
                "target": "role",
                "role": "hotelier",
                "title": "Policy update",
                "message": "New listing guidelines apply from next month"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", sent);
    assert_eq!(sent["count"], 2);

    let (_, count) = app
        .get("/api/notifications/unread-count", Some(&guest))
        .await;
    assert_eq!(count["count"], 0);

    let (status, _) = app
        .post(
            "/api/admin/notifications",
            Some(&guest),
            json!({ "target": "all", "title": "Hi", "message": "Spam" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, stats) = app.get("/api/admin/stats", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["users"]["hotelier"], 2);
    assert_eq!(stats["users"]["admin"], 1);
}

#[tokio::test]
async fn test_broadcast_reaches_thousands_of_users() {
    let app = TestApp::spawn().await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    app.seed_guests(6000).await;

    let draft = NotificationDraft::new(
        NotificationKind::General,
        "Scheduled maintenance",
        "Bookings are paused tonight",
    );
    let sent = app
        .services
        .notifications()
        .send(NotificationTarget::All, draft)
        .await
        .expect("broadcast succeeds");
    assert_eq!(sent, 6001);

    let (_, count) = app
        .get("/api/notifications/unread-count", Some(&guest))
        .await;
    assert_eq!(count["count"], 1);
}
