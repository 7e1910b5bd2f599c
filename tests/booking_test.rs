//! Reservation lifecycle through the HTTP API.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{days_ahead, TestApp};

#[tokio::test]
async fn test_two_nights_priced_with_tax() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (hotelier, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, guest_id) = app.sign_up("guest@example.com", "user").await;
    let (hotel_id, room_id) = app.listed_room(&hotelier, &admin, 1000.0, 1).await;

    let (status, booking) = app.book(&guest, &room_id, days_ahead(10), 2).await;

    assert_eq!(status, StatusCode::CREATED, "{}", booking);
    assert_eq!(booking["status"], "upcoming");
    assert_eq!(booking["nights"], 2);
    assert_eq!(booking["subtotal"].as_f64(), Some(2000.0));
    assert_eq!(booking["total_amount"].as_f64(), Some(2260.0));
    assert_eq!(booking["hotel_id"], hotel_id.as_str());
    assert_eq!(booking["guest_id"], guest_id.as_str());
    assert_eq!(booking["payment_method"], "pay_at_hotel");

    // Owner is told about the new booking, on top of the earlier approval notice
    let (_, count) = app
        .get("/api/notifications/unread-count", Some(&hotelier))
        .await;
    assert_eq!(count["count"], 2);

    let (_, inbox) = app.get("/api/notifications", Some(&hotelier)).await;
    let inbox = inbox.as_array().cloned().unwrap_or_default();
    assert!(inbox
        .iter()
        .any(|n| n["kind"] == "booking" && n["title"] == "New booking"));
}

#[tokio::test]
async fn test_checkout_before_checkin_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (hotelier, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (_, room_id) = app.listed_room(&hotelier, &admin, 1000.0, 1).await;

    let (status, body) = app
        .post(
            "/api/bookings",
            Some(&guest),
            json!({
                "room_id": room_id,
                "check_in": days_ahead(5),
                "check_out": days_ahead(5),
                "guests": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DATE_RANGE");

    let (status, body) = app.book(&guest, &room_id, days_ahead(-1), 2).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_last_unit_cannot_be_double_booked() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (hotelier, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (first, _) = app.sign_up("first@example.com", "user").await;
    let (second, _) = app.sign_up("second@example.com", "user").await;
    let (_, room_id) = app.listed_room(&hotelier, &admin, 800.0, 1).await;

    let (status, _) = app.book(&first, &room_id, days_ahead(10), 3).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.book(&second, &room_id, days_ahead(11), 2).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ROOM_UNAVAILABLE");

    // Back-to-back stays share no night
    let (status, _) = app.book(&second, &room_id, days_ahead(13), 2).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_cancelled_stay_frees_the_room() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (hotelier, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (first, _) = app.sign_up("first@example.com", "user").await;
    let (second, _) = app.sign_up("second@example.com", "user").await;
    let (_, room_id) = app.listed_room(&hotelier, &admin, 800.0, 1).await;

    let (_, booking) = app.book(&first, &room_id, days_ahead(10), 3).await;
    let (status, _) = app
        .put(
            &format!("/api/bookings/{}/cancel", booking["id"].as_str().unwrap()),
            Some(&first),
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.book(&second, &room_id, days_ahead(11), 1).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
}

#[tokio::test]
async fn test_pending_hotel_not_bookable() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (hotelier, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (hotel_id, room_id) = app.listed_room(&hotelier, &admin, 800.0, 1).await;

    app.put(
        &format!("/api/admin/hotels/{}/status", hotel_id),
        Some(&admin),
        json!({ "status": "suspended" }),
    )
    .await;

    let (status, _) = app.book(&guest, &room_id, days_ahead(3), 1).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_foreign_hotelier_cannot_change_status() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (rival, _) = app.sign_up("rival@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (_, room_id) = app.listed_room(&owner, &admin, 1000.0, 2).await;

    let (_, booking) = app.book(&guest, &room_id, days_ahead(7), 2).await;
    let id = booking["id"].as_str().unwrap();

    let (status, _) = app
        .put(
            &format!("/api/bookings/{}/status", id),
            Some(&rival),
            json!({ "status": "checked_in" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, unchanged) = app.get(&format!("/api/bookings/{}", id), Some(&guest)).await;
    assert_eq!(unchanged["status"], "upcoming");

    // Outsiders cannot read it either
    let (status, _) = app.get(&format!("/api/bookings/{}", id), Some(&rival)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cancelled_booking_cannot_be_checked_in() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (_, room_id) = app.listed_room(&owner, &admin, 1000.0, 1).await;

    let (_, booking) = app.book(&guest, &room_id, days_ahead(7), 2).await;
    let id = booking["id"].as_str().unwrap();

    let (status, cancelled) = app
        .put(&format!("/api/bookings/{}/cancel", id), Some(&guest), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, body) = app
        .put(
            &format!("/api/bookings/{}/status", id),
            Some(&owner),
            json!({ "status": "checked_in" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    // The freed unit can be booked again
    let (status, _) = app.book(&guest, &room_id, days_ahead(7), 2).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_stay_moves_forward_only() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (_, room_id) = app.listed_room(&owner, &admin, 1000.0, 1).await;

    let (_, booking) = app.book(&guest, &room_id, days_ahead(1), 1).await;
    let uri = format!("/api/bookings/{}/status", booking["id"].as_str().unwrap());

    let (status, _) = app
        .put(&uri, Some(&owner), json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .put(&uri, Some(&owner), json!({ "status": "checked_in" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "checked_in");

    let (status, body) = app
        .put(&uri, Some(&owner), json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");

    let (_, listed) = app
        .get("/api/bookings/hotelier-bookings?status=completed", Some(&owner))
        .await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_unknown_status_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (_, room_id) = app.listed_room(&owner, &admin, 1000.0, 1).await;

    let (_, booking) = app.book(&guest, &room_id, days_ahead(2), 1).await;
    let (status, body) = app
        .put(
            &format!("/api/bookings/{}/status", booking["id"].as_str().unwrap()),
            Some(&owner),
            json!({ "status": "teleported" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_hotelier_dashboard_counts_revenue() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (_, room_id) = app.listed_room(&owner, &admin, 1000.0, 3).await;

    app.book(&guest, &room_id, days_ahead(4), 2).await;
    let (_, cancelled) = app.book(&guest, &room_id, days_ahead(4), 1).await;
    app.put(
        &format!("/api/bookings/{}/cancel", cancelled["id"].as_str().unwrap()),
        Some(&guest),
        json!({}),
    )
    .await;

    let (status, stats) = app.get("/api/analytics/hotelier", Some(&owner)).await;
    assert_eq!(status, StatusCode::OK, "{}", stats);
    assert_eq!(stats["hotels"], 1);
    assert_eq!(stats["rooms"], 1);
    assert_eq!(stats["bookings"]["total"], 2);
    assert_eq!(stats["bookings"]["cancelled"], 1);
    assert_eq!(stats["bookings"]["booked_revenue"].as_f64(), Some(2260.0));

    let (status, _) = app.get("/api/analytics/hotelier", Some(&guest)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
