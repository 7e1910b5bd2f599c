//! Listings, search and moderation through the HTTP API.

mod common;

use std::collections::BTreeSet;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{days_ahead, TestApp};

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_hotel_round_trip_keeps_amenities_and_image_order() {
    let app = TestApp::spawn().await;
    let (hotelier, owner_id) = app.sign_up("owner@example.com", "hotelier").await;

    let (status, created) = app
        .post(
            "/api/hotels",
            Some(&hotelier),
            json!({
                "name": "Lakeside Inn",
                "city": "Pokhara",
                "address": "Lakeside Road 6",
                "description": "Quiet rooms facing Phewa lake",
                "amenities": ["Pool", "wifi", "WiFi"],
                "images": ["/img/front.jpg", "/img/lobby.jpg", "/img/room.jpg"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["owner_id"], owner_id.as_str());

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = app.get(&format!("/api/hotels/{}", id), Some(&hotelier)).await;
    assert_eq!(status, StatusCode::OK);

    let amenities: BTreeSet<String> = strings(&fetched["amenities"]).into_iter().collect();
    assert_eq!(
        amenities,
        ["pool", "wifi"].iter().map(|s| s.to_string()).collect()
    );
    assert_eq!(
        strings(&fetched["images"]),
        vec!["/img/front.jpg", "/img/lobby.jpg", "/img/room.jpg"]
    );
}

#[tokio::test]
async fn test_pending_hotel_hidden_from_public() {
    let app = TestApp::spawn().await;
    let (hotelier, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;

    let (_, created) = app
        .post(
            "/api/hotels",
            Some(&hotelier),
            json!({ "name": "Hidden", "city": "Bhaktapur", "address": "Durbar Square" }),
        )
        .await;
    let uri = format!("/api/hotels/{}", created["id"].as_str().unwrap());

    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&uri, Some(&guest)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = app.get("/api/hotels", None).await;
    assert_eq!(page["meta"]["total"], 0);

    let (_, mine) = app.get("/api/hotels/mine", Some(&hotelier)).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));

    let (status, room) = app
        .post(
            &format!("{}/rooms", uri),
            Some(&hotelier),
            json!({ "name": "Deluxe", "price_per_night": 800.0, "capacity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", room);
    let room_uri = format!("/api/rooms/{}", room["id"].as_str().unwrap());

    let (status, _) = app.get(&format!("{}/rooms", uri), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&room_uri, Some(&guest)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, rooms) = app.get(&format!("{}/rooms", uri), Some(&hotelier)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms.as_array().map(Vec::len), Some(1));
    let (status, _) = app.get(&room_uri, Some(&hotelier)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_search_filters_by_location_price_and_amenity() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (hotelier, _) = app.sign_up("owner@example.com", "hotelier").await;
    app.listed_room(&hotelier, &admin, 1500.0, 1).await;

    let (status, page) = app
        .get("/api/hotels?location=kathmandu&amenities=wifi", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["total"], 1);

    let (_, page) = app.get("/api/hotels?max_price=1000", None).await;
    assert_eq!(page["meta"]["total"], 0);

    let (_, page) = app.get("/api/hotels?amenities=wifi,pool", None).await;
    assert_eq!(page["meta"]["total"], 0);

    let (_, page) = app.get("/api/hotels?location=pokhara", None).await;
    assert_eq!(page["meta"]["total"], 0);

    // Wildcard characters in the location are matched literally
    let (_, page) = app.get("/api/hotels?location=%25", None).await;
    assert_eq!(page["meta"]["total"], 0);
    let (_, page) = app.get("/api/hotels?location=_athmandu", None).await;
    assert_eq!(page["meta"]["total"], 0);

    let (status, body) = app.get("/api/hotels?min_price=500&max_price=100", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_approval_notifies_owner() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (hotelier, _) = app.sign_up("owner@example.com", "hotelier").await;
    app.listed_room(&hotelier, &admin, 900.0, 1).await;

    let (status, inbox) = app.get("/api/notifications", Some(&hotelier)).await;
    assert_eq!(status, StatusCode::OK);
    let inbox = inbox.as_array().cloned().unwrap_or_default();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["kind"], "approval");
    assert_eq!(inbox[0]["is_read"], false);
}

#[tokio::test]
async fn test_only_owner_edits_hotel_and_rooms() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (rival, _) = app.sign_up("rival@example.com", "hotelier").await;
    let (hotel_id, room_id) = app.listed_room(&owner, &admin, 900.0, 1).await;

    let (status, body) = app
        .put(
            &format!("/api/hotels/{}", hotel_id),
            Some(&rival),
            json!({ "name": "Stolen" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NOT_OWNER");

    let (status, _) = app
        .put(
            &format!("/api/rooms/{}", room_id),
            Some(&rival),
            json!({ "price_per_night": 1.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, room) = app
        .put(
            &format!("/api/rooms/{}", room_id),
            Some(&owner),
            json!({ "price_per_night": 1200.0, "total_rooms": 4 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room["price_per_night"].as_f64(), Some(1200.0));
    assert_eq!(room["total_rooms"], 4);
}

#[tokio::test]
async fn test_booked_room_and_hotel_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (guest, _) = app.sign_up("guest@example.com", "user").await;
    let (hotel_id, room_id) = app.listed_room(&owner, &admin, 900.0, 1).await;
    app.book(&guest, &room_id, days_ahead(3), 1).await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/rooms/{}", room_id), Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/hotels/{}", hotel_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_unbooked_hotel_deleted_by_owner() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    let (hotel_id, _) = app.listed_room(&owner, &admin, 900.0, 1).await;

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/hotels/{}", hotel_id), Some(&owner), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/api/hotels/{}", hotel_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_lists_hotels_in_any_status() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    app.listed_room(&owner, &admin, 900.0, 1).await;
    app.post(
        "/api/hotels",
        Some(&owner),
        json!({ "name": "Second", "city": "Lalitpur", "address": "Patan" }),
    )
    .await;

    let (status, page) = app.get("/api/admin/hotels?status=pending", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["meta"]["total"], 1);

    let (_, page) = app.get("/api/admin/hotels", Some(&admin)).await;
    assert_eq!(page["meta"]["total"], 2);

    let (status, _) = app.get("/api/admin/hotels", Some(&owner)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::spawn().await;
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com", "hotelier").await;
    app.listed_room(&owner, &admin, 900.0, 1).await;

    for uri in [
        "/api/hotels?page=18446744073709551615&per_page=100",
        "/api/admin/hotels?page=18446744073709551615&per_page=100",
        "/api/admin/bookings?page=18446744073709551615&per_page=100",
        "/api/admin/users?page=18446744073709551615&per_page=100",
    ] {
        let token = uri.starts_with("/api/admin").then_some(admin.as_str());
        let (status, page) = app.get(uri, token).await;
        assert_eq!(status, StatusCode::OK, "{}: {}", uri, page);
        assert_eq!(page["data"].as_array().map(Vec::len), Some(0), "{}", uri);
    }
}

#[tokio::test]
async fn test_health_reports_redis_disabled() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["redis"]["status"], "disabled");
}
