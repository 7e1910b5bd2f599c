//! Shared harness: the real router over a migrated in-memory SQLite database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde_json::{json, Value};
use tower::ServiceExt;

use hotel_booking::services::{ServiceContainer, Services};
use hotel_booking::{create_router, AppState, Config, Database};

pub const PASSWORD: &str = "Secure#Pass1";

pub struct TestApp {
    pub router: Router,
    pub services: Services,
    pub db: DatabaseConnection,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let config = Config::new("sqlite::memory:", "integration-test-secret-0123456789abcdef")
            .expect("valid config");
        let database = Database::connect(&config)
            .await
            .expect("in-memory database with migrations");

        let db = database.get_connection();
        let services = Services::from_connection(db.clone(), config.clone());
        let state = AppState::from_config(Arc::new(database), None, config);

        Self {
            router: create_router(state),
            services,
            db,
        }
    }

    /// Insert `count` guest accounts in one statement, bypassing password hashing
    pub async fn seed_guests(&self, count: u32) {
        let sql = format!(
            "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < {count}) \
             INSERT INTO users (id, email, password_hash, name, role, status) \
             SELECT randomblob(16), 'guest' || n || '@bulk.example.com', 'unused', 'Guest ' || n, 'user', 'active' \
             FROM seq"
        );
        self.db
            .execute_unprepared(&sql)
            .await
            .expect("bulk guests");
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    /// Register an account and log in; returns (token, user id)
    pub async fn sign_up(&self, email: &str, role: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({ "email": email, "password": PASSWORD, "name": "Test Person", "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        self.login(email).await
    }

    pub async fn login(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        (
            body["token"]["access_token"].as_str().expect("token").to_string(),
            body["user"]["id"].as_str().expect("user id").to_string(),
        )
    }

    pub async fn admin(&self) -> String {
        self.services
            .auth()
            .create_admin(
                "admin@example.com".to_string(),
                "Admin".to_string(),
                PASSWORD.to_string(),
            )
            .await
            .expect("admin account");
        self.login("admin@example.com").await.0
    }

    /// Hotel approved by an admin, with one room type; returns (hotel id, room id)
    pub async fn listed_room(
        &self,
        hotelier: &str,
        admin: &str,
        price: f64,
        total_rooms: i32,
    ) -> (String, String) {
        let (status, hotel) = self
            .post(
                "/api/hotels",
                Some(hotelier),
                json!({
                    "name": "Hotel Himalaya",
                    "city": "Kathmandu",
                    "address": "Kupondole",
                    "amenities": ["wifi", "parking"]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create hotel failed: {}", hotel);
        let hotel_id = hotel["id"].as_str().expect("hotel id").to_string();

        let (status, _) = self
            .put(
                &format!("/api/admin/hotels/{}/status", hotel_id),
                Some(admin),
                json!({ "status": "active" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, room) = self
            .post(
                &format!("/api/hotels/{}/rooms", hotel_id),
                Some(hotelier),
                json!({
                    "name": "Deluxe Double",
                    "price_per_night": price,
                    "capacity": 2,
                    "total_rooms": total_rooms
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create room failed: {}", room);

        (hotel_id, room["id"].as_str().expect("room id").to_string())
    }

    pub async fn book(
        &self,
        guest: &str,
        room_id: &str,
        check_in: NaiveDate,
        nights: i64,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/bookings",
            Some(guest),
            json!({
                "room_id": room_id,
                "check_in": check_in,
                "check_out": check_in + Duration::days(nights),
                "guests": 2
            }),
        )
        .await
    }
}

/// A date `days` from today
pub fn days_ahead(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}
