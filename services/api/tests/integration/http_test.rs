use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderValue, StatusCode};
use serde_json::{Value, json};

use autovault_domain::role::Role;

use crate::helpers::{
    MockAlertRepo, MockPlaces, MockSms, MockUserRepo, MockVehicleRepo, nearby, test_alert,
    test_dealer, test_server, test_state, test_user, test_vehicle, token,
};

fn empty_state() -> autovault_api::state::AppState<crate::helpers::MockBackend> {
    test_state(
        MockUserRepo::new(vec![
            test_user("admin", Role::Admin, None),
            test_user("alice", Role::User, None),
        ]),
        MockAlertRepo::default(),
        MockVehicleRepo::default(),
        MockSms::default(),
    )
}

// ── Public routes ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_health() {
    let server = test_server(empty_state());
    let resp = server.get("/api/health").await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn should_return_json_404_for_unknown_route() {
    let server = test_server(empty_state());
    let resp = server.get("/api/nope").await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(resp.json::<Value>()["kind"], "ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn should_set_request_id_header() {
    let server = test_server(empty_state());
    let resp = server.get("/api/health").await;
    assert!(resp.headers().get("x-request-id").is_some());
}

// ── Access control ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_401_without_or_with_malformed_credential() {
    let server = test_server(empty_state());

    let missing = server.get("/api/alerts").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(missing.json::<Value>()["error"], "no token provided");

    let malformed = server
        .get("/api/cars/random")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Token abc"))
        .await;
    assert_eq!(malformed.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_return_403_for_invalid_credential() {
    let server = test_server(empty_state());
    let resp = server
        .post("/api/auth/verify-token")
        .authorization_bearer("not-a-jwt")
        .await;
    assert_eq!(resp.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(resp.json::<Value>()["kind"], "INVALID_CREDENTIAL");
}

#[tokio::test]
async fn should_return_403_for_user_role_on_elevated_routes() {
    let server = test_server(empty_state());
    let user = token("alice");

    let gets = ["/api/cars", "/api/alerts/all", "/api/users"];
    for path in gets {
        let resp = server.get(path).authorization_bearer(&user).await;
        assert_eq!(resp.status_code(), StatusCode::FORBIDDEN, "GET {path}");
        assert_eq!(resp.json::<Value>()["kind"], "ELEVATED_ROLE_REQUIRED");
    }

    let post_car = server
        .post("/api/cars")
        .authorization_bearer(&user)
        .json(&json!({ "vin": "V1" }))
        .await;
    assert_eq!(post_car.status_code(), StatusCode::FORBIDDEN);

    let post_alert = server
        .post("/api/alerts")
        .authorization_bearer(&user)
        .json(&json!({ "userId": "alice", "message": "hi" }))
        .await;
    assert_eq!(post_alert.status_code(), StatusCode::FORBIDDEN);

    let id = uuid::Uuid::now_v7();
    let put_car = server
        .put(&format!("/api/cars/{id}"))
        .authorization_bearer(&user)
        .json(&json!({}))
        .await;
    assert_eq!(put_car.status_code(), StatusCode::FORBIDDEN);

    let delete_car = server
        .delete(&format!("/api/cars/{id}"))
        .authorization_bearer(&user)
        .await;
    assert_eq!(delete_car.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_resolve_identity_on_verify_token() {
    let server = test_server(empty_state());
    let resp = server
        .post("/api/auth/verify-token")
        .authorization_bearer(token("admin"))
        .await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    assert_eq!(
        resp.json::<Value>(),
        json!({ "user": { "uid": "admin", "email": "admin@example.com", "role": "admin" } })
    );
}

#[tokio::test]
async fn should_return_profile_with_id_and_uid() {
    let server = test_server(empty_state());
    let resp = server
        .get("/api/auth/profile")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let user = &resp.json::<Value>()["user"];
    assert_eq!(user["id"], "alice");
    assert_eq!(user["uid"], "alice");
    assert_eq!(user["role"], "user");
}

// ── Alert flow ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_send_alert_and_list_it() {
    let state = test_state(
        MockUserRepo::new(vec![test_user("bob", Role::Admin, None)]),
        MockAlertRepo::default(),
        MockVehicleRepo::default(),
        MockSms::default(),
    );
    let mut listener = state.realtime.connect();
    let server = test_server(state);

    let registered = server
        .post("/api/auth/register")
        .json(&json!({ "idToken": token("alice"), "role": "user" }))
        .await;
    assert_eq!(registered.status_code(), StatusCode::OK);
    let body = registered.json::<Value>();
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["uid"], "alice");
    assert_eq!(body["user"]["phone"], Value::Null);

    let sent = server
        .post("/api/alerts")
        .authorization_bearer(token("bob"))
        .json(&json!({ "userId": "alice", "message": "hello" }))
        .await;
    assert_eq!(sent.status_code(), StatusCode::CREATED);
    let sent = sent.json::<Value>();
    assert_eq!(sent["smsSent"], false);
    assert_eq!(sent["smsError"], Value::Null);
    assert_eq!(sent["userEmail"], "alice@example.com");

    let frame = listener.receiver.try_recv().unwrap();
    let event: Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(event["event"], "newAlert");
    assert_eq!(event["data"]["id"], sent["id"]);

    let mine = server
        .get("/api/alerts")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(mine.status_code(), StatusCode::OK);
    let mine = mine.json::<Value>();
    let list = mine.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["message"], "hello");
    assert_eq!(list[0]["read"], false);
}

#[tokio::test]
async fn should_return_201_when_sms_gateway_fails() {
    let alerts = MockAlertRepo::default();
    let state = test_state(
        MockUserRepo::new(vec![
            test_user("admin", Role::Admin, None),
            test_user("carl", Role::User, Some("4045550100")),
        ]),
        alerts.clone(),
        MockVehicleRepo::default(),
        MockSms::failing(autovault_api::domain::types::SmsError::Transport(
            "connection refused".into(),
        )),
    );
    let server = test_server(state);

    let resp = server
        .post("/api/alerts")
        .authorization_bearer(token("admin"))
        .json(&json!({ "userId": "carl", "message": "hello" }))
        .await;

    assert_eq!(resp.status_code(), StatusCode::CREATED);
    let body = resp.json::<Value>();
    assert_eq!(body["smsSent"], false);
    assert!(body["smsError"].as_str().unwrap().contains("connection refused"));
    assert_eq!(alerts.snapshot().len(), 1);
}

#[tokio::test]
async fn should_reject_alert_with_missing_fields() {
    let server = test_server(empty_state());
    let resp = server
        .post("/api/alerts")
        .authorization_bearer(token("admin"))
        .json(&json!({ "userId": "alice" }))
        .await;
    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["error"], "userId and message are required");
}

#[tokio::test]
async fn should_mark_alert_read_and_guard_ownership() {
    let alert = test_alert("alice", "hello", 0);
    let id = alert.id;
    let state = test_state(
        MockUserRepo::new(vec![
            test_user("alice", Role::User, None),
            test_user("eve", Role::User, None),
        ]),
        MockAlertRepo::new(vec![alert]),
        MockVehicleRepo::default(),
        MockSms::default(),
    );
    let server = test_server(state);
    let path = format!("/api/alerts/{id}/read");

    let denied = server.put(&path).authorization_bearer(token("eve")).await;
    assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);

    for _ in 0..2 {
        let ok = server.put(&path).authorization_bearer(token("alice")).await;
        assert_eq!(ok.status_code(), StatusCode::OK);
        assert_eq!(ok.json::<Value>()["message"], "Alert marked as read");
    }

    let missing = server
        .put("/api/alerts/not-an-id/read")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_list_all_alerts_with_pagination() {
    let state = test_state(
        MockUserRepo::new(vec![
            test_user("admin", Role::Admin, None),
            test_user("alice", Role::User, None),
        ]),
        MockAlertRepo::new(vec![
            test_alert("alice", "one", 20),
            test_alert("ghost", "two", 10),
        ]),
        MockVehicleRepo::default(),
        MockSms::default(),
    );
    let server = test_server(state);

    let resp = server
        .get("/api/alerts/all?page=1&limit=oops")
        .authorization_bearer(token("admin"))
        .await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(
        body["pagination"],
        json!({ "page": 1, "limit": 20, "total": 2, "pages": 1 })
    );
    assert_eq!(body["alerts"][0]["message"], "two");
    assert_eq!(body["alerts"][0]["user"], Value::Null);
    assert_eq!(body["alerts"][1]["user"]["email"], "alice@example.com");
}

// ── Cars ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_inventory_routes() {
    let vehicles = MockVehicleRepo::new(
        (0..5)
            .map(|i| {
                test_vehicle(
                    &format!("VIN{i}"),
                    "Toyota",
                    Some(test_dealer("Lakeside", "Atlanta", "GA")),
                    i,
                )
            })
            .collect(),
    );
    let state = test_state(
        MockUserRepo::new(vec![
            test_user("admin", Role::Admin, None),
            test_user("alice", Role::User, None),
        ]),
        MockAlertRepo::default(),
        vehicles,
        MockSms::default(),
    );
    let server = test_server(state);

    let random = server
        .get("/api/cars/random?count=2")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(random.status_code(), StatusCode::OK);
    assert_eq!(random.json::<Value>().as_array().unwrap().len(), 2);

    let huge = server
        .get("/api/cars/random?count=9223372036854775808")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(huge.status_code(), StatusCode::OK);
    assert_eq!(huge.json::<Value>().as_array().unwrap().len(), 5);

    let default_count = server
        .get("/api/cars/random?count=abc")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(default_count.json::<Value>().as_array().unwrap().len(), 3);

    let by_vin = server
        .get("/api/cars/vin/VIN3")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(by_vin.status_code(), StatusCode::OK);
    assert_eq!(by_vin.json::<Value>()["vin"], "VIN3");

    let dealers = server
        .get("/api/cars/VIN3/dealerships")
        .authorization_bearer(token("alice"))
        .await;
    let dealers = dealers.json::<Value>();
    assert_eq!(dealers.as_array().unwrap().len(), 1);
    assert_eq!(dealers[0]["isPrimary"], true);
    assert_eq!(dealers[0]["name"], "Lakeside");

    let page = server
        .get("/api/cars?page=2&limit=2")
        .authorization_bearer(token("admin"))
        .await;
    let page = page.json::<Value>();
    assert_eq!(page["pagination"]["pages"], 3);
    assert_eq!(page["pagination"]["total"], 5);
    assert!(page["cars"].as_array().unwrap().len() <= 2);
}

#[tokio::test]
async fn should_serve_nearby_dealerships_with_default_radius() {
    let places = MockPlaces::new(vec![nearby("Northside Honda")]);
    let mut state = test_state(
        MockUserRepo::new(vec![test_user("alice", Role::User, None)]),
        MockAlertRepo::default(),
        MockVehicleRepo::new(vec![
            test_vehicle("VIN1", "Toyota", Some(test_dealer("Lakeside", "Atlanta", "GA")), 0),
            test_vehicle("VIN2", "Toyota", None, 0),
        ]),
        MockSms::default(),
    );
    state.places = places.clone();
    let server = test_server(state);

    let resp = server
        .get("/api/cars/VIN1/nearby-dealerships?radius=abc")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let body = resp.json::<Value>();
    assert_eq!(body[0]["name"], "Northside Honda");
    assert_eq!(body[0]["placeId"], "place-Northside Honda");
    assert_eq!(places.searches.lock().unwrap()[0].2, 10_000);

    let missing = server
        .get("/api/cars/VIN2/nearby-dealerships")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(missing.json::<Value>()["error"], "car location not available");
}

#[tokio::test]
async fn should_manage_inventory_as_admin() {
    let server = test_server(empty_state());
    let admin = token("admin");

    let created = server
        .post("/api/cars")
        .authorization_bearer(&admin)
        .json(&json!({
            "vin": "1HGCM82633A004352",
            "make": "Honda",
            "price": 18000,
            "createdAt": "1999-01-01T00:00:00.000Z"
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let created = created.json::<Value>();
    assert_ne!(created["createdAt"], "1999-01-01T00:00:00.000Z");
    let id = created["id"].as_str().unwrap().to_owned();

    let updated = server
        .put(&format!("/api/cars/{id}"))
        .authorization_bearer(&admin)
        .json(&json!({ "price": 17500 }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    let updated = updated.json::<Value>();
    assert_eq!(updated["price"], 17500.0);
    assert_eq!(updated["make"], "Honda");

    let deleted = server
        .delete(&format!("/api/cars/{id}"))
        .authorization_bearer(&admin)
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);
    assert_eq!(deleted.json::<Value>()["message"], "Car deleted successfully");

    let again = server
        .delete(&format!("/api/cars/{id}"))
        .authorization_bearer(&admin)
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_reject_malformed_json_body() {
    let server = test_server(empty_state());
    let resp = server
        .post("/api/cars")
        .authorization_bearer(token("admin"))
        .text("{not json")
        .content_type("application/json")
        .await;
    assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.json::<Value>()["kind"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn should_return_404_when_no_cars_exist() {
    let server = test_server(empty_state());
    let resp = server
        .get("/api/cars/random")
        .authorization_bearer(token("alice"))
        .await;
    assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(resp.json::<Value>()["error"], "no cars found in database");
}

#[tokio::test]
async fn should_list_users_for_admin() {
    let server = test_server(empty_state());
    let resp = server
        .get("/api/users")
        .authorization_bearer(token("admin"))
        .await;
    assert_eq!(resp.status_code(), StatusCode::OK);
    let users = resp.json::<Value>();
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert!(users[0].get("uid").is_some());
}
