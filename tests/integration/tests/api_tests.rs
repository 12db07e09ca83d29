//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET, API_PORT
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use ngo_core::entities::Role;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Walk volunteer discovery until the event turns up
async fn find_in_discovery(server: &TestServer, token: &str, event_id: &str) -> Option<Value> {
    let mut page = 1;
    loop {
        let response = server
            .get_auth(&format!("/api/volunteers/events?page={page}&limit=100"), token)
            .await
            .unwrap();
        let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

        if let Some(found) = body["events"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["id"] == event_id)
        {
            return Some(found.clone());
        }
        if i64::from(page) >= body["pagination"]["pages"].as_i64().unwrap() {
            return None;
        }
        page += 1;
    }
}

async fn school_requests_event(server: &TestServer, school: &AuthResponse, days: i64) -> String {
    let response = server
        .post_auth(
            "/api/schools/events/request",
            &school.token,
            &EventRequest::in_days(days),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(body["event"]["status"], "pending");
    body["event"]["id"].as_str().unwrap().to_string()
}

async fn set_event_status(server: &TestServer, admin: &AuthResponse, event_id: &str, status: &str) -> Value {
    let response = server
        .patch_auth(
            &format!("/api/admin/events/{event_id}/status"),
            &admin.token,
            &json!({ "status": status }),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_me() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.register(Role::Volunteer).await.unwrap();
    assert_eq!(auth.user.role, Role::Volunteer);
    assert!(auth.user.is_active);
    assert!(!auth.refresh_token.is_empty());

    let response = server.get_auth("/api/auth/me", &auth.token).await.unwrap();
    let me: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me["user"]["id"], auth.user.id.as_str());
    assert!(me["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique(Role::Donor);

    let response = server.post("/api/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.post("/api/auth/register", &request).await.unwrap();
    let body: Value = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body["message"], "User already exists with this email");
}

#[tokio::test]
async fn test_register_validation_errors() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .post(
            "/api/auth/register",
            &json!({ "name": "", "email": "not-an-email", "password": "123", "role": "admin" }),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    for field in ["name", "email", "password", "role"] {
        assert!(fields.contains(&field), "missing error for {field}: {body}");
    }
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let login = LoginRequest {
        email: unique_email("nobody"),
        password: "wrongpass".to_string(),
    };

    let response = server.post("/api/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_refresh_rotates_and_logout_revokes() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = server.register(Role::Donor).await.unwrap();

    let response = server
        .post("/api/auth/refresh", &json!({ "refreshToken": &auth.refresh_token }))
        .await
        .unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(rotated.refresh_token, auth.refresh_token);

    // The old refresh token was consumed
    let response = server
        .post("/api/auth/refresh", &json!({ "refreshToken": &auth.refresh_token }))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post_auth(
            "/api/auth/logout",
            &rotated.token,
            &json!({ "refreshToken": &rotated.refresh_token }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post("/api/auth/refresh", &json!({ "refreshToken": &rotated.refresh_token }))
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Authorization Tests
// ============================================================================

#[tokio::test]
async fn test_role_gates() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let donor = server.register(Role::Donor).await.unwrap();
    let admin = server.admin_session().await.unwrap();

    let response = server.get("/api/admin/dashboard").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/api/admin/dashboard", &donor.token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body["message"], "Access denied. Insufficient permissions.");

    // Admin is not implicitly allowed on donor routes
    let response = server.get_auth("/api/donations/me", &admin.token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    // Role is checked before the body is validated
    let response = server
        .post_auth("/api/schools/events/request", &donor.token, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_deactivated_user_is_locked_out() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_session().await.unwrap();
    let register = RegisterRequest::unique(Role::Volunteer);
    let response = server.post("/api/auth/register", &register).await.unwrap();
    let volunteer: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = server
        .patch_auth(
            &format!("/api/admin/users/{}/status", volunteer.user.id),
            &admin.token,
            &json!({ "isActive": false }),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["user"]["isActive"], false);

    let response = server.get_auth("/api/auth/me", &volunteer.token).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let login = LoginRequest {
        email: register.email.clone(),
        password: register.password.clone(),
    };
    let response = server.post("/api/auth/login", &login).await.unwrap();
    let body: Value = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body["message"], "Account is deactivated");

    // Admins cannot deactivate themselves
    let response = server
        .patch_auth(
            &format!("/api/admin/users/{}/status", admin.user.id),
            &admin.token,
            &json!({ "isActive": false }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Event and Participation Tests
// ============================================================================

#[tokio::test]
async fn test_request_approve_register_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let school = server.register(Role::School).await.unwrap();
    let volunteer = server.register(Role::Volunteer).await.unwrap();
    let admin = server.admin_session().await.unwrap();

    let event_id = school_requests_event(&server, &school, 7).await;

    // Pending events are not open for registration
    let register_path = format!("/api/volunteers/events/{event_id}/register");
    let response = server.post_auth(&register_path, &volunteer.token, &json!({})).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let approved = set_event_status(&server, &admin, &event_id, "approved").await;
    assert_eq!(approved["event"]["status"], "approved");
    assert_eq!(approved["event"]["approvedBy"]["id"], admin.user.id.as_str());

    let seen = find_in_discovery(&server, &volunteer.token, &event_id)
        .await
        .expect("approved event missing from discovery");
    assert_eq!(seen["isRegistered"], false);
    assert!(seen["registrationStatus"].is_null());

    let response = server.post_auth(&register_path, &volunteer.token, &json!({})).await.unwrap();
    let body: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(body["participation"]["status"], "registered");

    let seen = find_in_discovery(&server, &volunteer.token, &event_id).await.unwrap();
    assert_eq!(seen["isRegistered"], true);
    assert_eq!(seen["registrationStatus"], "registered");

    let response = server.post_auth(&register_path, &volunteer.token, &json!({})).await.unwrap();
    let body: Value = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body["message"], "You are already registered for this event");

    let response = server
        .get_auth("/api/volunteers/participations", &volunteer.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["participations"].as_array().unwrap().len(), 1);
    assert_eq!(body["summary"]["total"], 1);

    // The school sees its request with a status summary
    let response = server
        .get_auth("/api/schools/events?status=approved", &school.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["events"][0]["id"], event_id.as_str());
    assert_eq!(body["summary"]["approved"], 1);
}

#[tokio::test]
async fn test_past_approved_event_hidden_but_registrable() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let volunteer = server.register(Role::Volunteer).await.unwrap();
    let admin = server.admin_session().await.unwrap();

    let response = server
        .post_auth("/api/admin/events", &admin.token, &EventRequest::in_days(-2))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(body["event"]["status"], "approved");
    let event_id = body["event"]["id"].as_str().unwrap().to_string();

    assert!(find_in_discovery(&server, &volunteer.token, &event_id).await.is_none());

    let response = server
        .post_auth(
            &format!("/api/volunteers/events/{event_id}/register"),
            &volunteer.token,
            &json!({}),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
}

#[tokio::test]
async fn test_assign_volunteers_replaces_set() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_session().await.unwrap();
    let v1 = server.register(Role::Volunteer).await.unwrap();
    let v2 = server.register(Role::Volunteer).await.unwrap();
    let donor = server.register(Role::Donor).await.unwrap();

    let response = server
        .post_auth("/api/admin/events", &admin.token, &EventRequest::in_days(10))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!("/api/admin/events/{}/volunteers", body["event"]["id"].as_str().unwrap());

    let response = server
        .patch_auth(&path, &admin.token, &json!({ "volunteerIds": [&v1.user.id, &v2.user.id] }))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["event"]["assignedVolunteers"].as_array().unwrap().len(), 2);

    let response = server
        .patch_auth(&path, &admin.token, &json!({ "volunteerIds": [&v2.user.id] }))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let assigned = body["event"]["assignedVolunteers"].as_array().unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0]["id"], v2.user.id.as_str());

    // Only active volunteers can be assigned
    let response = server
        .patch_auth(&path, &admin.token, &json!({ "volunteerIds": [&donor.user.id] }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_admin_event_list_pagination() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_session().await.unwrap();

    let response = server
        .get_auth("/api/admin/events?page=1&limit=2", &admin.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    let pagination: Pagination = serde_json::from_value(body["pagination"].clone()).unwrap();
    assert_eq!(pagination.page, 1);
    assert_eq!(pagination.limit, 2);
    assert_eq!(pagination.pages, (pagination.total + 1) / 2);

    let response = server
        .get_auth("/api/admin/events?limit=500", &admin.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(
        body,
        json!({ "errors": [{ "field": "limit", "message": "Limit must be between 1 and 100" }] })
    );

    let response = server
        .get_auth("/api/admin/events?status=archived", &admin.token)
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["errors"][0]["field"], "status");
    assert_eq!(body["errors"][0]["message"], "Invalid value");

    // Role is checked before the query string
    let donor = server.register(Role::Donor).await.unwrap();
    let response = server
        .get_auth("/api/admin/events?limit=500", &donor.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Donation Tests
// ============================================================================

#[tokio::test]
async fn test_donation_lifecycle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let donor = server.register(Role::Donor).await.unwrap();
    let admin = server.admin_session().await.unwrap();

    let response = server
        .post_auth("/api/donations", &donor.token, &json!({ "type": "monetary", "amount": 0 }))
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body["errors"][0]["field"], "amount");

    let response = server
        .post_auth(
            "/api/donations",
            &donor.token,
            &json!({ "type": "monetary", "amount": 1500.5, "purpose": "Pads drive" }),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(body["donation"]["status"], "pending");
    assert_eq!(body["donation"]["currency"], "NPR");
    let donation_id = body["donation"]["id"].as_str().unwrap().to_string();

    let response = server
        .post_auth(
            "/api/donations",
            &donor.token,
            &json!({ "type": "physical", "category": "Sanitary pads", "quantity": 200 }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    let response = server.get_auth("/api/donations/me", &donor.token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["donations"].as_array().unwrap().len(), 2);
    assert_eq!(body["summary"]["totalMonetary"], 1500.5);
    assert_eq!(body["summary"]["totalItems"], 200);

    let response = server
        .patch_auth(
            &format!("/api/admin/donations/{donation_id}/verify"),
            &admin.token,
            &json!({ "status": "verified" }),
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["donation"]["status"], "verified");
    assert_eq!(body["donation"]["verifiedBy"]["id"], admin.user.id.as_str());

    let response = server
        .get_auth(
            &format!("/api/admin/donations?donor={}&status=verified", donor.user.id),
            &admin.token,
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["pagination"]["total"], 1);

    let response = server
        .get_auth(
            &format!("/api/admin/donors/{}/donations", donor.user.id),
            &admin.token,
        )
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["donor"]["id"], donor.user.id.as_str());
}

// ============================================================================
// Dashboard Tests
// ============================================================================

#[tokio::test]
async fn test_dashboard_shape() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let admin = server.admin_session().await.unwrap();

    let response = server.get_auth("/api/admin/dashboard", &admin.token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(body["metrics"]["users"]["total"].as_i64().unwrap() >= 1);
    assert!(body["metrics"]["users"]["byRole"]["admin"].as_i64().unwrap() >= 1);
    assert!(body["metrics"]["donations"]["monetary"]["total"].is_number());
    assert!(body["recent"]["events"].as_array().unwrap().len() <= 5);
    assert!(body["recent"]["donations"].as_array().unwrap().len() <= 5);
}
