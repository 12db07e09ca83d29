//! Route definitions
//!
//! All API routes organized by audience and mounted under /api.

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::handlers::{admin, auth, donations, health, schools, volunteers};
use crate::state::AppState;

/// Create the API router (excluding health, which skips rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}

/// Health check routes, mounted under /api by the server
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(school_routes())
        .merge(volunteer_routes())
        .merge(donation_routes())
        .nest("/admin", admin_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
}

fn school_routes() -> Router<AppState> {
    Router::new()
        .route("/schools/events/request", post(schools::request_event))
        .route("/schools/events", get(schools::my_events))
}

fn volunteer_routes() -> Router<AppState> {
    Router::new()
        .route("/volunteers/events", get(volunteers::available_events))
        .route("/volunteers/events/:eventId/register", post(volunteers::register))
        .route("/volunteers/participations", get(volunteers::my_participations))
}

fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/donations", post(donations::create_donation))
        .route("/donations/me", get(donations::my_donations))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        // Users
        .route("/users", get(admin::list_users))
        .route("/users/:userId/status", patch(admin::update_user_status))
        // Events
        .route("/events", get(admin::list_events).post(admin::create_event))
        .route("/events/:eventId/status", patch(admin::update_event_status))
        .route("/events/:eventId/volunteers", patch(admin::assign_volunteers))
        // Donations
        .route("/donations", get(admin::list_donations))
        .route("/donations/:donationId/verify", patch(admin::verify_donation))
        .route("/donors/:donorId/donations", get(admin::donor_donations))
        // Volunteers
        .route("/volunteers", get(admin::list_volunteers))
        .route(
            "/volunteers/:volunteerId/participation",
            get(admin::volunteer_participation),
        )
}
