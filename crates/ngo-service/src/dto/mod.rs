//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AssignVolunteersRequest, CreateDonationRequest, EventRequest, LoginRequest, LogoutRequest,
    RefreshTokenRequest, RegisterRequest, UpdateEventStatusRequest, UpdateUserStatusRequest,
    VerifyDonationRequest,
};

pub use responses::{
    AuthResponse, CurrentUserResponse, DashboardMetrics, DashboardResponse, DonationEnvelope,
    DonationListResponse, DonationMetrics, DonationResponse, DonorDonationsResponse,
    EventEnvelope, EventListResponse, EventMetrics, EventRef, EventResponse, HealthChecks,
    HealthResponse, MessageResponse, MonetaryMetrics, ParticipationEnvelope,
    ParticipationListResponse, ParticipationResponse, ParticipationRollup, PhysicalMetrics,
    ReadinessResponse, RecentActivity, RecentDonation, RecentEvent, UserContact, UserListResponse, UserMetrics, UserRef, UserResponse,
    UserStatusResponse, VolunteerEventListResponse, VolunteerEventResponse,
    VolunteerListResponse, VolunteerMetrics, VolunteerParticipationResponse,
    VolunteerWithParticipation,
};

pub use mappers::Directory;
