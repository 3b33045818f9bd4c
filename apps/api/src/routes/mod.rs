pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::catalog::{careers, companies, offers};
use crate::graduates::handlers as graduates;
use crate::notifications::handlers as notifications;
use crate::portal::handlers as portal;
use crate::state::AppState;
use crate::{stats, users};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route("/api/v1/auth/password", post(auth::handle_change_password))
        // Public company intake
        .route("/api/v1/companies/register", post(companies::handle_register))
        // School services
        .route(
            "/api/v1/admin/graduates",
            get(graduates::handle_list).post(graduates::handle_create),
        )
        .route("/api/v1/admin/graduates/search", get(graduates::handle_search))
        .route(
            "/api/v1/admin/graduates/:enrollment_id",
            get(graduates::handle_detail)
                .patch(graduates::handle_update)
                .delete(graduates::handle_delete),
        )
        .route(
            "/api/v1/admin/careers",
            get(careers::handle_list).post(careers::handle_create),
        )
        .route("/api/v1/admin/companies", get(companies::handle_list))
        .route(
            "/api/v1/admin/offers",
            get(offers::handle_admin_list).post(offers::handle_create),
        )
        .route(
            "/api/v1/admin/notifications",
            post(notifications::handle_broadcast),
        )
        .route("/api/v1/admin/users", get(users::handle_list))
        .route(
            "/api/v1/admin/users/:enrollment_id/toggle-active",
            post(users::handle_toggle_active),
        )
        .route("/api/v1/admin/stats", get(stats::handle_stats))
        // Graduate portal
        .route("/api/v1/me/dashboard", get(portal::handle_dashboard))
        .route(
            "/api/v1/me/profile",
            get(portal::handle_profile).patch(portal::handle_update_profile),
        )
        .route(
            "/api/v1/me/academic",
            get(portal::handle_academic).post(portal::handle_record_academic),
        )
        .route(
            "/api/v1/me/employment",
            get(portal::handle_employment).post(portal::handle_record_employment),
        )
        .route("/api/v1/me/notifications", get(notifications::handle_mailbox))
        .route(
            "/api/v1/me/notifications/read-all",
            post(notifications::handle_mark_all_read),
        )
        .route(
            "/api/v1/me/notifications/:id/read",
            post(notifications::handle_mark_read),
        )
        .route("/api/v1/me/offers", get(offers::handle_job_board))
        .route("/api/v1/me/offers/sectors", get(offers::handle_sectors))
        .with_state(state)
}
