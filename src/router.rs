use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>, upload_dir: &str) -> Router {
    Router::new()
        .route("/api/v1/health", get(handlers::healthcheck))
        // Auth routes
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login))
        .route("/api/v1/auth/refresh", post(handlers::auth::refresh))
        .route("/api/v1/auth/me", get(handlers::auth::me))
        // Kost routes
        .route("/api/v1/kost", get(handlers::kost::list_kosts))
        .route("/api/v1/kost", post(handlers::kost::create_kost))
        .route("/api/v1/kost/mine", get(handlers::kost::my_kosts))
        .route("/api/v1/kost/:id", get(handlers::kost::get_kost))
        .route("/api/v1/kost/:id", put(handlers::kost::update_kost))
        .route("/api/v1/kost/:id", delete(handlers::kost::delete_kost))
        .route("/api/v1/kost/:id/approve", patch(handlers::kost::approve_kost))
        .route("/api/v1/kost/:id/qris", post(handlers::kost::upload_qris))
        // Master data routes
        .route("/api/v1/master/facilities", get(handlers::master::list_facilities))
        .route("/api/v1/master/facilities", post(handlers::master::create_facility))
        .route("/api/v1/master/facilities/:id", put(handlers::master::update_facility))
        .route("/api/v1/master/facilities/:id", delete(handlers::master::delete_facility))
        .route("/api/v1/master/rules", get(handlers::master::list_rules))
        .route("/api/v1/master/rules", post(handlers::master::create_rule))
        .route("/api/v1/master/rules/:id", put(handlers::master::update_rule))
        .route("/api/v1/master/rules/:id", delete(handlers::master::delete_rule))
        .route("/api/v1/master/laundry-units", get(handlers::master::list_laundry_units))
        .route("/api/v1/master/laundry-units", post(handlers::master::create_laundry_unit))
        .route("/api/v1/master/laundry-units/:id", put(handlers::master::update_laundry_unit))
        .route("/api/v1/master/laundry-units/:id", delete(handlers::master::delete_laundry_unit))
        // Reservation routes
        .route("/api/v1/reservations", post(handlers::reservations::create_reservation))
        .route("/api/v1/reservations/me", get(handlers::reservations::my_reservations))
        .route("/api/v1/reservations/kost/:kost_id", get(handlers::reservations::kost_reservations))
        .route("/api/v1/reservations/:id/status", patch(handlers::reservations::update_status))
        .route("/api/v1/reservations/:id/extend", post(handlers::reservations::extend_reservation))
        // Catering routes
        .route("/api/v1/catering/kost/:kost_id/providers", get(handlers::catering::list_providers))
        .route("/api/v1/catering/providers", post(handlers::catering::create_provider))
        .route("/api/v1/catering/providers/:id", get(handlers::catering::get_provider))
        .route("/api/v1/catering/providers/:id", put(handlers::catering::update_provider))
        .route("/api/v1/catering/providers/:id/qris", post(handlers::catering::upload_provider_qris))
        .route("/api/v1/catering/providers/:id/menus", get(handlers::catering::list_menus))
        .route("/api/v1/catering/providers/:id/menus", post(handlers::catering::create_menu))
        .route("/api/v1/catering/providers/:id/orders", get(handlers::catering::provider_orders))
        .route("/api/v1/catering/menus/:id", put(handlers::catering::update_menu))
        .route("/api/v1/catering/menus/:id", delete(handlers::catering::delete_menu))
        .route("/api/v1/catering/menus/:id/photo", post(handlers::catering::upload_menu_photo))
        .route("/api/v1/catering/orders", post(handlers::catering::place_order))
        .route("/api/v1/catering/orders", get(handlers::catering::my_orders))
        .route("/api/v1/catering/orders/:id", get(handlers::catering::order_detail))
        .route("/api/v1/catering/orders/:id/status", patch(handlers::catering::update_order_status))
        .route("/api/v1/catering/orders/:id/cancel", post(handlers::catering::cancel_order))
        .route("/api/v1/catering/orders/:id/payment", patch(handlers::catering::verify_payment))
        // Laundry routes
        .route("/api/v1/laundry/kost/:kost_id/providers", get(handlers::laundry::list_providers))
        .route("/api/v1/laundry/providers", post(handlers::laundry::create_provider))
        .route("/api/v1/laundry/providers/:id", get(handlers::laundry::get_provider))
        .route("/api/v1/laundry/providers/:id", put(handlers::laundry::update_provider))
        .route("/api/v1/laundry/providers/:id/qris", post(handlers::laundry::upload_provider_qris))
        .route("/api/v1/laundry/providers/:id/services", get(handlers::laundry::list_services))
        .route("/api/v1/laundry/providers/:id/services", post(handlers::laundry::create_service))
        .route("/api/v1/laundry/providers/:id/orders", get(handlers::laundry::provider_orders))
        .route("/api/v1/laundry/services/:id", put(handlers::laundry::update_service))
        .route("/api/v1/laundry/services/:id", delete(handlers::laundry::delete_service))
        .route("/api/v1/laundry/orders", post(handlers::laundry::place_order))
        .route("/api/v1/laundry/orders", get(handlers::laundry::my_orders))
        .route("/api/v1/laundry/orders/:id", get(handlers::laundry::order_detail))
        .route("/api/v1/laundry/orders/:id/status", patch(handlers::laundry::update_order_status))
        .route("/api/v1/laundry/orders/:id/cancel", post(handlers::laundry::cancel_order))
        .route("/api/v1/laundry/orders/:id/payment", patch(handlers::laundry::verify_payment))
        // History routes
        .route("/api/v1/history/reservations", get(handlers::history::reservation_history))
        .route("/api/v1/history/orders", get(handlers::history::order_history))
        // User management routes
        .route("/api/v1/users", get(handlers::users::list_users))
        .route("/api/v1/users/avatar", post(handlers::users::upload_avatar))
        .route("/api/v1/users/:id", get(handlers::users::get_user))
        .route("/api/v1/users/:id", put(handlers::users::update_user))
        .route("/api/v1/users/:id", delete(handlers::users::delete_user))
        // Uploaded files
        .nest_service("/uploads", ServeDir::new(upload_dir))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
