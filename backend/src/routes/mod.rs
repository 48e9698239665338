//! Route definitions for the N2K logistics booking API

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Reference data for the booking form
        .route("/routes", get(handlers::list_routes))
        .route("/payment-methods", get(handlers::list_payment_methods))
        .route("/terms-of-delivery", get(handlers::list_terms_of_delivery))
        .route("/item-types", get(handlers::list_item_types))
        .route("/order-status", get(handlers::list_order_statuses))
        // Fleet
        .route("/vehicles", get(handlers::list_vehicles))
        .route("/vehicle-allocation", get(handlers::allocate_vehicle))
        // Orders
        .nest("/orders", order_routes())
        .route("/track/:lr_number", get(handlers::track_order))
        // Reports
        .route("/route-performance", get(handlers::get_route_performance))
        .route("/route-performance/trends", get(handlers::get_route_trend))
        .route("/routes/stats", get(handlers::get_route_stats))
        .route("/dashboard", get(handlers::get_dashboard))
}

/// Order booking routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/:id",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
}
