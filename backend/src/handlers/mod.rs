//! HTTP handlers for the N2K logistics booking API

pub mod health;
pub mod orders;
pub mod reference;
pub mod reporting;
pub mod vehicles;

pub use health::health_check;
pub use orders::{create_order, delete_order, get_order, list_orders, track_order, update_order};
pub use reference::{
    list_item_types, list_order_statuses, list_payment_methods, list_routes,
    list_terms_of_delivery,
};
pub use reporting::{get_dashboard, get_route_performance, get_route_stats, get_route_trend};
pub use vehicles::{allocate_vehicle, list_vehicles};
