//! Business logic services for the N2K logistics booking server

pub mod order;
pub mod reference;
pub mod reporting;
pub mod vehicle;

pub use order::OrderService;
pub use reference::ReferenceService;
pub use reporting::ReportingService;
pub use vehicle::VehicleService;
