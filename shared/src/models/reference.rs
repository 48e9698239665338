//! Reference data: routes, payment methods, delivery terms, item types, statuses

use serde::{Deserialize, Serialize};

/// Status assigned to every newly booked order
pub const DEFAULT_ORDER_STATUS: &str = "Pending";

pub const STATUS_DELIVERED: &str = "Delivered";
pub const STATUS_IN_TRANSIT: &str = "In Transit";
pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_PROCESSING: &str = "Processing";

/// Lookup tables an order refers to by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Route,
    PaymentMethod,
    TermsOfDelivery,
    ItemType,
    OrderStatus,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 5] = [
        ReferenceKind::Route,
        ReferenceKind::PaymentMethod,
        ReferenceKind::TermsOfDelivery,
        ReferenceKind::ItemType,
        ReferenceKind::OrderStatus,
    ];

    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            ReferenceKind::Route => "routes",
            ReferenceKind::PaymentMethod => "payment_methods",
            ReferenceKind::TermsOfDelivery => "terms_of_delivery",
            ReferenceKind::ItemType => "item_types",
            ReferenceKind::OrderStatus => "order_status",
        }
    }

    /// Request field carrying the name
    pub fn field(&self) -> &'static str {
        match self {
            ReferenceKind::Route => "route",
            ReferenceKind::PaymentMethod => "paymentMethod",
            ReferenceKind::TermsOfDelivery => "termsDelivery",
            ReferenceKind::ItemType => "itemType",
            ReferenceKind::OrderStatus => "status",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Route => write!(f, "Route"),
            ReferenceKind::PaymentMethod => write!(f, "Payment Method"),
            ReferenceKind::TermsOfDelivery => write!(f, "Terms of Delivery"),
            ReferenceKind::ItemType => write!(f, "Item Type"),
            ReferenceKind::OrderStatus => write!(f, "Status"),
        }
    }
}

/// A plain id/name lookup row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReferenceItem {
    pub id: i32,
    pub name: String,
}

/// Order status with its dashboard badge color
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderStatus {
    pub id: i32,
    pub name: String,
    pub color: Option<String>,
}

/// A reference name that did not match any row
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub kind: ReferenceKind,
    pub name: String,
}

impl UnresolvedReference {
    pub fn field(&self) -> &'static str {
        self.kind.field()
    }
}

impl std::fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ('{}')", self.kind, self.name)
    }
}
