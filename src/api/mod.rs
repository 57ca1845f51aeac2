//! Contracts of the Distribution API collaborators.
//!
//! The portal only consumes the API: resource-scoped CRUD over JSON records
//! ([`DataService`]) and the session endpoints ([`AuthService`]). The HTTP
//! implementation lives in [`http`]; tests substitute in-memory fakes.

use async_trait::async_trait;
use portal_wire::CheckAuthResponse;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ApiError;

pub mod http;

pub use http::HttpApi;

/// Query parameters for list calls (`?driverId=7`).
pub type Query = BTreeMap<String, String>;

/// Resource collections exposed by the Distribution API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Users,
    Drivers,
    Products,
    Orders,
    Customers,
    CustomerFeedbacks,
    Deliveries,
    Payments,
    Supplies,
    Shipments,
    Tasks,
    SalesOrders,
    PurchaseOrders,
    RetailOrders,
    PurchaseInvoices,
    SalesInvoices,
}

impl Resource {
    /// Collection path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Self::Users => "/api/users",
            Self::Drivers => "/api/drivers",
            Self::Products => "/api/products",
            Self::Orders => "/api/orders",
            Self::Customers => "/api/customers",
            Self::CustomerFeedbacks => "/api/customer-feedbacks",
            Self::Deliveries => "/api/deliveries",
            Self::Payments => "/api/payments",
            Self::Supplies => "/api/supplies",
            Self::Shipments => "/api/supplies/shipments",
            Self::Tasks => "/api/tasks",
            Self::SalesOrders => "/api/sales-orders",
            Self::PurchaseOrders => "/api/purchase-orders",
            Self::RetailOrders => "/api/retail-orders",
            Self::PurchaseInvoices => "/api/purchase-invoices",
            Self::SalesInvoices => "/api/sales-invoices",
        }
    }

    /// Singular noun for messages ("payment", "sales order")
    pub fn name(&self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Drivers => "driver",
            Self::Products => "product",
            Self::Orders => "order",
            Self::Customers => "customer",
            Self::CustomerFeedbacks => "customer feedback",
            Self::Deliveries => "delivery",
            Self::Payments => "payment",
            Self::Supplies => "supply",
            Self::Shipments => "shipment",
            Self::Tasks => "task",
            Self::SalesOrders => "sales order",
            Self::PurchaseOrders => "purchase order",
            Self::RetailOrders => "retail order",
            Self::PurchaseInvoices => "purchase invoice",
            Self::SalesInvoices => "sales invoice",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Resource-oriented data access.
///
/// List calls return arrays; single-entity calls return one record or
/// [`ApiError::NotFound`].
#[async_trait(?Send)]
pub trait DataService {
    async fn list(&self, resource: Resource, query: &Query) -> Result<Vec<Value>, ApiError>;

    async fn get(&self, resource: Resource, id: &str) -> Result<Value, ApiError>;

    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, ApiError>;

    async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value, ApiError>;

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError>;
}

/// Session endpoints.
#[async_trait(?Send)]
pub trait AuthService {
    /// `GET /api/check-auth`
    async fn check_auth(&self) -> Result<CheckAuthResponse, ApiError>;

    /// `POST /api/login`; success means the session cookie is set
    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError>;

    /// `POST /api/logout`
    async fn logout(&self) -> Result<(), ApiError>;
}

/// Decode a list of raw records, skipping (and logging) rows that do not fit.
pub fn decode_rows<T: DeserializeOwned>(resource: Resource, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(%resource, error = %e, "Skipping malformed record");
                None
            }
        })
        .collect()
}

/// Identifier of a raw record as a string (`id` may be numeric or textual).
pub fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
