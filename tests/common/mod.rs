//! In-memory Distribution API used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::oneshot;
use portal_wire::{CheckAuthResponse, SessionUser};
use serde_json::{json, Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use distribution_portal::api::{record_id, AuthService, DataService, Query, Resource};
use distribution_portal::error::ApiError;
use distribution_portal::nav::{MemoryHistory, Portal};
use distribution_portal::view::Surface;

struct Account {
    password: String,
    role: String,
    profile_id: Option<i64>,
}

#[derive(Default)]
pub struct FakeApi {
    collections: RefCell<HashMap<Resource, Vec<Value>>>,
    accounts: RefCell<HashMap<String, Account>>,
    session: RefCell<CheckAuthResponse>,
    calls: RefCell<Vec<String>>,
    failing: RefCell<HashSet<Resource>>,
    auth_down: Cell<bool>,
    held_checks: RefCell<VecDeque<oneshot::Receiver<()>>>,
    next_id: Cell<i64>,
}

impl FakeApi {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            next_id: Cell::new(1000),
            ..Self::default()
        })
    }

    pub fn seed(&self, resource: Resource, rows: Vec<Value>) {
        self.collections.borrow_mut().insert(resource, rows);
    }

    pub fn rows(&self, resource: Resource) -> Vec<Value> {
        self.collections
            .borrow()
            .get(&resource)
            .cloned()
            .unwrap_or_default()
    }

    pub fn add_account(&self, email: &str, password: &str, role: &str, profile_id: Option<i64>) {
        self.accounts.borrow_mut().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                role: role.to_string(),
                profile_id,
            },
        );
    }

    /// Pretend a session cookie for `role` is already set.
    pub fn sign_in_as(&self, role: &str, profile_id: Option<i64>) {
        *self.session.borrow_mut() = CheckAuthResponse {
            is_auth: true,
            user: Some(SessionUser {
                id: profile_id,
                role: role.to_string(),
                email: Some(format!("{role}@example.com")),
            }),
        };
    }

    pub fn sign_out(&self) {
        *self.session.borrow_mut() = CheckAuthResponse::default();
    }

    pub fn fail(&self, resource: Resource) {
        self.failing.borrow_mut().insert(resource);
    }

    pub fn set_auth_down(&self, down: bool) {
        self.auth_down.set(down);
    }

    /// The next auth check waits until `gate` fires (or its sender drops).
    pub fn hold_next_auth_check(&self, gate: oneshot::Receiver<()>) {
        self.held_checks.borrow_mut().push_back(gate);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.as_str() == call).count()
    }

    /// Calls that change data.
    pub fn writes(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("POST ") || c.starts_with("PUT ") || c.starts_with("DELETE "))
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn check_failing(&self, resource: Resource) -> Result<(), ApiError> {
        if self.failing.borrow().contains(&resource) {
            return Err(ApiError::Status {
                status: 500,
                message: "Internal server error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl DataService for FakeApi {
    async fn list(&self, resource: Resource, query: &Query) -> Result<Vec<Value>, ApiError> {
        let params: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        if params.is_empty() {
            self.log(format!("GET {resource}"));
        } else {
            self.log(format!("GET {resource}?{}", params.join("&")));
        }
        self.check_failing(resource)?;
        // like the real API, list endpoints ignore query parameters
        Ok(self.rows(resource))
    }

    async fn get(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        self.log(format!("GET {resource}/{id}"));
        self.check_failing(resource)?;
        self.rows(resource)
            .into_iter()
            .find(|row| record_id(row).as_deref() == Some(id))
            .ok_or_else(|| ApiError::NotFound {
                resource: resource.name().to_string(),
                id: id.to_string(),
            })
    }

    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, ApiError> {
        self.log(format!("POST {resource}"));
        self.check_failing(resource)?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let mut record = body.as_object().cloned().unwrap_or_else(Map::new);
        record.insert("id".to_string(), json!(id));
        let record = Value::Object(record);
        self.collections
            .borrow_mut()
            .entry(resource)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, resource: Resource, id: &str, body: &Value) -> Result<Value, ApiError> {
        self.log(format!("PUT {resource}/{id}"));
        self.check_failing(resource)?;
        let mut collections = self.collections.borrow_mut();
        let row = collections
            .get_mut(&resource)
            .and_then(|rows| rows.iter_mut().find(|row| record_id(row).as_deref() == Some(id)))
            .ok_or_else(|| ApiError::NotFound {
                resource: resource.name().to_string(),
                id: id.to_string(),
            })?;
        if let (Some(target), Some(changes)) = (row.as_object_mut(), body.as_object()) {
            for (k, v) in changes {
                target.insert(k.clone(), v.clone());
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ApiError> {
        self.log(format!("DELETE {resource}/{id}"));
        self.check_failing(resource)?;
        let mut collections = self.collections.borrow_mut();
        let rows = collections.entry(resource).or_default();
        let before = rows.len();
        rows.retain(|row| record_id(row).as_deref() != Some(id));
        if rows.len() == before {
            return Err(ApiError::NotFound {
                resource: resource.name().to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl AuthService for FakeApi {
    async fn check_auth(&self) -> Result<CheckAuthResponse, ApiError> {
        self.log("GET /api/check-auth".to_string());
        let held = self.held_checks.borrow_mut().pop_front();
        if let Some(gate) = held {
            let _ = gate.await;
        }
        if self.auth_down.get() {
            return Err(ApiError::Network("connection refused".to_string()));
        }
        Ok(self.session.borrow().clone())
    }

    async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.log("POST /api/login".to_string());
        let accounts = self.accounts.borrow();
        let account = accounts
            .get(email)
            .filter(|a| a.password == password)
            .ok_or(ApiError::Unauthorized)?;
        *self.session.borrow_mut() = CheckAuthResponse {
            is_auth: true,
            user: Some(SessionUser {
                id: account.profile_id,
                role: account.role.clone(),
                email: Some(email.to_string()),
            }),
        };
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.log("POST /api/logout".to_string());
        self.sign_out();
        Ok(())
    }
}

/// A portal over `api` starting at `initial`.
pub fn portal_at(api: &Rc<FakeApi>, initial: &str) -> (Portal, Rc<MemoryHistory>) {
    let history = Rc::new(MemoryHistory::new(initial));
    let portal = Portal::new(history.clone(), api.clone(), api.clone(), Surface::new());
    (portal, history)
}

pub fn portal(api: &Rc<FakeApi>) -> (Portal, Rc<MemoryHistory>) {
    portal_at(api, "/")
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn products() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Rice 5kg", "sku": "RICE-5", "category": "Grains", "price": "12.50", "quantity": 40, "minStock": 10, "status": "active"}),
        json!({"id": 2, "name": "Cooking Oil", "sku": "OIL-1", "category": "Oils", "price": "4.25", "quantity": 3, "minStock": 10, "status": "active"}),
    ]
}

pub fn sales_orders() -> Vec<Value> {
    vec![
        json!({"id": 11, "orderNumber": "SO-011", "customerId": 4, "subtotal": "150.00", "totalAmount": "165.00", "status": "delivered", "paymentStatus": "unpaid"}),
        json!({"id": 12, "orderNumber": "SO-012", "customerId": 5, "subtotal": "80.00", "totalAmount": "88.00", "status": "pending", "paymentStatus": "paid"}),
    ]
}

pub fn payments() -> Vec<Value> {
    vec![
        json!({"id": 21, "salesOrderId": 12, "amount": "80.00", "paymentMethod": "cash", "paymentDate": "2026-10-01T09:00:00Z", "status": "pending"}),
        json!({"id": 22, "salesOrderId": 9, "amount": "45.50", "paymentMethod": "check", "paymentDate": "2026-09-28T16:30:00Z", "status": "verified"}),
    ]
}

pub fn deliveries() -> Vec<Value> {
    vec![
        json!({"id": 31, "deliveryNumber": "DL-31", "driverId": 7, "status": "pending", "address": "12 Harbour Rd"}),
        json!({"id": 32, "deliveryNumber": "DL-32", "driverId": 8, "status": "delivered", "address": "4 Mill Lane"}),
        json!({"id": 33, "deliveryNumber": "DL-33", "driverId": 7, "status": "delivered", "address": "9 Kiln St"}),
    ]
}

pub fn drivers() -> Vec<Value> {
    vec![
        json!({"id": 7, "userId": 70, "name": "Ama Boateng", "email": "ama@example.com", "vehicleId": "TRK-1", "status": "active"}),
        json!({"id": 8, "name": "Kofi Mensah", "email": "KOFI@example.com", "vehicleId": "TRK-2", "status": "off-duty"}),
    ]
}

pub fn users() -> Vec<Value> {
    vec![
        json!({"id": 70, "email": "ama@example.com", "name": "Ama Boateng", "role": "driver"}),
        json!({"id": 80, "email": "kofi@example.com", "name": "Kofi Mensah", "role": "driver"}),
    ]
}

/// An API seeded with every fixture collection.
pub fn seeded_api() -> Rc<FakeApi> {
    let api = FakeApi::new();
    api.seed(Resource::Products, products());
    api.seed(Resource::SalesOrders, sales_orders());
    api.seed(Resource::Payments, payments());
    api.seed(Resource::Deliveries, deliveries());
    api.seed(Resource::Drivers, drivers());
    api.seed(Resource::Users, users());
    api
}
