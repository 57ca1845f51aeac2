//! Section units: the self-contained views a dashboard switches between.
//!
//! A unit owns whatever it fetched. It is created the first time its section
//! is activated and lives as long as its dashboard controller. Nothing here
//! returns an error to the controller: failed loads degrade to an empty view
//! and failed mutations become an inline notice.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::rc::Rc;
use tracing::warn;

use crate::api::{decode_rows, DataService, Query, Resource};
use crate::view::{Command, Renderable};

pub mod driver_roster;
pub mod entity_editor;
pub mod payment_collection;
pub mod payment_verification;
pub mod resource_table;

pub use driver_roster::DriverRoster;
pub use entity_editor::{EditorSpec, EntityEditor, FieldSpec};
pub use payment_collection::PaymentCollection;
pub use payment_verification::PaymentVerification;
pub use resource_table::{Column, ResourceTable, TableSpec};

/// Whether a unit acted on a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Done,
    Ignored,
}

/// List/add/edit state of editing units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    List,
    Add,
    Edit,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add => "add",
            Self::Edit => "edit",
        }
    }
}

/// Contract every section implements.
#[async_trait(?Send)]
pub trait SectionUnit {
    /// Populate local data. Never fails outward.
    async fn load(&mut self);

    /// Describe the current state. Must not perform I/O.
    fn render(&self) -> Renderable;

    /// React to a command emitted by this unit's own markup.
    async fn handle(&mut self, command: &Command) -> Handled {
        let _ = command;
        Handled::Ignored
    }
}

/// What a unit gets from its dashboard: the data collaborator and the
/// dashboard scope (query parameters of the dashboard URL, e.g. `id=7`).
#[derive(Clone)]
pub struct SectionContext {
    pub data: Rc<dyn DataService>,
    pub scope: Query,
}

impl SectionContext {
    pub fn new(data: Rc<dyn DataService>, scope: Query) -> Self {
        Self { data, scope }
    }

    pub fn scope_param(&self, key: &str) -> Option<&str> {
        self.scope.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// List a resource, logging and returning nothing on failure.
    pub async fn list_or_empty(&self, resource: Resource, query: &Query) -> Vec<Value> {
        match self.data.list(resource, query).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(%resource, error = %e, "Load failed, showing empty list");
                Vec::new()
            }
        }
    }

    pub async fn list_typed<T: DeserializeOwned>(&self, resource: Resource, query: &Query) -> Vec<T> {
        decode_rows(resource, self.list_or_empty(resource, query).await)
    }
}

/// Look up a dotted path (`salesOrder.orderNumber`) in a record.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |value, key| value.get(key))
}

/// Display text for a record field; missing and null render as `-`.
pub fn field_text(record: &Value, path: &str) -> String {
    match lookup(record, path) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) if s.is_empty() => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => if *b { "Yes" } else { "No" }.to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}
