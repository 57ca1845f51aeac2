//! Read-only listing of one API resource.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{field_text, lookup, SectionContext, SectionUnit};
use crate::api::{Query, Resource};
use crate::view::{Block, Cell, Renderable, Row, Stat, Table};

/// One table column: a dotted field path and a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub badge: bool,
}

impl Column {
    pub const fn text(key: &'static str, label: &'static str) -> Self {
        Self { key, label, badge: false }
    }

    pub const fn badge(key: &'static str, label: &'static str) -> Self {
        Self { key, label, badge: true }
    }
}

/// Static description of a table section.
#[derive(Clone)]
pub struct TableSpec {
    pub resource: Resource,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub columns: Vec<Column>,
    /// `(dashboard scope param, record field)`: when the dashboard URL
    /// carries the param, only records whose field equals it are listed
    pub scope: Option<(&'static str, &'static str)>,
    /// Row predicate applied after loading (e.g. low stock only)
    pub filter: Option<fn(&Value) -> bool>,
    pub empty: &'static str,
}

impl TableSpec {
    pub fn new(resource: Resource, title: &'static str, subtitle: &'static str) -> Self {
        Self {
            resource,
            title,
            subtitle,
            columns: Vec::new(),
            scope: None,
            filter: None,
            empty: "No records found.",
        }
    }

    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    pub fn scoped(mut self, param: &'static str, field: &'static str) -> Self {
        self.scope = Some((param, field));
        self
    }

    pub fn filter(mut self, filter: fn(&Value) -> bool) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn empty(mut self, text: &'static str) -> Self {
        self.empty = text;
        self
    }
}

pub struct ResourceTable {
    spec: TableSpec,
    ctx: SectionContext,
    rows: Vec<Value>,
}

impl ResourceTable {
    pub fn new(spec: TableSpec, ctx: SectionContext) -> Self {
        Self {
            spec,
            ctx,
            rows: Vec::new(),
        }
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    fn scope_value(&self) -> Option<(&'static str, String)> {
        let (param, field) = self.spec.scope?;
        let value = self.ctx.scope_param(param)?;
        Some((field, value.to_string()))
    }
}

fn matches_scope(record: &Value, field: &str, expected: &str) -> bool {
    match lookup(record, field) {
        Some(Value::Number(n)) => n.to_string() == expected,
        Some(Value::String(s)) => s == expected,
        _ => false,
    }
}

#[async_trait(?Send)]
impl SectionUnit for ResourceTable {
    async fn load(&mut self) {
        let mut query = Query::new();
        let scope = self.scope_value();
        if let Some((field, value)) = &scope {
            query.insert(field.to_string(), value.clone());
        } else if self.spec.scope.is_some() {
            debug!(resource = %self.spec.resource, "No scope parameter, listing unscoped");
        }

        let mut rows = self.ctx.list_or_empty(self.spec.resource, &query).await;
        // the API may ignore the query; enforce the scope here as well
        if let Some((field, value)) = &scope {
            rows.retain(|r| matches_scope(r, field, value));
        }
        if let Some(filter) = self.spec.filter {
            rows.retain(|r| filter(r));
        }
        self.rows = rows;
    }

    fn render(&self) -> Renderable {
        let out = Renderable::new(self.spec.title).subheading(self.spec.subtitle);
        if self.rows.is_empty() {
            return out.block(Block::Empty(self.spec.empty.to_string()));
        }

        let rows = self
            .rows
            .iter()
            .map(|record| Row {
                cells: self
                    .spec
                    .columns
                    .iter()
                    .map(|col| {
                        let text = field_text(record, col.key);
                        if col.badge {
                            Cell::Badge(text)
                        } else {
                            Cell::Text(text)
                        }
                    })
                    .collect(),
            })
            .collect();

        out.block(Block::Stats(vec![Stat {
            label: "Total".to_string(),
            value: self.rows.len().to_string(),
        }]))
        .block(Block::Table(Table {
            columns: self.spec.columns.iter().map(|c| c.label.to_string()).collect(),
            rows,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matches_scope_compares_as_text() {
        let record = json!({"driverId": 7, "driver": {"code": "D7"}});
        assert!(matches_scope(&record, "driverId", "7"));
        assert!(!matches_scope(&record, "driverId", "8"));
        assert!(matches_scope(&record, "driver.code", "D7"));
        assert!(!matches_scope(&record, "missing", "7"));
    }
}
