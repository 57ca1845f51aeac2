//! Generic list/add/edit editor over one API resource.
//!
//! State machine: `List -> Add -> List` and `List -> Edit -> List`. Add and
//! edit return to the list on success or cancel; there is no way from one
//! form straight into the other. A failed submit keeps the form and the
//! user's draft.

use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::{field_text, Column, Handled, SectionContext, SectionUnit, ViewMode};
use crate::api::{record_id, Query, Resource};
use crate::error::ValidationError;
use crate::view::{
    Block, Cell, Command, FieldKind, Form, FormField, Notice, Renderable, Row, Table, Trigger,
};

pub const SWITCH_TO_ADD: &str = "switch-to-add";
pub const SWITCH_TO_EDIT: &str = "switch-to-edit";
pub const SWITCH_TO_LIST: &str = "switch-to-list";
pub const CREATE: &str = "create";
pub const UPDATE: &str = "update";
pub const DELETE: &str = "delete";

/// Element id of the add/edit form.
pub const FORM_ELEMENT: &str = "entity-form";

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub options: &'static [(&'static str, &'static str)],
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            options: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn options(mut self, options: &'static [(&'static str, &'static str)]) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone)]
pub struct EditorSpec {
    pub resource: Resource,
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Singular noun for buttons and notices ("Product")
    pub noun: &'static str,
    pub columns: Vec<Column>,
    pub fields: Vec<FieldSpec>,
    pub allow_delete: bool,
}

pub struct EntityEditor {
    spec: EditorSpec,
    ctx: SectionContext,
    records: Vec<Value>,
    mode: ViewMode,
    editing: Option<Value>,
    draft: BTreeMap<String, String>,
    notice: Option<Notice>,
}

impl EntityEditor {
    pub fn new(spec: EditorSpec, ctx: SectionContext) -> Self {
        Self {
            spec,
            ctx,
            records: Vec::new(),
            mode: ViewMode::List,
            editing: None,
            draft: BTreeMap::new(),
            notice: None,
        }
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    pub fn editing(&self) -> Option<&Value> {
        self.editing.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn draft(&self) -> &BTreeMap<String, String> {
        &self.draft
    }

    pub fn switch_to_add(&mut self) -> bool {
        if self.mode != ViewMode::List {
            debug!(mode = self.mode.as_str(), "Ignoring switch to add outside list");
            return false;
        }
        self.mode = ViewMode::Add;
        self.editing = None;
        self.draft.clear();
        self.notice = None;
        true
    }

    pub fn switch_to_edit(&mut self, id: &str) -> bool {
        if self.mode != ViewMode::List {
            debug!(mode = self.mode.as_str(), "Ignoring switch to edit outside list");
            return false;
        }
        let Some(record) = self
            .records
            .iter()
            .find(|r| record_id(r).as_deref() == Some(id))
            .cloned()
        else {
            self.notice = Some(Notice::error(format!("{} not found", self.spec.noun)));
            return false;
        };

        self.draft = self
            .spec
            .fields
            .iter()
            .map(|f| (f.name.to_string(), draft_value(&record, f.name)))
            .collect();
        self.editing = Some(record);
        self.mode = ViewMode::Edit;
        self.notice = None;
        true
    }

    pub fn switch_to_list(&mut self) {
        self.mode = ViewMode::List;
        self.editing = None;
        self.draft.clear();
        self.notice = None;
    }

    pub async fn create(&mut self, values: &BTreeMap<String, String>) -> bool {
        if self.mode != ViewMode::Add {
            return false;
        }
        self.remember(values);
        let body = match self.validate() {
            Ok(body) => body,
            Err(e) => {
                self.notice = Some(Notice::error(e.to_string()));
                return false;
            }
        };

        match self.ctx.data.create(self.spec.resource, &body).await {
            Ok(_) => {
                info!(resource = %self.spec.resource, "Created record");
                self.finish(format!("{} created successfully!", self.spec.noun)).await;
                true
            }
            Err(e) => {
                warn!(resource = %self.spec.resource, error = %e, "Create failed");
                self.notice = Some(Notice::error(e.user_message()));
                false
            }
        }
    }

    pub async fn update(&mut self, values: &BTreeMap<String, String>) -> bool {
        if self.mode != ViewMode::Edit {
            return false;
        }
        let Some(id) = self.editing.as_ref().and_then(record_id) else {
            return false;
        };
        self.remember(values);
        let body = match self.validate() {
            Ok(body) => body,
            Err(e) => {
                self.notice = Some(Notice::error(e.to_string()));
                return false;
            }
        };

        match self.ctx.data.update(self.spec.resource, &id, &body).await {
            Ok(_) => {
                info!(resource = %self.spec.resource, id = %id, "Updated record");
                self.finish(format!("{} updated successfully!", self.spec.noun)).await;
                true
            }
            Err(e) => {
                warn!(resource = %self.spec.resource, id = %id, error = %e, "Update failed");
                self.notice = Some(Notice::error(e.user_message()));
                false
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        if !self.spec.allow_delete || self.mode != ViewMode::List {
            return false;
        }
        match self.ctx.data.delete(self.spec.resource, id).await {
            Ok(()) => {
                self.finish(format!("{} deleted.", self.spec.noun)).await;
                true
            }
            Err(e) => {
                warn!(resource = %self.spec.resource, id = %id, error = %e, "Delete failed");
                self.notice = Some(Notice::error(e.user_message()));
                false
            }
        }
    }

    async fn finish(&mut self, message: String) {
        self.load().await;
        self.switch_to_list();
        self.notice = Some(Notice::success(message));
    }

    /// Keep submitted values so a failed submit re-renders them.
    fn remember(&mut self, values: &BTreeMap<String, String>) {
        for field in &self.spec.fields {
            if let Some(v) = values.get(field.name) {
                self.draft.insert(field.name.to_string(), v.clone());
            }
        }
    }

    fn validate(&self) -> Result<Value, ValidationError> {
        let value_of = |name: &str| self.draft.get(name).map(|v| v.trim()).unwrap_or("");

        let missing: Vec<String> = self
            .spec
            .fields
            .iter()
            .filter(|f| f.required && value_of(f.name).is_empty())
            .map(|f| f.name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let mut body = Map::new();
        for field in &self.spec.fields {
            let raw = value_of(field.name);
            if raw.is_empty() {
                continue;
            }
            let value = match field.kind {
                FieldKind::Number => {
                    let n: f64 = raw.parse().map_err(|_| ValidationError::NotANumber {
                        field: field.label.to_string(),
                    })?;
                    number_value(n).ok_or_else(|| ValidationError::NotANumber {
                        field: field.label.to_string(),
                    })?
                }
                _ => Value::String(raw.to_string()),
            };
            body.insert(field.name.to_string(), value);
        }
        Ok(Value::Object(body))
    }

    fn render_list(&self, out: Renderable) -> Renderable {
        let add = Trigger::new(
            SWITCH_TO_ADD,
            format!("Add {}", self.spec.noun),
            Command::new(SWITCH_TO_ADD),
        );
        let out = out.block(Block::Actions(vec![add]));
        if self.records.is_empty() {
            return out.block(Block::Empty(format!("No {} records yet.", self.spec.noun.to_lowercase())));
        }

        let mut columns: Vec<String> = self.spec.columns.iter().map(|c| c.label.to_string()).collect();
        columns.push("Actions".to_string());

        let rows = self
            .records
            .iter()
            .map(|record| {
                let mut cells: Vec<Cell> = self
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
                    .collect();

                let mut actions = Vec::new();
                if let Some(id) = record_id(record) {
                    actions.push(Trigger::new(
                        format!("edit-{id}"),
                        "Edit",
                        Command::new(SWITCH_TO_EDIT).with("id", id.as_str()),
                    ));
                    if self.spec.allow_delete {
                        actions.push(Trigger::new(
                            format!("delete-{id}"),
                            "Delete",
                            Command::new(DELETE).with("id", id.as_str()),
                        ));
                    }
                }
                cells.push(Cell::Actions(actions));
                Row { cells }
            })
            .collect();

        out.block(Block::Table(Table { columns, rows }))
    }

    fn render_form(&self, out: Renderable) -> Renderable {
        let fields = self
            .spec
            .fields
            .iter()
            .map(|f| {
                let mut field = FormField::new(f.name, f.label, f.kind)
                    .value(self.draft.get(f.name).cloned().unwrap_or_default())
                    .options(
                        f.options
                            .iter()
                            .map(|(v, l)| (v.to_string(), l.to_string()))
                            .collect(),
                    );
                field.required = f.required;
                field
            })
            .collect();

        let (submit_label, command) = match self.mode {
            ViewMode::Edit => {
                let id = self.editing.as_ref().and_then(record_id).unwrap_or_default();
                ("Save Changes".to_string(), Command::new(UPDATE).with("id", id))
            }
            _ => (format!("Create {}", self.spec.noun), Command::new(CREATE)),
        };

        out.block(Block::Form(Form {
            element: FORM_ELEMENT.to_string(),
            fields,
            submit_label,
            command,
            cancel: Some(Trigger::new("cancel-edit", "Cancel", Command::new(SWITCH_TO_LIST))),
        }))
    }
}

fn draft_value(record: &Value, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(Value::Number(Number::from(n as i64)))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

fn command_values(command: &Command) -> BTreeMap<String, String> {
    command
        .payload
        .as_object()
        .map(|map| {
            map.keys()
                .filter_map(|k| command.str(k).map(|v| (k.clone(), v)))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait(?Send)]
impl SectionUnit for EntityEditor {
    async fn load(&mut self) {
        self.records = self.ctx.list_or_empty(self.spec.resource, &Query::new()).await;
    }

    fn render(&self) -> Renderable {
        let heading = match self.mode {
            ViewMode::List => self.spec.title.to_string(),
            ViewMode::Add => format!("Add {}", self.spec.noun),
            ViewMode::Edit => format!("Edit {}", self.spec.noun),
        };
        let out = Renderable::new(heading)
            .subheading(self.spec.subtitle)
            .maybe(self.notice.clone().map(Block::Notice));

        match self.mode {
            ViewMode::List => self.render_list(out),
            ViewMode::Add | ViewMode::Edit => self.render_form(out),
        }
    }

    async fn handle(&mut self, command: &Command) -> Handled {
        let acted = match command.name.as_str() {
            SWITCH_TO_ADD => self.switch_to_add(),
            SWITCH_TO_EDIT => match command.id() {
                Some(id) => self.switch_to_edit(&id),
                None => false,
            },
            SWITCH_TO_LIST => {
                self.switch_to_list();
                true
            }
            CREATE => self.create(&command_values(command)).await,
            UPDATE => self.update(&command_values(command)).await,
            DELETE => match command.id() {
                Some(id) => self.delete(&id).await,
                None => false,
            },
            _ => return Handled::Ignored,
        };
        debug!(command = %command.name, acted, mode = self.mode.as_str(), "Editor command");
        Handled::Done
    }
}
