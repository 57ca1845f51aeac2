//! Renderable model shared by the navigation engine and the UI layer.
//!
//! Section units never touch the DOM. They describe their output as a
//! [`Renderable`]; the [`surface::Surface`] holds the mounted [`Screen`] and
//! the listener bindings derived from it, and the Dioxus components in
//! `crate::app` draw whatever the surface currently holds.
//!
//! Interactive elements are addressed by an `element` id. A click or submit
//! arrives as a [`UiEvent`] naming that id and is resolved by the surface to
//! an [`Action`].

use portal_wire::Role;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

pub mod surface;

pub use surface::{Region, RenderStats, Surface, SurfaceToken};

// =============================================================================
// Commands
// =============================================================================

/// A named imperative action carried by rendered markup.
///
/// The active section unit receives the command and dispatches on `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub payload: Value,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Value::Object(Map::new()),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let Value::Object(map) = &mut self.payload {
            map.insert(key.to_string(), value.into());
        }
        self
    }

    /// Merge submitted form values into the payload (submitted values win).
    pub fn with_values(mut self, values: &BTreeMap<String, String>) -> Self {
        if let Value::Object(map) = &mut self.payload {
            for (k, v) in values {
                map.insert(k.clone(), Value::String(v.clone()));
            }
        }
        self
    }

    /// Payload field as a trimmed string; numbers are stringified.
    pub fn str(&self, key: &str) -> Option<String> {
        match self.payload.get(key)? {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The `id` payload field.
    pub fn id(&self) -> Option<String> {
        self.str("id").filter(|s| !s.is_empty())
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }
}

/// A clickable element bound to a command.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub element: String,
    pub label: String,
    pub command: Command,
}

impl Trigger {
    pub fn new(element: impl Into<String>, label: impl Into<String>, command: Command) -> Self {
        Self {
            element: element.into(),
            label: label.into(),
            command,
        }
    }
}

// =============================================================================
// Section output
// =============================================================================

/// Output of one section unit: a heading and a stack of blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Renderable {
    pub heading: String,
    pub subheading: Option<String>,
    pub blocks: Vec<Block>,
}

impl Renderable {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            ..Default::default()
        }
    }

    pub fn subheading(mut self, text: impl Into<String>) -> Self {
        self.subheading = Some(text.into());
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn maybe(self, block: Option<Block>) -> Self {
        match block {
            Some(block) => self.block(block),
            None => self,
        }
    }

    /// Placeholder shown while a section loads for the first time.
    pub fn loading() -> Self {
        Self::new("Loading…")
    }

    /// Every trigger in the output, including table row actions and form
    /// cancel buttons.
    pub fn triggers(&self) -> Vec<&Trigger> {
        let mut out = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Actions(triggers) => out.extend(triggers.iter()),
                Block::Table(table) => {
                    for row in &table.rows {
                        for cell in &row.cells {
                            if let Cell::Actions(triggers) = cell {
                                out.extend(triggers.iter());
                            }
                        }
                    }
                }
                Block::Form(form) => out.extend(form.cancel.iter()),
                Block::Notice(_) | Block::Empty(_) | Block::Stats(_) => {}
            }
        }
        out
    }

    pub fn forms(&self) -> impl Iterator<Item = &Form> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Form(form) => Some(form),
            _ => None,
        })
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Notice(notice) => Some(notice),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Notice(Notice),
    Stats(Vec<Stat>),
    Table(Table),
    Form(Form),
    Actions(Vec<Trigger>),
    /// Nothing to show, with an explanation
    Empty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: Tone,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            text: text.into(),
        }
    }
}

/// Summary figure ("Pending payments: 3").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Status-style value rendered as a pill
    Badge(String),
    Actions(Vec<Trigger>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Email,
    Password,
    Date,
    Select,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Current value (draft input survives a failed submit)
    pub value: String,
    /// `(value, label)` pairs for [`FieldKind::Select`]
    pub options: Vec<(String, String)>,
    pub readonly: bool,
}

impl FormField {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            value: String::new(),
            options: Vec::new(),
            readonly: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn options(mut self, options: Vec<(String, String)>) -> Self {
        self.options = options;
        self
    }
}

/// A form whose submit is bound to `command`; field values are merged into
/// the command payload at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub element: String,
    pub fields: Vec<FormField>,
    pub submit_label: String,
    pub command: Command,
    pub cancel: Option<Trigger>,
}

// =============================================================================
// Screens
// =============================================================================

/// Whatever occupies the application root.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Screen {
    /// Nothing mounted yet (initial route pending)
    #[default]
    Blank,
    Login(LoginView),
    NotFound(NotFoundView),
    Dashboard(DashboardView),
}

impl Screen {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Login(_) => "login",
            Self::NotFound(_) => "not-found",
            Self::Dashboard(_) => "dashboard",
        }
    }

    pub fn dashboard(&self) -> Option<&DashboardView> {
        match self {
            Self::Dashboard(view) => Some(view),
            _ => None,
        }
    }
}

/// Element ids of the fixed screens.
pub mod elements {
    pub const LOGIN_FORM: &str = "login-form";
    pub const GO_BACK: &str = "go-back";
    pub const LOGOUT: &str = "logout";
    pub const REFRESH: &str = "refresh";
    pub const NAV_PREFIX: &str = "nav-";

    pub fn nav(section_id: &str) -> String {
        format!("{NAV_PREFIX}{section_id}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginView {
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotFoundView {
    /// Path the user tried to reach, when known
    pub attempted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub id: String,
    pub label: String,
    pub icon: &'static str,
}

/// Dashboard chrome plus the active section's output.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub role: Role,
    pub title: String,
    pub subtitle: String,
    pub nav: Vec<NavItem>,
    pub active: String,
    pub content: Renderable,
}

// =============================================================================
// Events
// =============================================================================

/// A click or submit coming from the UI layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiEvent {
    pub element: String,
    pub values: BTreeMap<String, String>,
}

impl UiEvent {
    pub fn click(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn submit<K, V>(element: impl Into<String>, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            element: element.into(),
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// What a bound element does.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SwitchSection(String),
    Logout,
    Refresh,
    Command(Command),
    Login,
    Back,
}

// =============================================================================
// Text rendering (probe binary, logs)
// =============================================================================

impl fmt::Display for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.heading)?;
        if let Some(sub) = &self.subheading {
            writeln!(f, "{sub}")?;
        }
        for block in &self.blocks {
            match block {
                Block::Notice(n) => writeln!(f, "[{:?}] {}", n.tone, n.text)?,
                Block::Stats(stats) => {
                    for s in stats {
                        writeln!(f, "{}: {}", s.label, s.value)?;
                    }
                }
                Block::Empty(text) => writeln!(f, "({text})")?,
                Block::Actions(triggers) => {
                    let labels: Vec<_> = triggers.iter().map(|t| format!("[{}]", t.label)).collect();
                    writeln!(f, "{}", labels.join(" "))?;
                }
                Block::Table(table) => {
                    writeln!(f, "{}", table.columns.join(" | "))?;
                    for row in &table.rows {
                        let cells: Vec<String> = row
                            .cells
                            .iter()
                            .map(|c| match c {
                                Cell::Text(t) => t.clone(),
                                Cell::Badge(b) => format!("<{b}>"),
                                Cell::Actions(ts) => ts
                                    .iter()
                                    .map(|t| format!("[{}]", t.label))
                                    .collect::<Vec<_>>()
                                    .join(" "),
                            })
                            .collect();
                        writeln!(f, "{}", cells.join(" | "))?;
                    }
                }
                Block::Form(form) => {
                    for field in &form.fields {
                        let star = if field.required { "*" } else { "" };
                        writeln!(f, "{}{}: {}", field.label, star, field.value)?;
                    }
                    writeln!(f, "[{}]", form.submit_label)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => writeln!(f, "(nothing mounted)"),
            Self::Login(view) => {
                writeln!(f, "# Login")?;
                if let Some(err) = &view.error {
                    writeln!(f, "[Error] {err}")?;
                }
                Ok(())
            }
            Self::NotFound(view) => {
                writeln!(f, "# 404 - Page not found")?;
                if let Some(path) = &view.attempted {
                    writeln!(f, "{path}")?;
                }
                Ok(())
            }
            Self::Dashboard(view) => {
                writeln!(f, "# {} ({})", view.title, view.subtitle)?;
                let nav: Vec<String> = view
                    .nav
                    .iter()
                    .map(|item| {
                        if item.id == view.active {
                            format!("*{}*", item.label)
                        } else {
                            item.label.clone()
                        }
                    })
                    .collect();
                writeln!(f, "{}", nav.join(" | "))?;
                write!(f, "{}", view.content)
            }
        }
    }
}
