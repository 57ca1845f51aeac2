//! Dashboard controller: one generic state machine reused by every role.
//!
//! A controller owns a fixed registry of sections ([`DashboardSpec`]),
//! the id of the active one and every section unit instantiated so far.
//! Units are created lazily on first activation and kept until the
//! controller is dropped, so switching away and back neither re-creates nor
//! re-fetches.
//!
//! Mounting claims the surface. From then on the controller only replaces
//! the content region; the chrome (sidebar, header) is drawn once.

use portal_wire::Role;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

use crate::sections::{Handled, SectionContext, SectionUnit};
use crate::view::{Action, Command, DashboardView, NavItem, Renderable, Screen, Surface, SurfaceToken};

pub mod roles;

pub use roles::dashboard_for;

/// Builds a section unit for a dashboard context.
pub type SectionFactory = Rc<dyn Fn(SectionContext) -> Box<dyn SectionUnit>>;

/// One sidebar entry.
#[derive(Clone)]
pub struct SectionSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub factory: SectionFactory,
}

impl SectionSpec {
    pub fn new<F, U>(id: &'static str, label: &'static str, icon: &'static str, factory: F) -> Self
    where
        F: Fn(SectionContext) -> U + 'static,
        U: SectionUnit + 'static,
    {
        Self {
            id,
            label,
            icon,
            factory: Rc::new(move |ctx| Box::new(factory(ctx)) as Box<dyn SectionUnit>),
        }
    }
}

impl fmt::Debug for SectionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionSpec")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Static description of one role's dashboard.
#[derive(Debug, Clone)]
pub struct DashboardSpec {
    pub role: Role,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub default_section: &'static str,
    pub sections: Vec<SectionSpec>,
}

impl DashboardSpec {
    pub fn section(&self, id: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_ids(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.id).collect()
    }
}

/// Outcome of applying a chrome or content action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Handled inside the dashboard
    Stay,
    /// The user asked to log out; the caller owns the transition
    Logout,
}

pub struct DashboardController {
    spec: Rc<DashboardSpec>,
    ctx: SectionContext,
    surface: Surface,
    token: Option<SurfaceToken>,
    current: String,
    sections: HashMap<String, Box<dyn SectionUnit>>,
    instantiations: u32,
}

impl DashboardController {
    pub fn new(spec: Rc<DashboardSpec>, ctx: SectionContext, surface: Surface) -> Self {
        let current = spec.default_section.to_string();
        Self {
            spec,
            ctx,
            surface,
            token: None,
            current,
            sections: HashMap::new(),
            instantiations: 0,
        }
    }

    pub fn role(&self) -> Role {
        self.spec.role
    }

    pub fn current_section(&self) -> &str {
        &self.current
    }

    /// Section ids instantiated so far.
    pub fn loaded_sections(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Total number of units ever constructed by this controller.
    pub fn instantiations(&self) -> u32 {
        self.instantiations
    }

    pub fn is_mounted(&self) -> bool {
        self.token.is_some_and(|t| self.surface.is_owner(t))
    }

    /// Draw the chrome with a loading placeholder, then activate the current
    /// (default) section.
    pub async fn mount(&mut self) {
        let token = self.surface.claim();
        self.token = Some(token);

        let view = DashboardView {
            role: self.spec.role,
            title: self.spec.title.to_string(),
            subtitle: self.spec.subtitle.to_string(),
            nav: self
                .spec
                .sections
                .iter()
                .map(|s| NavItem {
                    id: s.id.to_string(),
                    label: s.label.to_string(),
                    icon: s.icon,
                })
                .collect(),
            active: self.current.clone(),
            content: Renderable::loading(),
        };
        self.surface.mount(token, Screen::Dashboard(view));
        info!(role = %self.spec.role, section = %self.current, "Dashboard mounted");

        let current = self.current.clone();
        self.switch_section(&current).await;
    }

    /// Activate a section, instantiating and loading it on first use.
    ///
    /// Returns `false` for ids this dashboard does not have.
    pub async fn switch_section(&mut self, id: &str) -> bool {
        let Some(spec) = self.spec.section(id) else {
            debug!(role = %self.spec.role, section = id, "Unknown section");
            return false;
        };
        self.current = id.to_string();

        if !self.sections.contains_key(id) {
            let factory = spec.factory.clone();
            let mut unit = factory(self.ctx.clone());
            self.instantiations += 1;
            debug!(role = %self.spec.role, section = id, "Instantiating section");
            unit.load().await;
            // a concurrent switch may have won the race while loading
            self.sections.entry(id.to_string()).or_insert(unit);
        }

        self.render_current();
        true
    }

    /// Re-run the active unit's load and redraw.
    pub async fn refresh(&mut self) {
        if let Some(unit) = self.sections.get_mut(&self.current) {
            unit.load().await;
        }
        self.render_current();
    }

    /// Hand a command to the active unit only.
    pub async fn dispatch(&mut self, command: &Command) -> Handled {
        let Some(unit) = self.sections.get_mut(&self.current) else {
            return Handled::Ignored;
        };
        let handled = unit.handle(command).await;
        if handled == Handled::Ignored {
            debug!(section = %self.current, command = %command.name, "Command ignored");
        }
        self.render_current();
        handled
    }

    pub async fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::SwitchSection(id) => {
                self.switch_section(&id).await;
            }
            Action::Refresh => self.refresh().await,
            Action::Command(command) => {
                self.dispatch(&command).await;
            }
            Action::Logout => return Outcome::Logout,
            Action::Login | Action::Back => {
                debug!(?action, "Action not handled by dashboards");
            }
        }
        Outcome::Stay
    }

    /// Output of the active unit, if it exists.
    pub fn render(&self) -> Option<Renderable> {
        self.sections.get(&self.current).map(|unit| unit.render())
    }

    /// Borrow an instantiated unit.
    pub fn unit(&self, id: &str) -> Option<&dyn SectionUnit> {
        self.sections.get(id).map(|unit| unit.as_ref())
    }

    fn render_current(&self) {
        let (Some(token), Some(content)) = (self.token, self.render()) else {
            return;
        };
        if !self.surface.replace_content(token, &self.current, content) {
            debug!(role = %self.spec.role, "Dashboard no longer owns the surface");
        }
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        debug!(role = %self.spec.role, sections = self.sections.len(), "Dashboard discarded");
    }
}
