//! Static route table: exact path to target.

use portal_wire::Role;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dashboard::{dashboard_for, DashboardSpec};

pub const LOGIN_PATH: &str = "/";
pub const NOT_FOUND_PATH: &str = "/404";

#[derive(Debug, Clone)]
pub enum Target {
    Login,
    NotFound,
    Dashboard(Rc<DashboardSpec>),
}

/// Immutable mapping from path to [`Target`], built once at startup.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: BTreeMap<String, Target>,
}

impl RouteTable {
    /// `/`, `/404` and one dashboard per role at `/<role>`.
    pub fn standard() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(LOGIN_PATH.to_string(), Target::Login);
        entries.insert(NOT_FOUND_PATH.to_string(), Target::NotFound);
        for role in Role::ALL {
            entries.insert(role.path(), Target::Dashboard(Rc::new(dashboard_for(role))));
        }
        Self { entries }
    }

    /// Exact-path lookup; query strings must already be stripped.
    pub fn lookup(&self, path: &str) -> Option<&Target> {
        self.entries.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
