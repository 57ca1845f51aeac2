//! Browser-style history: the visible location plus push/back/forward.
//!
//! [`MemoryHistory`] backs tests and the probe binary. [`BrowserHistory`]
//! (wasm only) drives `window.history`; its traversals complete through the
//! `popstate` event instead of synchronously.

use std::cell::{Cell, RefCell};
use url::Url;

use crate::api::Query;

/// Parsed location: path plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Query,
}

impl Location {
    /// Parse a path-and-query string (`/driver?id=7`). Anything unparsable
    /// becomes the root location.
    pub fn parse(input: &str) -> Self {
        let parsed = Url::parse("http://portal.invalid/").and_then(|base| base.join(input));
        match parsed {
            Ok(url) => Self {
                path: url.path().to_string(),
                query: url.query_pairs().into_owned().collect(),
            },
            Err(_) => Self::root(),
        }
    }

    pub fn root() -> Self {
        Self {
            path: "/".to_string(),
            query: Query::new(),
        }
    }

    /// First path segment (`"driver"` for `/driver/x`); empty for `/`.
    pub fn leading_segment(&self) -> &str {
        self.path.trim_start_matches('/').split('/').next().unwrap_or("")
    }

    /// Path-and-query string.
    pub fn to_url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

/// Result of asking the history to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// The location changed; the caller re-routes
    Moved,
    /// The platform will report the change later (browser `popstate`)
    Pending,
    /// Nothing to go back/forward to
    AtEdge,
}

pub trait History {
    fn location(&self) -> Location;

    /// Push a new entry without reloading.
    fn push(&self, url: &str);

    fn back(&self) -> Traversal;

    fn forward(&self) -> Traversal;
}

/// In-memory history stack.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: RefCell<Vec<String>>,
    index: Cell<usize>,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: RefCell::new(vec![initial.to_string()]),
            index: Cell::new(0),
        }
    }

    pub fn current_url(&self) -> String {
        self.entries.borrow()[self.index.get()].clone()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        Location::parse(&self.current_url())
    }

    fn push(&self, url: &str) {
        let mut entries = self.entries.borrow_mut();
        let next = self.index.get() + 1;
        // pushing drops the forward stack
        entries.truncate(next);
        entries.push(url.to_string());
        self.index.set(next);
    }

    fn back(&self) -> Traversal {
        match self.index.get() {
            0 => Traversal::AtEdge,
            i => {
                self.index.set(i - 1);
                Traversal::Moved
            }
        }
    }

    fn forward(&self) -> Traversal {
        let i = self.index.get();
        if i + 1 >= self.entries.borrow().len() {
            return Traversal::AtEdge;
        }
        self.index.set(i + 1);
        Traversal::Moved
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{History, Location, Traversal};
    use tracing::warn;
    use wasm_bindgen::JsValue;

    /// `window.history` backed history.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BrowserHistory;

    impl History for BrowserHistory {
        fn location(&self) -> Location {
            let Some(window) = web_sys::window() else {
                return Location::root();
            };
            let location = window.location();
            let path = location.pathname().unwrap_or_else(|_| "/".to_string());
            let search = location.search().unwrap_or_default();
            Location::parse(&format!("{path}{search}"))
        }

        fn push(&self, url: &str) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let pushed = window
                .history()
                .and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(url)));
            if let Err(e) = pushed {
                warn!(url, error = ?e, "pushState failed");
            }
        }

        fn back(&self) -> Traversal {
            match web_sys::window().map(|w| w.history()) {
                Some(Ok(history)) if history.back().is_ok() => Traversal::Pending,
                _ => Traversal::AtEdge,
            }
        }

        fn forward(&self) -> Traversal {
            match web_sys::window().map(|w| w.history()) {
                Some(Ok(history)) if history.forward().is_ok() => Traversal::Pending,
                _ => Traversal::AtEdge,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parse() {
        let loc = Location::parse("/driver?id=7");
        assert_eq!(loc.path, "/driver");
        assert_eq!(loc.query.get("id").map(String::as_str), Some("7"));
        assert_eq!(loc.leading_segment(), "driver");
        assert_eq!(loc.to_url(), "/driver?id=7");

        assert_eq!(Location::parse("/").leading_segment(), "");
        assert_eq!(Location::parse("/owner/extra").leading_segment(), "owner");
    }

    #[test]
    fn test_push_truncates_forward_stack() {
        let history = MemoryHistory::new("/");
        history.push("/owner");
        history.push("/404");
        assert_eq!(history.back(), Traversal::Moved);
        assert_eq!(history.current_url(), "/owner");

        history.push("/manager");
        assert_eq!(history.entries(), vec!["/", "/owner", "/manager"]);
        assert_eq!(history.forward(), Traversal::AtEdge);
    }

    #[test]
    fn test_back_at_start_is_edge() {
        let history = MemoryHistory::default();
        assert_eq!(history.back(), Traversal::AtEdge);
        assert_eq!(history.location(), Location::root());
    }
}
