//! The single mount point of the application and its listener registry.
//!
//! Whoever wants to draw must first [`Surface::claim`] it; the returned token
//! is checked on every later mutation, so a controller that lost ownership
//! (the user navigated elsewhere while its section was loading) cannot
//! overwrite the new screen.
//!
//! Listener bindings are derived from the mounted screen. They live in two
//! regions: `Chrome` (sidebar, logout, refresh, login form, go-back) and
//! `Content` (everything the active section rendered). Replacing the content
//! detaches every content binding before the new ones are attached; chrome
//! bindings are untouched.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, trace};

use super::{elements, Action, Renderable, Screen, UiEvent};

/// Proof of ownership handed out by [`Surface::claim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Chrome,
    Content,
}

/// Counters describing how the surface has been drawn so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub screen_mounts: u32,
    pub chrome_renders: u32,
    pub content_renders: u32,
    pub attached: u32,
    pub detached: u32,
    pub rejected: u32,
}

#[derive(Debug, Clone)]
struct Binding {
    region: Region,
    action: Action,
}

type Observer = Rc<dyn Fn(u64)>;

#[derive(Default)]
struct SurfaceState {
    owner: u64,
    screen: Screen,
    bindings: HashMap<String, Binding>,
    stats: RenderStats,
    revision: u64,
    observer: Option<Observer>,
}

impl SurfaceState {
    fn detach(&mut self, region: Option<Region>) {
        let before = self.bindings.len();
        self.bindings
            .retain(|_, binding| region.is_some_and(|r| binding.region != r));
        self.stats.detached += (before - self.bindings.len()) as u32;
    }

    fn attach(&mut self, element: String, region: Region, action: Action) {
        if self
            .bindings
            .insert(element.clone(), Binding { region, action })
            .is_some()
        {
            // duplicate element id in one render; the later one wins
            debug!(element, "Replaced existing binding");
            self.stats.detached += 1;
        }
        self.stats.attached += 1;
    }

    fn attach_content(&mut self, content: &Renderable) {
        for trigger in content.triggers() {
            self.attach(
                trigger.element.clone(),
                Region::Content,
                Action::Command(trigger.command.clone()),
            );
        }
        for form in content.forms() {
            self.attach(
                form.element.clone(),
                Region::Content,
                Action::Command(form.command.clone()),
            );
        }
    }

    fn attach_screen(&mut self) {
        let screen = std::mem::take(&mut self.screen);
        match &screen {
            Screen::Blank => {}
            Screen::Login(_) => {
                self.attach(elements::LOGIN_FORM.to_string(), Region::Chrome, Action::Login);
            }
            Screen::NotFound(_) => {
                self.attach(elements::GO_BACK.to_string(), Region::Chrome, Action::Back);
            }
            Screen::Dashboard(view) => {
                for item in &view.nav {
                    self.attach(
                        elements::nav(&item.id),
                        Region::Chrome,
                        Action::SwitchSection(item.id.clone()),
                    );
                }
                self.attach(elements::LOGOUT.to_string(), Region::Chrome, Action::Logout);
                self.attach(elements::REFRESH.to_string(), Region::Chrome, Action::Refresh);
                self.attach_content(&view.content);
            }
        }
        self.screen = screen;
    }
}

/// Shared handle to the mount point. Cloning shares the same surface.
#[derive(Clone, Default)]
pub struct Surface {
    state: Rc<RefCell<SurfaceState>>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of the surface, invalidating every earlier token.
    pub fn claim(&self) -> SurfaceToken {
        let mut state = self.state.borrow_mut();
        state.owner += 1;
        SurfaceToken(state.owner)
    }

    pub fn is_owner(&self, token: SurfaceToken) -> bool {
        self.state.borrow().owner == token.0
    }

    /// Replace the whole screen. All bindings are detached and rebuilt.
    pub fn mount(&self, token: SurfaceToken, screen: Screen) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.owner != token.0 {
                state.stats.rejected += 1;
                debug!(token = token.0, owner = state.owner, "Rejected stale mount");
                return false;
            }
            state.detach(None);
            let is_dashboard = matches!(screen, Screen::Dashboard(_));
            state.screen = screen;
            state.attach_screen();
            state.stats.screen_mounts += 1;
            if is_dashboard {
                state.stats.chrome_renders += 1;
                state.stats.content_renders += 1;
            }
            trace!(kind = state.screen.kind(), "Mounted screen");
        }
        self.notify();
        true
    }

    /// Replace only the dashboard content region and the sidebar highlight.
    ///
    /// Returns `false` (and changes nothing) when `token` is stale or no
    /// dashboard is mounted.
    pub fn replace_content(&self, token: SurfaceToken, active: &str, content: Renderable) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.owner != token.0 || !matches!(state.screen, Screen::Dashboard(_)) {
                state.stats.rejected += 1;
                debug!(token = token.0, owner = state.owner, "Rejected stale content");
                return false;
            }
            state.detach(Some(Region::Content));
            state.attach_content(&content);
            if let Screen::Dashboard(view) = &mut state.screen {
                view.active = active.to_string();
                view.content = content;
            }
            state.stats.content_renders += 1;
        }
        self.notify();
        true
    }

    /// Look up what an element is bound to. Form values are merged into
    /// command payloads.
    pub fn resolve(&self, event: &UiEvent) -> Option<Action> {
        let state = self.state.borrow();
        let binding = state.bindings.get(&event.element)?;
        Some(match &binding.action {
            Action::Command(cmd) => Action::Command(cmd.clone().with_values(&event.values)),
            other => other.clone(),
        })
    }

    /// Snapshot of the mounted screen.
    pub fn screen(&self) -> Screen {
        self.state.borrow().screen.clone()
    }

    pub fn binding_count(&self, region: Region) -> usize {
        self.state
            .borrow()
            .bindings
            .values()
            .filter(|b| b.region == region)
            .count()
    }

    pub fn is_bound(&self, element: &str) -> bool {
        self.state.borrow().bindings.contains_key(element)
    }

    pub fn stats(&self) -> RenderStats {
        self.state.borrow().stats
    }

    pub fn revision(&self) -> u64 {
        self.state.borrow().revision
    }

    /// Register the callback run after every successful change. Only one
    /// observer is kept; the UI layer installs it once.
    pub fn observe(&self, observer: impl Fn(u64) + 'static) {
        self.state.borrow_mut().observer = Some(Rc::new(observer));
    }

    fn notify(&self) {
        let (observer, revision) = {
            let mut state = self.state.borrow_mut();
            state.revision += 1;
            (state.observer.clone(), state.revision)
        };
        if let Some(observer) = observer {
            observer(revision);
        }
    }
}
