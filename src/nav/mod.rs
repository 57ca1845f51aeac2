//! Navigation: path router, navigation bridge and the active dashboard.
//!
//! [`Portal`] is the single entry point the UI talks to. `navigate_to`
//! pushes a history entry and re-runs [`Portal::route`]; the browser's
//! back/forward runs the same `route`, so history traversal is authorized
//! exactly like a fresh navigation.
//!
//! Route evaluation order:
//! 1. `/` mounts the login view, no auth check.
//! 2. `/404` mounts the not-found view, no auth check.
//! 3. Paths missing from the table redirect to `/404`, no auth check.
//! 4. Auth check; anonymous sessions redirect to `/`.
//! 5. The leading segment must equal the session role, else `/404`.
//! 6. The matched dashboard is mounted.
//!
//! Every `route()` takes a new generation number. An evaluation whose auth
//! check returns after a newer `route()` started is dropped, so the last
//! request wins rather than the last completion.

use futures::lock::Mutex;
use portal_wire::Role;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

use crate::api::{AuthService, DataService};
use crate::dashboard::{DashboardController, DashboardSpec, Outcome};
use crate::error::ApiError;
use crate::sections::SectionContext;
use crate::view::{Action, LoginView, NotFoundView, Screen, Surface, UiEvent};

pub mod auth_gate;
pub mod history;
pub mod routes;

pub use auth_gate::{AuthGate, Session};
pub use history::{History, Location, MemoryHistory, Traversal};
pub use routes::{RouteTable, Target, LOGIN_PATH, NOT_FOUND_PATH};

#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;

/// Redirects followed within one `route()` before giving up.
const MAX_REDIRECTS: usize = 4;

/// Where a `route()` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Login,
    NotFound,
    Dashboard(Role),
    /// A newer navigation started while this one was waiting
    Superseded,
}

enum Decision {
    Login,
    NotFound,
    Redirect(&'static str),
    Dashboard(Rc<DashboardSpec>, Location),
    Stale,
}

/// The dashboard currently owning the surface.
struct ActiveDashboard {
    generation: u64,
    controller: Rc<Mutex<DashboardController>>,
}

struct PortalInner {
    history: Rc<dyn History>,
    routes: RouteTable,
    gate: AuthGate,
    auth: Rc<dyn AuthService>,
    data: Rc<dyn DataService>,
    surface: Surface,
    generation: Cell<u64>,
    active: RefCell<Option<ActiveDashboard>>,
}

/// Router plus navigation bridge. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Portal {
    inner: Rc<PortalInner>,
}

impl Portal {
    pub fn new(
        history: Rc<dyn History>,
        auth: Rc<dyn AuthService>,
        data: Rc<dyn DataService>,
        surface: Surface,
    ) -> Self {
        Self {
            inner: Rc::new(PortalInner {
                history,
                routes: RouteTable::standard(),
                gate: AuthGate::new(auth.clone()),
                auth,
                data,
                surface,
                generation: Cell::new(0),
                active: RefCell::new(None),
            }),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.inner.surface
    }

    pub fn location(&self) -> Location {
        self.inner.history.location()
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    /// The mounted dashboard's controller, if any.
    pub fn active_controller(&self) -> Option<Rc<Mutex<DashboardController>>> {
        self.inner
            .active
            .borrow()
            .as_ref()
            .map(|active| active.controller.clone())
    }

    /// Route whatever location the history currently shows.
    pub async fn start(&self) -> RouteOutcome {
        self.route().await
    }

    /// Push `url` and re-evaluate.
    pub async fn navigate_to(&self, url: &str) -> RouteOutcome {
        debug!(url, "Navigate");
        self.inner.history.push(url);
        self.route().await
    }

    pub async fn back(&self) -> Option<RouteOutcome> {
        self.traverse(self.inner.history.back()).await
    }

    pub async fn forward(&self) -> Option<RouteOutcome> {
        self.traverse(self.inner.history.forward()).await
    }

    async fn traverse(&self, traversal: Traversal) -> Option<RouteOutcome> {
        match traversal {
            Traversal::Moved => Some(self.route().await),
            // popstate will call route()
            Traversal::Pending => None,
            Traversal::AtEdge => None,
        }
    }

    /// Evaluate the current location and mount the result.
    pub async fn route(&self) -> RouteOutcome {
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        let mut attempted = None;

        for _ in 0..=MAX_REDIRECTS {
            let location = self.inner.history.location();
            match self.decide(&location, generation).await {
                Decision::Stale => {
                    debug!(generation, path = %location.path, "Route superseded");
                    return RouteOutcome::Superseded;
                }
                Decision::Redirect(target) => {
                    debug!(from = %location.path, to = target, "Redirect");
                    if target == NOT_FOUND_PATH {
                        attempted = Some(location.to_url());
                    }
                    self.inner.history.push(target);
                }
                Decision::Login => {
                    self.show(Screen::Login(LoginView::default()));
                    return RouteOutcome::Login;
                }
                Decision::NotFound => {
                    self.show(Screen::NotFound(NotFoundView { attempted }));
                    return RouteOutcome::NotFound;
                }
                Decision::Dashboard(spec, location) => {
                    let role = spec.role;
                    self.mount_dashboard(spec, location, generation).await;
                    return RouteOutcome::Dashboard(role);
                }
            }
        }

        error!(path = %self.location().path, "Redirect loop, showing not-found");
        self.show(Screen::NotFound(NotFoundView::default()));
        RouteOutcome::NotFound
    }

    async fn decide(&self, location: &Location, generation: u64) -> Decision {
        let spec = match self.inner.routes.lookup(&location.path) {
            Some(Target::Login) => return Decision::Login,
            Some(Target::NotFound) => return Decision::NotFound,
            Some(Target::Dashboard(spec)) => spec.clone(),
            None => return Decision::Redirect(NOT_FOUND_PATH),
        };

        let session = self.inner.gate.check_auth().await;
        if self.inner.generation.get() != generation {
            return Decision::Stale;
        }
        if !session.is_authenticated {
            return Decision::Redirect(LOGIN_PATH);
        }

        let expected = location.leading_segment();
        match session.role {
            Some(role) if role.as_str() == expected => Decision::Dashboard(spec, location.clone()),
            role => {
                warn!(?role, path = %location.path, "Role does not match route");
                Decision::Redirect(NOT_FOUND_PATH)
            }
        }
    }

    /// Mount a non-dashboard screen, discarding any active dashboard.
    fn show(&self, screen: Screen) {
        self.inner.active.borrow_mut().take();
        let token = self.inner.surface.claim();
        self.inner.surface.mount(token, screen);
    }

    async fn mount_dashboard(&self, spec: Rc<DashboardSpec>, location: Location, generation: u64) {
        let ctx = SectionContext::new(self.inner.data.clone(), location.query);
        let controller = Rc::new(Mutex::new(DashboardController::new(
            spec.clone(),
            ctx,
            self.inner.surface.clone(),
        )));

        // dropping the previous controller discards its sections
        self.inner.active.borrow_mut().replace(ActiveDashboard {
            generation,
            controller: controller.clone(),
        });
        info!(role = %spec.role, generation, "Mounting dashboard");

        controller.lock().await.mount().await;
    }

    /// Resolve a UI event against the surface bindings and act on it.
    pub async fn handle(&self, event: UiEvent) {
        let Some(action) = self.inner.surface.resolve(&event) else {
            debug!(element = %event.element, "No binding for element");
            return;
        };

        match action {
            Action::Login => {
                let email = event.values.get("email").map(|s| s.trim()).unwrap_or("");
                let password = event.values.get("password").map(String::as_str).unwrap_or("");
                self.login(email, password).await;
            }
            Action::Back => {
                self.back().await;
            }
            action => {
                let Some(controller) = self.active_controller() else {
                    debug!(?action, "No active dashboard");
                    return;
                };
                let outcome = controller.lock().await.apply(action).await;
                if outcome == Outcome::Logout {
                    self.logout().await;
                }
            }
        }
    }

    /// Log in and land on the role's dashboard; failures re-show the login
    /// view with a message.
    pub async fn login(&self, email: &str, password: &str) -> RouteOutcome {
        if email.is_empty() || password.is_empty() {
            return self.login_failed("Please enter your email and password");
        }

        if let Err(e) = self.inner.auth.login(email, password).await {
            warn!(error = %e, "Login rejected");
            let message = match e {
                ApiError::Unauthorized => "Invalid email or password".to_string(),
                other => other.user_message(),
            };
            return self.login_failed(&message);
        }

        let session = self.inner.gate.check_auth().await;
        match session.landing_url() {
            Some(url) => {
                info!(role = ?session.role, "Logged in");
                self.navigate_to(&url).await
            }
            None => self.login_failed("Your account has no dashboard"),
        }
    }

    fn login_failed(&self, message: &str) -> RouteOutcome {
        self.show(Screen::Login(LoginView {
            error: Some(message.to_string()),
        }));
        RouteOutcome::Login
    }

    /// Drop the dashboard, end the server session and return to `/`.
    pub async fn logout(&self) -> RouteOutcome {
        if let Some(active) = self.inner.active.borrow_mut().take() {
            debug!(generation = active.generation, "Discarding dashboard on logout");
        }
        if let Err(e) = self.inner.auth.logout().await {
            warn!(error = %e, "Server logout failed");
        }
        self.navigate_to(LOGIN_PATH).await
    }

    /// Re-route on browser back/forward for the lifetime of the page.
    #[cfg(target_arch = "wasm32")]
    pub fn listen_popstate(&self) {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let Some(window) = web_sys::window() else {
            return;
        };
        let portal = self.clone();
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            let portal = portal.clone();
            wasm_bindgen_futures::spawn_local(async move {
                portal.route().await;
            });
        });
        if let Err(e) =
            window.add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref())
        {
            warn!(error = ?e, "Could not listen for popstate");
        }
        // page-lifetime listener
        callback.forget();
    }
}
