//! Full-screen pages outside the dashboards.

mod login;
mod not_found;

pub use login::LoginPage;
pub use not_found::NotFoundPage;
