//! Shared UI components.

pub mod form;
pub mod layout;
pub mod nav;
pub mod section;

pub use form::FormView;
pub use layout::DashboardShell;
pub use nav::Sidebar;
pub use section::{SectionView, TriggerButton};
