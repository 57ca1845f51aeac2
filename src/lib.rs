//! Distribution Portal
//!
//! Role-gated single-page front end for a product distribution system.
//!
//! This library provides:
//! - An auth gate that asks the backend who is logged in
//! - A path router that authorizes every navigation, including back/forward
//! - A dashboard controller reused by all nine roles
//! - Section units (tables, CRUD editors, payment flows) that render to a
//!   DOM-free view model
//! - Web UI (Dioxus + Tailwind CSS)

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

// Deny truly dangerous patterns (these will fail the build)
#![deny(unsafe_code)]
#![deny(unused_must_use)]

// Backend REST client and service traits
pub mod api;

// Dioxus UI app (WASM client)
pub mod app;

// Per-role dashboards and the controller that drives them
pub mod dashboard;

pub mod error;

// Auth gate, path router and navigation bridge
pub mod nav;

// Section units
pub mod sections;

// Render model and mounting surface
pub mod view;

// Native-only modules (excluded from WASM build)
#[cfg(not(target_arch = "wasm32"))]
pub mod config;

pub use portal_wire as wire;
