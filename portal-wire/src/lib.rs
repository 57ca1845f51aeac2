//! Shared wire protocol types for the Distribution System.
//!
//! This crate defines the types that cross the boundary between:
//! - the Distribution API (Express + Prisma) - the producer
//! - the distribution portal - the navigation/dashboard client
//!
//! # Modules
//! - [`auth`] - auth-check and login payloads
//! - [`role`] - the closed set of dashboard roles
//! - [`records`] - business records the portal interprets beyond raw JSON

pub mod auth;
pub mod records;
pub mod role;

// Re-export commonly used types at crate root
pub use auth::{CheckAuthResponse, LoginRequest, SessionUser};
pub use records::{
    join_profiles, to_cents, AccountRecord, DriverProfile, Payment, PaymentStatus, RoleProfile,
    SalesOrder, StaffMember, VerificationStatus,
};
pub use role::{Role, UnknownRole};
