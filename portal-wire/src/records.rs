//! Business records the portal reads from the Distribution API.
//!
//! Only the records whose fields the portal interprets are typed here. Every
//! other resource travels as plain `serde_json::Value`.
//!
//! The API serializes decimal columns as strings (`"3149.89"`), older rows use
//! plain numbers. [`decimal`] accepts both.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Deserialize helpers for API decimal columns.
pub mod decimal {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Raw::Number(n)) => Ok(Some(n)),
            Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
        }
    }
}

/// Convert a currency amount to integer cents.
///
/// Amount equality is decided in cents so that `49.9` and `"49.90"` agree.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

// =============================================================================
// Sales orders and payments
// =============================================================================

/// A sales order as returned by `/api/sales-orders`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    pub id: i64,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub subtotal: f64,
    #[serde(default, deserialize_with = "decimal::deserialize_opt")]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
}

impl SalesOrder {
    /// Amount a payment must cover. Partial payments are not accepted, so
    /// this is the whole subtotal until the order is paid.
    pub fn outstanding(&self) -> f64 {
        match self.payment_status {
            PaymentStatus::Paid => 0.0,
            PaymentStatus::Unpaid => self.subtotal,
        }
    }

    pub fn label(&self) -> String {
        match &self.order_number {
            Some(number) => number.clone(),
            None => format!("Order #{}", self.id),
        }
    }
}

/// Payment state of a sales order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

/// Verification state of a recorded payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

/// A payment as returned by `/api/payments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i64,
    pub sales_order_id: i64,
    #[serde(deserialize_with = "decimal::deserialize")]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub status: VerificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_order: Option<SalesOrder>,
}

// =============================================================================
// Accounts and role profiles
// =============================================================================

/// Generic user account (`/api/users`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// A role-specific record that extends an account.
///
/// Profiles point at their account by id when the API links them, and by
/// e-mail otherwise.
pub trait RoleProfile {
    fn profile_id(&self) -> i64;

    fn account_id(&self) -> Option<i64> {
        None
    }

    fn account_email(&self) -> Option<&str> {
        None
    }
}

/// Driver extension record (`/api/drivers`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RoleProfile for DriverProfile {
    fn profile_id(&self) -> i64 {
        self.id
    }

    fn account_id(&self) -> Option<i64> {
        self.user_id
    }

    fn account_email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// An account joined with its role profile.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffMember<P> {
    pub account: Option<AccountRecord>,
    pub profile: P,
}

impl<P: RoleProfile> StaffMember<P> {
    pub fn email(&self) -> Option<&str> {
        self.account
            .as_ref()
            .map(|a| a.email.as_str())
            .or_else(|| self.profile.account_email())
    }
}

/// Join every profile to its account, first by account id then by e-mail
/// (case-insensitive). Profiles without a matching account are kept with
/// `account: None`; accounts without a profile are dropped.
pub fn join_profiles<P: RoleProfile>(
    accounts: Vec<AccountRecord>,
    profiles: Vec<P>,
) -> Vec<StaffMember<P>> {
    let by_id: HashMap<i64, &AccountRecord> = accounts.iter().map(|a| (a.id, a)).collect();
    let by_email: HashMap<String, &AccountRecord> = accounts
        .iter()
        .map(|a| (a.email.to_lowercase(), a))
        .collect();

    profiles
        .into_iter()
        .map(|profile| {
            let account = profile
                .account_id()
                .and_then(|id| by_id.get(&id))
                .or_else(|| {
                    profile
                        .account_email()
                        .and_then(|email| by_email.get(&email.to_lowercase()))
                })
                .map(|a| (*a).clone());
            StaffMember { account, profile }
        })
        .collect()
}
