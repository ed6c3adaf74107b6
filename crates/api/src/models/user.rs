//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use orchard_core::{Email, UserId};

/// A storefront user (domain type).
///
/// The password hash never leaves the `db` layer; this type is safe to
/// serialize into API responses.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Avatar image URL.
    pub avatar: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
