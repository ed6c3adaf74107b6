//! Business logic services.
//!
//! Services sit between the HTTP routes and the repositories: they own
//! validation and policy (password rules, token issuance, order totals)
//! while the `db` layer owns persistence. Routes construct services per
//! request from the shared pool.

pub mod auth;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutService, OrderTotals};
