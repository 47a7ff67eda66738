//! Business logic that spans repositories: accounts, checkout, notifications.

pub mod auth;
pub mod checkout;
pub mod notify;
