//! Accounts, login sessions and role checks.

pub mod handlers;
pub mod password;
pub mod session;
pub mod store;
pub mod validation;
