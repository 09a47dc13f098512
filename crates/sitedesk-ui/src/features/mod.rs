//! Feature modules for the dashboard.
pub mod auth;
