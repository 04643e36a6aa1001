//! Business logic for the institute backend.
//!
//! Services sit between the HTTP layer and the repositories: they validate
//! input, enforce the enquiry workflow rules and assemble the admin
//! dashboard.

pub mod services;

pub use services::*;
