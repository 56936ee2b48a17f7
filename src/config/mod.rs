//! Configuration modules for the Rollbook API.
//!
//! Each submodule loads one concern from environment variables through a
//! `from_env()` constructor. Database settings live in `rollbook_db`.
//!
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen addresses for the API and metrics servers

pub mod cors;
pub mod server;
