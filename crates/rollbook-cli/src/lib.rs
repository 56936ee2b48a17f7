//! # Rollbook CLI
//!
//! Database seeding utilities for Rollbook testing and development.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use rollbook_cli::seeder::{SeedConfig, seed_students};
//!
//! let config = SeedConfig::new(200);
//! seed_students(&pool, &config).await?;
//! ```

pub mod seeder;
