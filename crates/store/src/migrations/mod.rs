//! Schema migrations
//!
//! The schema history is compiled into the binary ([`schema::MIGRATIONS`]) so
//! the container image needs nothing beyond the executable to upgrade a
//! database. Each migration carries SQL for every supported dialect.

pub mod definitions;
pub mod runner;
pub mod schema;

pub use definitions::*;
pub use runner::MigrationRunner;
pub use schema::MIGRATIONS;
