pub mod core;

pub use core::{connect, orchestrate_migration, run_migration, sanitize_db_url};
