/// Database layer
///
/// # Modules
///
/// - `pool`: SQLite connection pool with health check
/// - `migrations`: Embedded migration runner
///
/// Models are in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
