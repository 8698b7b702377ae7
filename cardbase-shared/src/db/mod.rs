/// Database access layer
///
/// This module provides connection pool management and migration utilities
/// for the PostgreSQL database backing cardbase.
///
/// # Modules
///
/// - `pool`: Connection pool creation and health checks
/// - `migrations`: Embedded migration runner

pub mod migrations;
pub mod pool;
