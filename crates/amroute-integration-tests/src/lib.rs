//! End-to-end integration tests for amroute
//!
//! These tests wire the migration, provisioning and file-backed store crates
//! together and exercise them the way the CLI does. See `tests/`.
