//! Workspace root crate.
//!
//! Holds no logic of its own — it exists so the integration tests under
//! `tests/` can depend on every NetSIO crate by path, the same way the
//! teacher's root package depends on its device/protocol crates purely for
//! cross-crate test coverage.
