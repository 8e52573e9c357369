//! Shared test utilities for the ini-manager workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`fixture`]: [`IniFixture`](fixture::IniFixture), a temporary directory of INI files
//! - [`logging`]: tracing subscriber for test runs
pub mod fixture;
pub mod logging;
