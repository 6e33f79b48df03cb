//! Integration test suite for bfup
//!
//! End-to-end tests that run the `bfup` binary against temporary profile,
//! backup and config directories. Upstream is replaced by a local `wiremock`
//! server wired in through the `[remote]` config table, so nothing here
//! touches the network or the real Firefox directory.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **backup**: `bfup backup`, retention and precondition failures
//! - **config**: `bfup config` subcommands and broken settings files
//! - **profiles**: `bfup profiles` against hand-written `profiles.ini` files
//! - **update**: `bfup check` and `bfup update` against a mock upstream

mod common;

mod backup;
mod config;
mod profiles;
mod update;
