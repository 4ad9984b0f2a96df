//! JSA workflow test suite.
//!
//! Drives the HTTP API and the aggregate persistence layer against a SQLite
//! database file in a temporary directory; attachments land in the same
//! directory.
//!
//! Run with: cargo test --test jsa_workflow


mod test_auth;
mod test_delete;
mod test_persistence;
mod test_update;
