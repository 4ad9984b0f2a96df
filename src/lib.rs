//! EHS dashboard server library.
//!
//! Job safety analyses (a record plus its ordered steps and an optional
//! attachment), the locations and employees they reference, and the session
//! auth guarding them.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
pub mod validation;
