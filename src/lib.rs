//! Persistent data layer for a fitness tracker: users, an exercise catalog, routines of
//! ordered exercises, and logged workout sessions, stored in SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod validation;
pub mod version;
