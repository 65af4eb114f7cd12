//! Self-hosted artist engagement analytics.
//!
//! Computes two views over a catalog of artists, users, visits, and raw
//! interaction events: per-artist visit totals, and per-artist engagement
//! scores bucketed by each user's own local hour of day. The pipeline in
//! [`pipeline`] does the work; [`storage`] holds the embedded DuckDB
//! tables it reads; [`server`] exposes both views (and the recording
//! endpoints that populate the tables) over HTTP.

pub mod api;
pub mod config;
pub mod pipeline;
pub mod server;
pub mod storage;
