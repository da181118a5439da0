//! # tally-api
//!
//! The command surface as a REST API built with Axum: webhook event ingest
//! from the chat platform plus the administrator command endpoints, all
//! behind the server-authorization gate.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::run;
