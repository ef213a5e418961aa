//! Fieldowl server library.
//!
//! Exposes the service as a library so the pipeline, settlement, and
//! checkout logic can be tested without a running server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
