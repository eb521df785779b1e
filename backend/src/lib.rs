//! Recipe API backend
//!
//! Library half of the server binary; the integration tests build the router
//! from here.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
