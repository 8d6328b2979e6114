//! Backend and embeddable client for a small customer-support chat widget.

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod routes;
pub mod services;
pub mod state;
