//! # Auth Module
//!
//! Google sign-in: verifies the ID token sent by the client and records
//! the user on first (and every later) successful sign-in.

pub mod handlers;
pub mod models;
pub mod routes;


pub use routes::auth_routes;
