//! # Wallet pass server
//! This module hosts the server side of the wallet pass gateway. It is responsible for:
//! Listening for incoming reservation requests from the booking system.
//! Bringing the corresponding remote pass object in line with the reservation.
//! Issuing a signed save-to-wallet link for the pass.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/`: A hello route, kept for upstream health probes.
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/wallet`: Accepts a reservation JSON body and responds with the save token and deep link.

pub mod cli;
pub mod config;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
