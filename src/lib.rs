//! Reverse-proxy configuration admin service.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 PROXY ADMIN                   │
//!   HTTP request       │  ┌────────┐    ┌────────┐    ┌────────────┐   │
//!   ───────────────────┼─▶│  http  │───▶│ admin  │───▶│   sites    │───┼──▶ conf.d/*.conf
//!                      │  │ server │    │ routes │    │   store    │   │    conf.d/locations/*.conf
//!                      │  └────────┘    └───┬────┘    └────────────┘   │
//!                      │                    │         ┌────────────┐   │
//!                      │                    └────────▶│   reload   │───┼──▶ reload command
//!                      │                              │  command   │   │    (e.g. nginx -s reload)
//!                      │                              └────────────┘   │
//!                      │  config · observability · lifecycle           │
//!                      └──────────────────────────────────────────────┘
//! ```

pub mod admin;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod reload;
pub mod sites;

pub use config::AdminServiceConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
