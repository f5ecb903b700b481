//! MAOP console: a small web gateway in front of the MAOP agent platform.
//!
//! The gateway serves a single-page console for creating, editing and
//! publishing tools and agents, and one JSON route (`POST /api/maop`) that
//! forwards a named action to the platform client.
//!
//! ```text
//! browser ──POST /api/maop {action, payload}──▶ gateway ──▶ proxy::ActionProxy
//!                                                               │
//!                                                               ▼
//!                                                     maop::MaopApi (MaopClient)
//!                                                               │
//!                                                               ▼
//!                                                      external MAOP platform
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod maop;
pub mod proxy;
pub mod testing;

pub use config::Config;
pub use error::{ConfigError, GatewayError, MaopError, ProxyError};
