//! Pixrelay - webhook relay between PIX payment gateways and the Utmify
//! sales-attribution platform.
//!
//! Approved transactions from LiraPay and VoltPag are authenticated,
//! normalized into one outbound order shape, and forwarded. Everything else
//! is acknowledged and dropped.

pub mod alerts;
pub mod attribution;
pub mod config;
pub mod error;
pub mod handlers;
pub mod normalize;
pub mod state;
