//! Real-time yes/no voting server.
//!
//! Requests are authorized against the external identity service, applied to
//! the in-memory [`session_store::SessionStore`] (written through to Redis) and
//! pushed to every WebSocket subscriber by the [`broadcast_hub::BroadcastHub`].

pub mod authorization_gateway;
pub mod broadcast_hub;
pub mod config;
pub mod errors;
pub mod http;
pub mod identity;
pub mod models;
pub mod session_service;
pub mod session_store;
