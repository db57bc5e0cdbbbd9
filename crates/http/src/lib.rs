//! Calltrack HTTP client
//!
//! Typed access to the dashboard REST API (authentication, call logs,
//! notifications) and to the reference product/customer catalog. Session
//! handling lives one layer up; every authenticated call here takes the bearer
//! token it should present.

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::{AuthenticatedTrackClient, TrackClient, TrackClientBuilder};
