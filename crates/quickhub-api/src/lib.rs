// quickhub-api: Async Rust client for the Home Center hub REST API

pub mod client;
pub mod error;
pub mod models;
pub mod provider;
pub mod transport;

pub mod devices;
pub mod events;
pub mod files;

pub use client::HubClient;
pub use error::Error;
pub use provider::{ConfigProvider, ConnectionInfo, StaticProvider};
pub use transport::TransportConfig;
