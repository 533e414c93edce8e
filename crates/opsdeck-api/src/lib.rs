// opsdeck-api: Async Rust client for the opsdeck console HTTP API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::AdminClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
