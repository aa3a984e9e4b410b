pub mod async_client;
pub mod client;
pub mod config;
pub mod testing;

pub use async_client::AsyncLineClient;
pub use client::{Connection, LineClient};
pub use config::{ClientConfig, Error};
