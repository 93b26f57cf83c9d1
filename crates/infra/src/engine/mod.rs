//! External simulation engine client

mod client;

pub use client::{EngineClient, EngineClientBuilder};
