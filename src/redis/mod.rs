pub mod client;

pub use client::create_client;
