//! Remote generator backend

pub mod client;

pub use client::GeneratorClient;
