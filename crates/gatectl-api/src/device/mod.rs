// Device API surface
//
// `client` holds the transport primitive; the other modules add one
// inherent method per endpoint on `DeviceClient`.

pub mod auth;
pub mod client;
pub mod config;
pub mod system;

pub use client::{DeviceClient, Payload, RequestBody};
