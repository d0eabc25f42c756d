//! External try-on service boundary: binary upload, garment generation from
//! text, and the try-on composition call.

mod client;
mod service;

pub use client::FalClient;
pub use service::TryOnService;
