//! Image host client used to persist listing photos and avatars.
//!
//! Talks to the Cloudinary unsigned upload endpoint. The request body is
//! streamed so callers can observe how many bytes have been handed to the
//! transport.

pub mod client;
pub mod types;

pub use client::{Client, Error};
pub use types::{ErrorResponse, UploadResponse};
