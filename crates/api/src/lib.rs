//! Client for the Dream Home REST API.
//!
//! [`ApiClient`] keeps the `access_token` cookie set by sign-in, so every
//! later request made through the same client is authenticated.
//! [`SessionStore`] tracks who is signed in.

mod client;
mod session;

pub use client::{ApiClient, ApiError};
pub use session::{SessionState, SessionStore};
