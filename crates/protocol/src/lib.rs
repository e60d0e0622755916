//! Wire types shared by the Dream Home clients.
//!
//! Everything here mirrors the JSON exchanged with the listing REST API
//! and the image host. No I/O lives in this crate.

pub mod constants;
pub mod envelope;
pub mod messages;
pub mod types;

// Re-export primary types for convenience.
pub use envelope::{ApiFailure, ApiReply};
pub use messages::{
    CreatedListing, SignInRequest, SignUpRequest, SignUpResponse, SignedUpUser,
};
pub use types::{DealType, ListingPayload, UploadedImage, User};
