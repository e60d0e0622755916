//! Listing creation: the draft being edited, its validation rules, and the
//! client that submits it.
//!
//! This crate has no transport of its own. The app provides a
//! [`ListingApi`] implementation that performs the actual HTTP request.

pub mod draft;
pub mod error;
pub mod form;
pub mod submit;

pub use draft::{FieldValue, ListingDraft, ListingField};
pub use error::{FieldError, SubmitError, ValidationFailure};
pub use form::{ListingForm, StageOutcome};
pub use submit::{ListingApi, ListingSubmitter, RawResponse, classify_create_response};
