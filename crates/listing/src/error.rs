//! Listing error types.

/// First violated submit-time rule of a draft.
///
/// Variants are listed in the order they are checked.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("You must upload at least one image")]
    NoImages,

    #[error("You can only upload up to {max} images (have {count})")]
    TooManyImages { count: usize, max: usize },

    #[error("Discount price must be lower than regular price")]
    DiscountNotLower { regular: f64, discount: f64 },

    #[error("Name must be between 10 and 62 characters")]
    NameLength { len: usize },

    #[error("Description is required")]
    MissingDescription,

    #[error("Address is required")]
    MissingAddress,

    #[error("Bedrooms must be between 1 and 10")]
    Bedrooms(u32),

    #[error("Bathrooms must be between 1 and 10")]
    Bathrooms(u32),

    #[error("Regular price must be between 50 and 10000000")]
    RegularPriceRange(f64),
}

/// Rejected field update.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("{field}: {value:?} is not a number")]
    NotANumber { field: String, value: String },

    #[error("{field}: {value:?} is not a yes/no value")]
    NotABoolean { field: String, value: String },

    #[error("{field}: {value} is out of range")]
    OutOfRange { field: String, value: f64 },

    #[error("unknown deal type: {0}")]
    InvalidDealType(String),
}

/// Errors produced while submitting a listing.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("you must be signed in to create a listing")]
    NotSignedIn,

    #[error("Network or connection error: {0}")]
    NetworkFailure(String),

    #[error("{message}")]
    ServerRejected { status: u16, message: String },

    #[error("unexpected server response: {0}")]
    ResponseParseFailure(String),
}
