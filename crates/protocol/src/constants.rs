/// Maximum number of images a listing may carry.
pub const MAX_LISTING_IMAGES: usize = 6;

/// Largest image accepted for upload (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Content-type prefix every uploadable file must carry.
pub const IMAGE_CONTENT_PREFIX: &str = "image/";

/// Account creation endpoint.
pub const SIGN_UP_PATH: &str = "/api/auth/signup";

/// Credential sign-in endpoint. Sets the `access_token` cookie.
pub const SIGN_IN_PATH: &str = "/api/auth/signin";

/// Listing creation endpoint. Requires the `access_token` cookie.
pub const CREATE_LISTING_PATH: &str = "/api/listing/create";

/// Default base URL of the listing API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Message used when a failure envelope carries no message.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Request failed";
