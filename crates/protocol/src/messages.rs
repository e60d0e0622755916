use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/signin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Account summary embedded in the signup response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedUpUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// Response of a successful signup (HTTP 201).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub message: String,
    pub user: SignedUpUser,
}

/// The record returned by a successful listing creation.
///
/// Only the server-assigned identifier is required; the remaining fields
/// echo the submitted payload and are not interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedListing {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_response_parses() {
        let json = r#"{"message":"User created successfully",
            "user":{"id":"665f","username":"ana","email":"ana@example.com"}}"#;
        let resp: SignUpResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.user.id, "665f");
        assert_eq!(resp.message, "User created successfully");
    }

    #[test]
    fn created_listing_requires_id() {
        let ok: CreatedListing =
            serde_json::from_str(r#"{"_id":"l1","name":"Flat","bedrooms":2}"#).unwrap();
        assert_eq!(ok.id, "l1");
        assert!(serde_json::from_str::<CreatedListing>(r#"{"name":"Flat"}"#).is_err());
    }
}
