use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a listing is offered for sale or for rent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealType {
    Sale,
    #[default]
    Rent,
}

impl DealType {
    pub fn as_str(self) -> &'static str {
        match self {
            DealType::Sale => "sale",
            DealType::Rent => "rent",
        }
    }
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sale" => Ok(DealType::Sale),
            "rent" => Ok(DealType::Rent),
            other => Err(format!("unknown deal type: {other}")),
        }
    }
}

/// An image that has been persisted on the image host.
///
/// Serialized as one entry of the listing's `imageUrls` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub id: String,
    pub url: String,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A signed-in account as returned by `/api/auth/signin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Request body of `POST /api/listing/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPayload {
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub deal_type: DealType,
    pub parking: bool,
    pub furnished: bool,
    pub offer: bool,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub regular_price: f64,
    pub discount_price: f64,
    pub image_urls: Vec<UploadedImage>,
    pub user_ref: String,
}
