//! The listing draft and its editable fields.

use std::fmt;
use std::str::FromStr;

use dreamhome_protocol::{DealType, ListingPayload, UploadedImage};

use crate::error::FieldError;

/// The in-progress listing record.
///
/// Defaults mirror a blank creation form: a rental with one bedroom, one
/// bathroom and a regular price of 50.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub address: String,
    pub deal_type: DealType,
    pub parking: bool,
    pub furnished: bool,
    pub has_offer: bool,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub regular_price: f64,
    pub discount_price: f64,
    pub images: Vec<UploadedImage>,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            address: String::new(),
            deal_type: DealType::Rent,
            parking: false,
            furnished: false,
            has_offer: false,
            bedrooms: 1,
            bathrooms: 1,
            regular_price: 50.0,
            discount_price: 0.0,
            images: Vec::new(),
        }
    }
}

impl ListingDraft {
    /// Builds the create-listing request body for the given user.
    pub fn to_payload(&self, user_ref: &str) -> ListingPayload {
        ListingPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            address: self.address.clone(),
            deal_type: self.deal_type,
            parking: self.parking,
            furnished: self.furnished,
            offer: self.has_offer,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            regular_price: self.regular_price,
            discount_price: self.discount_price,
            image_urls: self.images.clone(),
            user_ref: user_ref.to_string(),
        }
    }
}

/// An editable scalar field of the draft, named by its form id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingField {
    Name,
    Description,
    Address,
    /// Selects the sale deal type.
    Sale,
    /// Selects the rent deal type.
    Rent,
    /// Sets the deal type from a `"sale"` / `"rent"` value.
    DealType,
    Parking,
    Furnished,
    Offer,
    Bedrooms,
    Bathrooms,
    RegularPrice,
    DiscountPrice,
}

impl ListingField {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingField::Name => "name",
            ListingField::Description => "description",
            ListingField::Address => "address",
            ListingField::Sale => "sale",
            ListingField::Rent => "rent",
            ListingField::DealType => "type",
            ListingField::Parking => "parking",
            ListingField::Furnished => "furnished",
            ListingField::Offer => "offer",
            ListingField::Bedrooms => "bedrooms",
            ListingField::Bathrooms => "bathrooms",
            ListingField::RegularPrice => "regularPrice",
            ListingField::DiscountPrice => "discountPrice",
        }
    }
}

impl fmt::Display for ListingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "name" => ListingField::Name,
            "description" => ListingField::Description,
            "address" => ListingField::Address,
            "sale" => ListingField::Sale,
            "rent" => ListingField::Rent,
            "type" | "dealType" => ListingField::DealType,
            "parking" => ListingField::Parking,
            "furnished" => ListingField::Furnished,
            "offer" | "hasOffer" => ListingField::Offer,
            "bedrooms" => ListingField::Bedrooms,
            "bathrooms" => ListingField::Bathrooms,
            "regularPrice" => ListingField::RegularPrice,
            "discountPrice" => ListingField::DiscountPrice,
            other => return Err(FieldError::UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

/// Raw input for a field update, as a form control would deliver it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Number(f64::from(v))
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Flag(v)
    }
}

impl FieldValue {
    /// Text form of the value.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Flag(b) => b.to_string(),
        }
    }

    /// Numeric coercion. Blank text counts as zero.
    pub fn to_number(&self, field: ListingField) -> Result<f64, FieldError> {
        let n = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Flag(b) => f64::from(u8::from(*b)),
            FieldValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse::<f64>().map_err(|_| FieldError::NotANumber {
                        field: field.to_string(),
                        value: s.to_string(),
                    })?
                }
            }
        };
        if n.is_finite() {
            Ok(n)
        } else {
            Err(FieldError::NotANumber {
                field: field.to_string(),
                value: self.to_text(),
            })
        }
    }

    /// Boolean coercion, accepting checkbox-style text.
    pub fn to_flag(&self, field: ListingField) -> Result<bool, FieldError> {
        match self {
            FieldValue::Flag(b) => Ok(*b),
            FieldValue::Number(n) => Ok(*n != 0.0),
            FieldValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" | "checked" => Ok(true),
                "false" | "off" | "no" | "0" | "" => Ok(false),
                _ => Err(FieldError::NotABoolean {
                    field: field.to_string(),
                    value: s.clone(),
                }),
            },
        }
    }

    /// Non-negative whole-number coercion for room counts.
    pub fn to_count(&self, field: ListingField) -> Result<u32, FieldError> {
        let n = self.to_number(field)?;
        if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
            return Err(FieldError::OutOfRange {
                field: field.to_string(),
                value: n,
            });
        }
        Ok(n as u32)
    }

    /// Non-negative coercion for prices.
    pub fn to_price(&self, field: ListingField) -> Result<f64, FieldError> {
        let n = self.to_number(field)?;
        if n < 0.0 {
            return Err(FieldError::OutOfRange {
                field: field.to_string(),
                value: n,
            });
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_blank_form() {
        let d = ListingDraft::default();
        assert_eq!(d.deal_type, DealType::Rent);
        assert_eq!((d.bedrooms, d.bathrooms), (1, 1));
        assert_eq!(d.regular_price, 50.0);
        assert_eq!(d.discount_price, 0.0);
        assert!(!d.has_offer && !d.parking && !d.furnished);
        assert!(d.images.is_empty());
    }

    #[test]
    fn field_ids_roundtrip() {
        for id in [
            "name",
            "description",
            "address",
            "sale",
            "rent",
            "type",
            "parking",
            "furnished",
            "offer",
            "bedrooms",
            "bathrooms",
            "regularPrice",
            "discountPrice",
        ] {
            let field: ListingField = id.parse().unwrap();
            assert_eq!(field.as_str(), id);
        }
        assert_eq!("hasOffer".parse::<ListingField>().unwrap(), ListingField::Offer);
        assert!(matches!(
            "garage".parse::<ListingField>(),
            Err(FieldError::UnknownField(_))
        ));
    }

    #[test]
    fn number_coercion() {
        let f = ListingField::RegularPrice;
        assert_eq!(FieldValue::from(" 1200.5 ").to_number(f).unwrap(), 1200.5);
        assert_eq!(FieldValue::from("").to_number(f).unwrap(), 0.0);
        assert_eq!(FieldValue::from(true).to_number(f).unwrap(), 1.0);
        assert!(FieldValue::from("abc").to_number(f).is_err());
        assert!(FieldValue::Number(f64::NAN).to_number(f).is_err());
    }

    #[test]
    fn count_coercion_rejects_fractions_and_negatives() {
        let f = ListingField::Bedrooms;
        assert_eq!(FieldValue::from("3").to_count(f).unwrap(), 3);
        assert!(FieldValue::from("2.5").to_count(f).is_err());
        assert!(FieldValue::from("-1").to_count(f).is_err());
    }

    #[test]
    fn flag_coercion() {
        let f = ListingField::Parking;
        assert!(FieldValue::from("on").to_flag(f).unwrap());
        assert!(!FieldValue::from("").to_flag(f).unwrap());
        assert!(FieldValue::from(2.0).to_flag(f).unwrap());
        assert!(FieldValue::from("maybe").to_flag(f).is_err());
    }

    #[test]
    fn payload_carries_user_and_offer_flag() {
        let draft = ListingDraft {
            has_offer: true,
            ..ListingDraft::default()
        };
        let payload = draft.to_payload("u42");
        assert!(payload.offer);
        assert_eq!(payload.user_ref, "u42");
        assert_eq!(payload.deal_type, DealType::Rent);
    }
}
