//! Form state: the draft, the staged files, and submit-time validation.

use std::collections::HashSet;

use dreamhome_protocol::constants::MAX_LISTING_IMAGES;
use dreamhome_protocol::{DealType, UploadedImage};
use dreamhome_upload::{RejectReason, SelectedFile, StagedFile, validate_image};
use tracing::{debug, warn};

use crate::draft::{FieldValue, ListingDraft, ListingField};
use crate::error::{FieldError, ValidationFailure};

const NAME_MIN_CHARS: usize = 10;
const NAME_MAX_CHARS: usize = 62;
const ROOMS_MIN: u32 = 1;
const ROOMS_MAX: u32 = 10;
const PRICE_MIN: f64 = 50.0;
const PRICE_MAX: f64 = 10_000_000.0;

/// Result of staging a selection: which files were kept and why the rest
/// were not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutcome {
    /// Ids of the newly staged files, in selection order.
    pub accepted: Vec<String>,
    pub rejected: Vec<RejectReason>,
}

impl StageOutcome {
    /// One displayable message per rejected file.
    pub fn messages(&self) -> Vec<String> {
        self.rejected.iter().map(ToString::to_string).collect()
    }
}

/// Owner of the listing draft and the files staged for upload.
#[derive(Debug, Clone, Default)]
pub struct ListingForm {
    draft: ListingDraft,
    staged: Vec<StagedFile>,
}

impl ListingForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn staged(&self) -> &[StagedFile] {
        &self.staged
    }

    pub fn images(&self) -> &[UploadedImage] {
        &self.draft.images
    }

    /// How many more files may be staged before the image cap is hit.
    pub fn remaining_capacity(&self) -> usize {
        MAX_LISTING_IMAGES.saturating_sub(self.draft.images.len() + self.staged.len())
    }

    /// Filters a selection into the staged set.
    ///
    /// Each file is checked in order for type and size, then for a
    /// duplicate id, then against the remaining capacity. Rejections are
    /// collected; this never fails as a whole.
    pub fn stage_files(&mut self, selection: Vec<SelectedFile>) -> StageOutcome {
        let mut outcome = StageOutcome::default();
        let mut known: HashSet<String> = self
            .staged
            .iter()
            .map(|f| f.id.clone())
            .chain(self.draft.images.iter().map(|i| i.id.clone()))
            .collect();

        for file in selection {
            if let Err(reason) = validate_image(&file.name, &file.content_type, file.size) {
                warn!(file = reason.file_name(), %reason, "file not staged");
                outcome.rejected.push(reason);
                continue;
            }

            let id = file.id();
            if known.contains(&id) {
                outcome
                    .rejected
                    .push(RejectReason::Duplicate { name: file.name });
                continue;
            }

            if self.remaining_capacity() == 0 {
                warn!(file = %file.name, max = MAX_LISTING_IMAGES, "image limit reached");
                outcome.rejected.push(RejectReason::limit_reached(file.name));
                continue;
            }

            debug!(file = %id, "staged");
            known.insert(id.clone());
            outcome.accepted.push(id);
            self.staged.push(StagedFile::from(file));
        }

        outcome
    }

    /// Appends uploaded images in order, skipping ids already present.
    ///
    /// Merged ids leave the staged set. Returns how many images were added.
    pub fn merge_uploaded(&mut self, images: Vec<UploadedImage>) -> usize {
        let mut added = 0;
        for image in images {
            self.staged.retain(|f| f.id != image.id);
            if self.draft.images.iter().any(|i| i.id == image.id) {
                continue;
            }
            self.draft.images.push(image);
            added += 1;
        }
        added
    }

    /// Drops a staged file by id. Returns whether anything was removed.
    pub fn remove_staged(&mut self, id: &str) -> bool {
        let before = self.staged.len();
        self.staged.retain(|f| f.id != id);
        self.staged.len() != before
    }

    /// Removes an uploaded image by position; later images shift down.
    pub fn remove_uploaded(&mut self, index: usize) -> Option<UploadedImage> {
        (index < self.draft.images.len()).then(|| self.draft.images.remove(index))
    }

    /// Updates one scalar field of the draft by its form id.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FieldError> {
        let field: ListingField = name.parse()?;
        self.set(field, value.into())
    }

    pub fn set(&mut self, field: ListingField, value: FieldValue) -> Result<(), FieldError> {
        let draft = &mut self.draft;
        match field {
            ListingField::Name => draft.name = value.to_text(),
            ListingField::Description => draft.description = value.to_text(),
            ListingField::Address => draft.address = value.to_text(),
            // The radio id carries the choice; the value is irrelevant.
            ListingField::Sale => draft.deal_type = DealType::Sale,
            ListingField::Rent => draft.deal_type = DealType::Rent,
            ListingField::DealType => {
                let text = value.to_text();
                draft.deal_type = text
                    .trim()
                    .parse()
                    .map_err(|_| FieldError::InvalidDealType(text))?;
            }
            ListingField::Parking => draft.parking = value.to_flag(field)?,
            ListingField::Furnished => draft.furnished = value.to_flag(field)?,
            ListingField::Offer => draft.has_offer = value.to_flag(field)?,
            ListingField::Bedrooms => draft.bedrooms = value.to_count(field)?,
            ListingField::Bathrooms => draft.bathrooms = value.to_count(field)?,
            ListingField::RegularPrice => draft.regular_price = value.to_price(field)?,
            ListingField::DiscountPrice => draft.discount_price = value.to_price(field)?,
        }
        Ok(())
    }

    /// Checks the draft for submission, reporting the first violated rule.
    pub fn validate_for_submit(&self) -> Result<(), ValidationFailure> {
        let d = &self.draft;

        if d.images.is_empty() {
            return Err(ValidationFailure::NoImages);
        }
        if d.images.len() > MAX_LISTING_IMAGES {
            return Err(ValidationFailure::TooManyImages {
                count: d.images.len(),
                max: MAX_LISTING_IMAGES,
            });
        }
        if d.has_offer && d.discount_price >= d.regular_price {
            return Err(ValidationFailure::DiscountNotLower {
                regular: d.regular_price,
                discount: d.discount_price,
            });
        }

        let name_len = d.name.trim().chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            return Err(ValidationFailure::NameLength { len: name_len });
        }
        if d.description.trim().is_empty() {
            return Err(ValidationFailure::MissingDescription);
        }
        if d.address.trim().is_empty() {
            return Err(ValidationFailure::MissingAddress);
        }
        if !(ROOMS_MIN..=ROOMS_MAX).contains(&d.bedrooms) {
            return Err(ValidationFailure::Bedrooms(d.bedrooms));
        }
        if !(ROOMS_MIN..=ROOMS_MAX).contains(&d.bathrooms) {
            return Err(ValidationFailure::Bathrooms(d.bathrooms));
        }
        // An offered discount is already below the regular price, which is
        // capped here, so it needs no cap of its own.
        if !(PRICE_MIN..=PRICE_MAX).contains(&d.regular_price) {
            return Err(ValidationFailure::RegularPriceRange(d.regular_price));
        }

        Ok(())
    }
}
