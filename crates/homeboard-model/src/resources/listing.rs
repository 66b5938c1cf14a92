//! Property listings.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{joined, merge, non_empty};
use crate::access::{FieldAccess, Fields, SortValue};

/// Market state of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    #[default]
    Active,
    Pending,
    Sold,
    Rented,
    Inactive,
}

impl ListingStatus {
    pub const LABELS: &'static [&'static str] = &["Active", "Pending", "Sold", "Rented", "Inactive"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "Active",
            ListingStatus::Pending => "Pending",
            ListingStatus::Sold => "Sold",
            ListingStatus::Rented => "Rented",
            ListingStatus::Inactive => "Inactive",
        }
    }

    /// Whether the listing is still on the market.
    pub fn is_open(&self) -> bool {
        matches!(self, ListingStatus::Active | ListingStatus::Pending)
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(ListingStatus::Active),
            "PENDING" => Ok(ListingStatus::Pending),
            "SOLD" => Ok(ListingStatus::Sold),
            "RENTED" => Ok(ListingStatus::Rented),
            "INACTIVE" => Ok(ListingStatus::Inactive),
            _ => Err(format!("Unknown listing status: {s}")),
        }
    }
}

/// A property offered for sale or rent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Listing {
    pub title: String,
    pub description: String,
    pub city: String,
    pub address: String,
    /// "House", "Apartment", "Villa", "Land", ...
    pub property_type: String,
    /// "Sale" or "Rent".
    pub listing_type: String,
    pub status: ListingStatus,
    /// Asking price in whole currency units.
    pub price: u64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area_sqm: u32,
    pub agent: String,
    pub features: Vec<String>,
    pub available_from: Option<NaiveDate>,
}

/// Partial update for a [`Listing`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_sqm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_from: Option<NaiveDate>,
}

impl Fields for Listing {
    const RESOURCE: &'static str = "listing";
    const COLLECTION_KEY: &'static str = "listings";
    const DRAFT_KEY: &'static str = "listingDraft";

    type Patch = ListingPatch;

    fn apply_patch(&mut self, patch: &ListingPatch) {
        merge(&mut self.title, patch.title.as_ref());
        merge(&mut self.description, patch.description.as_ref());
        merge(&mut self.city, patch.city.as_ref());
        merge(&mut self.address, patch.address.as_ref());
        merge(&mut self.property_type, patch.property_type.as_ref());
        merge(&mut self.listing_type, patch.listing_type.as_ref());
        merge(&mut self.status, patch.status.as_ref());
        merge(&mut self.price, patch.price.as_ref());
        merge(&mut self.bedrooms, patch.bedrooms.as_ref());
        merge(&mut self.bathrooms, patch.bathrooms.as_ref());
        merge(&mut self.area_sqm, patch.area_sqm.as_ref());
        merge(&mut self.agent, patch.agent.as_ref());
        merge(&mut self.features, patch.features.as_ref());
        if patch.available_from.is_some() {
            self.available_from = patch.available_from;
        }
    }
}

impl FieldAccess for Listing {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "city", "address"];
    const CATEGORY_FIELDS: &'static [&'static str] =
        &["city", "propertyType", "listingType", "status", "agent", "bedrooms"];

    fn category_values(field: &str) -> Option<&'static [&'static str]> {
        match field {
            "status" => Some(ListingStatus::LABELS),
            _ => None,
        }
    }

    fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "title" => non_empty(&self.title),
            "description" => non_empty(&self.description),
            "city" => non_empty(&self.city),
            "address" => non_empty(&self.address),
            "propertyType" => non_empty(&self.property_type),
            "listingType" => non_empty(&self.listing_type),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "price" => Some(Cow::Owned(self.price.to_string())),
            "bedrooms" => Some(Cow::Owned(self.bedrooms.to_string())),
            "bathrooms" => Some(Cow::Owned(self.bathrooms.to_string())),
            "areaSqm" => Some(Cow::Owned(self.area_sqm.to_string())),
            "agent" => non_empty(&self.agent),
            "features" => joined(&self.features),
            "availableFrom" => self.available_from.map(|d| Cow::Owned(d.to_string())),
            _ => None,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        self.available_from
    }

    fn sort_value(&self, field: &str) -> Option<SortValue> {
        match field {
            "price" => Some(SortValue::Number(
                i64::try_from(self.price).unwrap_or(i64::MAX),
            )),
            "bedrooms" => Some(SortValue::Number(i64::from(self.bedrooms))),
            "bathrooms" => Some(SortValue::Number(i64::from(self.bathrooms))),
            "areaSqm" => Some(SortValue::Number(i64::from(self.area_sqm))),
            "availableFrom" => self.available_from.map(SortValue::Date),
            other => self.text(other).map(|value| SortValue::text(&value)),
        }
    }
}
