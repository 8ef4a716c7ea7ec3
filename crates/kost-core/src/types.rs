//! Shared types used across the scraper.
//!
//! Every text field of a [`ListingRecord`] is always populated: either with the
//! extracted value or with [`NOT_AVAILABLE`]. List fields fall back to empty.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Placeholder stored in any text field that could not be extracted.
pub const NOT_AVAILABLE: &str = "N/A";

/// Export column names, in output order.
pub const EXPORT_COLUMNS: [&str; 15] = [
    "name",
    "owner",
    "phone",
    "price",
    "description",
    "url",
    "location.property_name",
    "location.province",
    "location.city",
    "location.district",
    "location.sub_district",
    "location.address",
    "facilities.room",
    "facilities.shared",
    "facilities.neighborhood",
];

/// Separator used when a facility list is flattened to one column.
pub const FACILITY_SEPARATOR: &str = ", ";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// One scraped rooming-house listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Listing title
    pub name: String,
    /// Seller name
    pub owner: String,
    /// Contact number
    pub phone: String,
    /// Price as displayed on the page
    pub price: String,
    /// Location block
    pub location: Location,
    /// Facility lists
    pub facilities: Facilities,
    /// Additional information text
    pub description: String,
    /// Detail page the record was extracted from
    pub url: String,
}

impl ListingRecord {
    /// Create a record for `url` with every other field defaulted.
    #[must_use]
    pub fn empty(url: &DetailUrl) -> Self {
        Self {
            name: not_available(),
            owner: not_available(),
            phone: not_available(),
            price: not_available(),
            location: Location::default(),
            facilities: Facilities::default(),
            description: not_available(),
            url: url.as_str().to_string(),
        }
    }

    /// Flatten into export columns, ordered as [`EXPORT_COLUMNS`].
    #[must_use]
    pub fn flatten(&self) -> [String; 15] {
        [
            self.name.clone(),
            self.owner.clone(),
            self.phone.clone(),
            self.price.clone(),
            self.description.clone(),
            self.url.clone(),
            self.location.property_name.clone(),
            self.location.province.clone(),
            self.location.city.clone(),
            self.location.district.clone(),
            self.location.sub_district.clone(),
            self.location.address.clone(),
            self.facilities.room.join(FACILITY_SEPARATOR),
            self.facilities.shared.join(FACILITY_SEPARATOR),
            self.facilities.neighborhood.join(FACILITY_SEPARATOR),
        ]
    }
}

/// Location fieldset of a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Name of the property
    pub property_name: String,
    /// Province
    pub province: String,
    /// City
    pub city: String,
    /// District (kecamatan)
    pub district: String,
    /// Sub-district (kelurahan)
    pub sub_district: String,
    /// Street address
    pub address: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            property_name: not_available(),
            province: not_available(),
            city: not_available(),
            district: not_available(),
            sub_district: not_available(),
            address: not_available(),
        }
    }
}

/// Facilities fieldset of a detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facilities {
    /// In-room facilities
    pub room: Vec<String>,
    /// Shared facilities
    pub shared: Vec<String>,
    /// Neighborhood amenities
    pub neighborhood: Vec<String>,
}

/// Absolute URL of a listing detail page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetailUrl(String);

impl DetailUrl {
    /// Parse an absolute URL.
    ///
    /// # Errors
    /// Returns error if `url` is not an absolute URL.
    pub fn new(url: impl Into<String>) -> Result<Self, CoreError> {
        let url = url.into();
        Url::parse(&url)
            .map_err(|e| CoreError::Validation(format!("invalid detail URL '{url}': {e}")))?;
        Ok(Self(url))
    }

    /// Resolve an href found on a listing page against the site origin.
    ///
    /// Absolute `http`/`https` hrefs are kept verbatim.
    ///
    /// # Errors
    /// Returns error if the origin is not a valid base URL or the href cannot be joined.
    pub fn resolve(origin: &str, href: &str) -> Result<Self, CoreError> {
        let href = href.trim();
        if href.starts_with("http://") || href.starts_with("https://") {
            return Self::new(href);
        }

        let base = Url::parse(origin)
            .map_err(|e| CoreError::Validation(format!("invalid site origin '{origin}': {e}")))?;
        let joined = base
            .join(href)
            .map_err(|e| CoreError::Validation(format!("cannot resolve href '{href}': {e}")))?;
        Ok(Self(joined.to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DetailUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-based index of a listing results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageIndex(u32);

impl PageIndex {
    /// Create a new `PageIndex`.
    ///
    /// # Errors
    /// Returns error if `n` is zero.
    pub fn new(n: u32) -> Result<Self, CoreError> {
        if n == 0 {
            return Err(CoreError::Validation(
                "page index must be at least 1".to_string(),
            ));
        }
        Ok(Self(n))
    }

    /// Get the page number.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// URL of this page within the listing collection at `base_url`.
    ///
    /// Page 1 is the bare collection URL; later pages are `index{n}.html` beneath it.
    #[must_use]
    pub fn listing_url(self, base_url: &str) -> String {
        if self.0 == 1 {
            return base_url.to_string();
        }
        let base = base_url.trim_end_matches('/');
        format!("{base}/index{}.html", self.0)
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
