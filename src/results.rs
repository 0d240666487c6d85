use serde::{Deserialize, Serialize};

/// Column order of the produced dataset
pub const COLUMNS: [&str; 7] = [
    "title",
    "price",
    "supplier",
    "location",
    "category",
    "url",
    "scraped_at",
];

/// One product discovered on a catalog page
///
/// Unresolved fields are empty strings, never absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub price: String,
    pub supplier: String,
    pub location: String,
    pub category: String,
    /// Canonical absolute product URL, the dedup key
    pub url: String,
    pub scraped_at: String,
}

impl Listing {
    /// Create a listing with only title and URL resolved
    pub fn new(title: String, url: String, category: &str, scraped_at: &str) -> Self {
        Self {
            title,
            price: String::new(),
            supplier: String::new(),
            location: String::new(),
            category: category.to_string(),
            url,
            scraped_at: scraped_at.to_string(),
        }
    }
}

/// Run-wide labels stamped onto every listing of a page
#[derive(Debug, Clone, Copy)]
pub struct ListingContext<'a> {
    pub category: &'a str,
    pub scraped_at: &'a str,
}
