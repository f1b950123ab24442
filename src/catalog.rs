//! Catalog engine: filter and sort the store's artwork list.
//!
//! Everything here is a pure derivation over an immutable list. Filter values
//! arrive as the strings the store's dropdowns emit; anything that does not
//! parse is treated as "no filter".
use crate::model::{sample_artworks, Artwork, Category};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Price dropdown options as `(label, value)`.
pub const PRICE_OPTIONS: [(&str, &str); 4] = [
    ("Under $100", "0-100"),
    ("$100 - $200", "100-200"),
    ("$200 - $500", "200-500"),
    ("Over $500", "500+"),
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("duplicate artwork id '{0}'")]
    DuplicateId(String),
    #[error("artwork '{0}' must have a positive price")]
    ZeroPrice(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceRange {
    /// Inclusive on both ends.
    Between { min: u32, max: u32 },
    AtLeast { min: u32 },
}

impl PriceRange {
    /// Parse `"min-max"` or `"min+"`. Returns `None` for anything else,
    /// including inverted bounds.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(min) = value.strip_suffix('+') {
            return min.trim().parse().ok().map(|min| PriceRange::AtLeast { min });
        }
        let (min, max) = value.split_once('-')?;
        let min: u32 = min.trim().parse().ok()?;
        let max: u32 = max.trim().parse().ok()?;
        if max < min {
            return None;
        }
        Some(PriceRange::Between { min, max })
    }

    pub fn contains(&self, price: u32) -> bool {
        match *self {
            PriceRange::Between { min, max } => min <= price && price <= max,
            PriceRange::AtLeast { min } => price >= min,
        }
    }

    pub fn as_value(&self) -> String {
        match *self {
            PriceRange::Between { min, max } => format!("{}-{}", min, max),
            PriceRange::AtLeast { min } => format!("{}+", min),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    Newest,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Featured,
        SortMode::PriceLow,
        SortMode::PriceHigh,
        SortMode::Newest,
    ];

    /// Lenient parse: unknown values fall back to `Featured`.
    pub fn parse(value: &str) -> Self {
        SortMode::ALL
            .into_iter()
            .find(|m| m.as_str() == value.trim())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Featured => "featured",
            SortMode::PriceLow => "price-low",
            SortMode::PriceHigh => "price-high",
            SortMode::Newest => "newest",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortMode::Featured => "Featured",
            SortMode::PriceLow => "Price: Low to High",
            SortMode::PriceHigh => "Price: High to Low",
            SortMode::Newest => "Newest",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Price,
    Category,
}

/// The user's current price and category constraints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub price: Option<PriceRange>,
    pub category: Option<Category>,
}

impl FilterSelection {
    /// Apply a dropdown selection. Picking the value that is already selected
    /// clears that dimension; a malformed value also clears it.
    pub fn toggle(&mut self, kind: FilterKind, value: &str) {
        match kind {
            FilterKind::Price => self.toggle_price(value),
            FilterKind::Category => self.toggle_category(value),
        }
    }

    pub fn toggle_price(&mut self, value: &str) {
        let picked = PriceRange::parse(value);
        self.price = if picked.is_some() && picked == self.price {
            None
        } else {
            picked
        };
    }

    pub fn toggle_category(&mut self, value: &str) {
        let picked = value.parse::<Category>().ok();
        self.category = if picked.is_some() && picked == self.category {
            None
        } else {
            picked
        };
    }

    pub fn clear(&mut self) {
        *self = FilterSelection::default();
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.category.is_none()
    }

    pub fn matches(&self, artwork: &Artwork) -> bool {
        let price_ok = self.price.map_or(true, |r| r.contains(artwork.price));
        let category_ok = self.category.map_or(true, |c| c == artwork.category);
        price_ok && category_ok
    }
}

/// Integer ids rank above the rest and compare by value; the others compare
/// lexicographically. Ties on value (`"7"` vs `"07"`) fall back to the raw id.
fn id_key(id: &str) -> (bool, u64, &str) {
    match id.parse::<u64>() {
        Ok(n) => (true, n, id),
        Err(_) => (false, 0, id),
    }
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    id_key(a).cmp(&id_key(b))
}

/// The store's fixed artwork list.
#[derive(Debug, Clone)]
pub struct Catalog {
    artworks: Vec<Artwork>,
}

impl Catalog {
    pub fn new(artworks: Vec<Artwork>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for artwork in &artworks {
            if !seen.insert(artwork.id.as_str()) {
                return Err(CatalogError::DuplicateId(artwork.id.clone()));
            }
            if artwork.price == 0 {
                return Err(CatalogError::ZeroPrice(artwork.id.clone()));
            }
        }
        Ok(Self { artworks })
    }

    pub fn sample() -> Self {
        Self {
            artworks: sample_artworks(),
        }
    }

    /// Load a YAML list of artworks.
    pub fn from_yaml_file(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let artworks: Vec<Artwork> = serde_yaml::from_str(&content)?;
        Self::new(artworks)
    }

    pub fn artworks(&self) -> &[Artwork] {
        &self.artworks
    }

    pub fn get(&self, id: &str) -> Option<&Artwork> {
        self.artworks.iter().find(|a| a.id == id)
    }

    /// Filter, then order. Sorting is stable so ties keep list order.
    pub fn view(&self, filters: &FilterSelection, sort: SortMode) -> Vec<&Artwork> {
        let mut out: Vec<&Artwork> = self.artworks.iter().filter(|a| filters.matches(a)).collect();
        match sort {
            SortMode::Featured => {}
            SortMode::PriceLow => out.sort_by_key(|a| a.price),
            SortMode::PriceHigh => out.sort_by(|a, b| b.price.cmp(&a.price)),
            SortMode::Newest => out.sort_by(|a, b| compare_ids(&b.id, &a.id)),
        }
        debug!(
            total = self.artworks.len(),
            shown = out.len(),
            sort = sort.as_str(),
            "catalog view recomputed"
        );
        out
    }
}
