//! Storefront browsing session: filters, sort, quick view and cart intent.
use crate::catalog::{Catalog, FilterKind, FilterSelection, SortMode};
use crate::model::Artwork;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no artwork with id '{0}'")]
    UnknownArtwork(String),
    #[error("quick view is not open")]
    NoQuickView,
    #[error("artwork '{artwork_id}' has no {months}-month plan")]
    NoSuchInstallment { artwork_id: String, months: u32 },
    #[error("choose an installment plan first")]
    InstallmentRequired,
}

/// An add-to-cart intent. Lives only as long as the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub artwork_id: String,
    pub months: u32,
    pub monthly_payment: u32,
}

#[derive(Debug)]
pub struct Storefront {
    catalog: Catalog,
    filters: FilterSelection,
    sort: SortMode,
    quick_view: Option<String>,
    installment: Option<u32>,
    cart: Vec<CartLine>,
}

impl Storefront {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            filters: FilterSelection::default(),
            sort: SortMode::default(),
            quick_view: None,
            installment: None,
            cart: Vec::new(),
        }
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn toggle_filter(&mut self, kind: FilterKind, value: &str) {
        self.filters.toggle(kind, value);
        debug!(?kind, value, filters = ?self.filters, "filter changed");
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn set_sort(&mut self, value: &str) {
        self.sort = SortMode::parse(value);
    }

    pub fn visible(&self) -> Vec<&Artwork> {
        self.catalog.view(&self.filters, self.sort)
    }

    pub fn open_quick_view(&mut self, id: &str) -> Result<&Artwork, StoreError> {
        let artwork = self
            .catalog
            .get(id)
            .ok_or_else(|| StoreError::UnknownArtwork(id.to_string()))?;
        self.quick_view = Some(artwork.id.clone());
        self.installment = None;
        Ok(artwork)
    }

    pub fn close_quick_view(&mut self) {
        self.quick_view = None;
        self.installment = None;
    }

    pub fn quick_view(&self) -> Option<&Artwork> {
        self.quick_view.as_deref().and_then(|id| self.catalog.get(id))
    }

    pub fn select_installment(&mut self, months: u32) -> Result<(), StoreError> {
        let artwork = self.quick_view().ok_or(StoreError::NoQuickView)?;
        if artwork.installment(months).is_none() {
            return Err(StoreError::NoSuchInstallment {
                artwork_id: artwork.id.clone(),
                months,
            });
        }
        self.installment = Some(months);
        Ok(())
    }

    pub fn selected_installment(&self) -> Option<u32> {
        self.installment
    }

    pub fn add_to_cart(&mut self) -> Result<&CartLine, StoreError> {
        let artwork = self.quick_view().ok_or(StoreError::NoQuickView)?;
        let months = self.installment.ok_or(StoreError::InstallmentRequired)?;
        let plan = artwork
            .installment(months)
            .ok_or_else(|| StoreError::NoSuchInstallment {
                artwork_id: artwork.id.clone(),
                months,
            })?;
        let line = CartLine {
            artwork_id: artwork.id.clone(),
            months,
            monthly_payment: plan.monthly_payment,
        };
        info!(artwork_id = %line.artwork_id, months, monthly = line.monthly_payment, "added to cart");
        self.cart.push(line);
        Ok(&self.cart[self.cart.len() - 1])
    }

    pub fn cart(&self) -> &[CartLine] {
        &self.cart
    }
}
