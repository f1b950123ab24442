//! Donation page logic: impact levels, amount selection, widget lifetime.
//!
//! Payment itself happens inside the third-party widget; this module only
//! tracks what the donor picked and whether the widget is mounted.
use anyhow::{Context, Result};
use reqwest::Url;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Donate;

/// DOM id of the element the widget renders into.
pub const WIDGET_CONTAINER_ID: &str = "flipcause-widget-container";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpactLevel {
    pub amount: u32,
    pub description: &'static str,
}

pub const IMPACT_LEVELS: [ImpactLevel; 4] = [
    ImpactLevel {
        amount: 25,
        description: "Provides art supplies for one child",
    },
    ImpactLevel {
        amount: 50,
        description: "Sponsors a workshop session",
    },
    ImpactLevel {
        amount: 100,
        description: "Funds a month of art education",
    },
    ImpactLevel {
        amount: 500,
        description: "Supports a family for six months",
    },
];

/// Either a preset level or a typed custom amount, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationSelection {
    preset: Option<u32>,
    custom: String,
    recurring: bool,
}

impl DonationSelection {
    pub fn select_preset(&mut self, amount: u32) {
        self.preset = Some(amount);
        self.custom.clear();
    }

    /// Accepts an empty string or digits only; anything else is ignored and
    /// returns false.
    pub fn set_custom(&mut self, value: &str) -> bool {
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        self.custom = value.to_string();
        self.preset = None;
        true
    }

    pub fn set_recurring(&mut self, recurring: bool) {
        self.recurring = recurring;
    }

    pub fn preset(&self) -> Option<u32> {
        self.preset
    }

    pub fn custom(&self) -> &str {
        &self.custom
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring
    }

    /// The amount the donor intends to give, if any.
    pub fn amount(&self) -> Option<u32> {
        self.preset
            .or_else(|| self.custom.parse().ok())
            .filter(|a| *a > 0)
    }
}

/// The embeddable donation widget identified by an opaque id.
#[derive(Debug, Clone)]
pub struct DonationWidget {
    loader_url: Url,
    mounted: Arc<AtomicUsize>,
}

impl DonationWidget {
    pub fn from_config(cfg: &Donate) -> Result<Self> {
        let base = Url::parse(&cfg.widget_base_url).context("invalid widget base URL")?;
        let loader_url = base
            .join(cfg.widget_id.trim())
            .context("invalid widget id")?;
        Ok(Self {
            loader_url,
            mounted: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn loader_url(&self) -> &Url {
        &self.loader_url
    }

    /// Inject the loader script. The widget stays mounted until the returned
    /// lease is dropped.
    pub fn mount(&self) -> WidgetMount {
        self.mounted.fetch_add(1, Ordering::SeqCst);
        info!(url = %self.loader_url, container = WIDGET_CONTAINER_ID, "donation widget mounted");
        WidgetMount {
            loader_url: self.loader_url.clone(),
            mounted: Arc::clone(&self.mounted),
        }
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct WidgetMount {
    loader_url: Url,
    mounted: Arc<AtomicUsize>,
}

impl WidgetMount {
    pub fn script_src(&self) -> &str {
        self.loader_url.as_str()
    }

    pub fn container_id(&self) -> &'static str {
        WIDGET_CONTAINER_ID
    }
}

impl Drop for WidgetMount {
    fn drop(&mut self) {
        self.mounted.fetch_sub(1, Ordering::SeqCst);
        debug!(url = %self.loader_url, "donation widget unmounted");
    }
}
