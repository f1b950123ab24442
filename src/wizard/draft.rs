//! Application draft, its field rules, and the validated `Application`.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ArtForm;

use super::Stage;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

pub const MIN_CHILD_AGE: i64 = 5;
pub const MAX_CHILD_AGE: i64 = 18;
pub const MIN_FUNDING: i64 = 100;
pub const MAX_FUNDING: i64 = 5000;

/// Every input on the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    ChildName,
    ChildAge,
    ArtForm,
    Experience,
    FundingAmount,
    FundingPurpose,
    Timeline,
    PreviousFunding,
    OtherSupport,
    Agreement,
}

impl Field {
    pub const ALL: [Field; 15] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::Address,
        Field::ChildName,
        Field::ChildAge,
        Field::ArtForm,
        Field::Experience,
        Field::FundingAmount,
        Field::FundingPurpose,
        Field::Timeline,
        Field::PreviousFunding,
        Field::OtherSupport,
        Field::Agreement,
    ];

    pub fn stage(&self) -> Stage {
        match self {
            Field::FirstName | Field::LastName | Field::Email | Field::Phone | Field::Address => {
                Stage::Contact
            }
            Field::ChildName | Field::ChildAge | Field::ArtForm | Field::Experience => {
                Stage::ChildDetails
            }
            Field::FundingAmount
            | Field::FundingPurpose
            | Field::Timeline
            | Field::PreviousFunding
            | Field::OtherSupport => Stage::Funding,
            Field::Agreement => Stage::Review,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, Field::PreviousFunding | Field::Agreement)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::ChildName => "child_name",
            Field::ChildAge => "child_age",
            Field::ArtForm => "art_form",
            Field::Experience => "experience",
            Field::FundingAmount => "funding_amount",
            Field::FundingPurpose => "funding_purpose",
            Field::Timeline => "timeline",
            Field::PreviousFunding => "previous_funding",
            Field::OtherSupport => "other_support",
            Field::Agreement => "agreement",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed rule, with the message shown under the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Everything typed into the form so far. Numeric inputs hold `None` until
/// the text parses as an integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub child_name: String,
    pub child_age: Option<i64>,
    pub art_form: Option<ArtForm>,
    pub experience: String,
    pub funding_amount: Option<i64>,
    pub funding_purpose: String,
    pub timeline: String,
    pub previous_funding: bool,
    pub other_support: String,
    pub agreement: bool,
}

/// A draft that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub child_name: String,
    pub child_age: u8,
    pub art_form: ArtForm,
    pub experience: String,
    pub funding_amount: u32,
    pub funding_purpose: String,
    pub timeline: String,
    pub previous_funding: bool,
    pub other_support: String,
}

fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

fn err(field: Field, message: &'static str) -> Result<(), FieldError> {
    Err(FieldError { field, message })
}

impl Draft {
    /// Store raw text for a non-flag field. Integer fields that do not parse
    /// are stored as `None`, as are unknown art forms.
    pub(crate) fn set_text(&mut self, field: Field, value: &str) {
        match field {
            Field::FirstName => self.first_name = value.to_string(),
            Field::LastName => self.last_name = value.to_string(),
            Field::Email => self.email = value.to_string(),
            Field::Phone => self.phone = value.to_string(),
            Field::Address => self.address = value.to_string(),
            Field::ChildName => self.child_name = value.to_string(),
            Field::ChildAge => self.child_age = value.trim().parse().ok(),
            Field::ArtForm => self.art_form = value.trim().parse().ok(),
            Field::Experience => self.experience = value.to_string(),
            Field::FundingAmount => self.funding_amount = value.trim().parse().ok(),
            Field::FundingPurpose => self.funding_purpose = value.to_string(),
            Field::Timeline => self.timeline = value.to_string(),
            Field::OtherSupport => self.other_support = value.to_string(),
            Field::PreviousFunding | Field::Agreement => {}
        }
    }

    pub(crate) fn set_flag(&mut self, field: Field, value: bool) {
        match field {
            Field::PreviousFunding => self.previous_funding = value,
            Field::Agreement => self.agreement = value,
            _ => {}
        }
    }

    pub fn check(&self, field: Field) -> Result<(), FieldError> {
        match field {
            Field::FirstName if !min_chars(&self.first_name, 2) => {
                err(field, "First name is required")
            }
            Field::LastName if !min_chars(&self.last_name, 2) => err(field, "Last name is required"),
            Field::Email if !EMAIL_RE.is_match(&self.email) || self.email.contains("..") => {
                err(field, "Invalid email address")
            }
            Field::Phone if !min_chars(&self.phone, 10) => {
                err(field, "Valid phone number is required")
            }
            Field::Address if !min_chars(&self.address, 5) => err(field, "Address is required"),
            Field::ChildName if !min_chars(&self.child_name, 2) => {
                err(field, "Child's name is required")
            }
            Field::ChildAge => match self.child_age {
                None => err(field, "Child's age is required"),
                Some(age) if age < MIN_CHILD_AGE => err(field, "Child must be at least 5 years old"),
                Some(age) if age > MAX_CHILD_AGE => err(field, "Child must be under 18"),
                Some(_) => Ok(()),
            },
            Field::ArtForm if self.art_form.is_none() => err(field, "Art form is required"),
            Field::Experience if !min_chars(&self.experience, 10) => {
                err(field, "Please describe your child's experience")
            }
            Field::FundingAmount => match self.funding_amount {
                Some(amount) if (MIN_FUNDING..=MAX_FUNDING).contains(&amount) => Ok(()),
                _ => err(field, "Funding amount must be between $100 and $5,000"),
            },
            Field::FundingPurpose if !min_chars(&self.funding_purpose, 20) => {
                err(field, "Please provide more details about the funding purpose")
            }
            Field::Timeline if !min_chars(&self.timeline, 10) => {
                err(field, "Please specify your timeline")
            }
            Field::Agreement if !self.agreement => err(field, "You must agree to the terms"),
            _ => Ok(()),
        }
    }

    pub fn errors(&self) -> Vec<FieldError> {
        Field::ALL
            .into_iter()
            .filter_map(|f| self.check(f).err())
            .collect()
    }

    pub fn validate(&self) -> Result<Application, Vec<FieldError>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }
        // Rules above guarantee these conversions.
        match (self.child_age, self.art_form, self.funding_amount) {
            (Some(age), Some(art_form), Some(amount)) => Ok(Application {
                first_name: self.first_name.clone(),
                last_name: self.last_name.clone(),
                email: self.email.clone(),
                phone: self.phone.clone(),
                address: self.address.clone(),
                child_name: self.child_name.clone(),
                child_age: age as u8,
                art_form,
                experience: self.experience.clone(),
                funding_amount: amount as u32,
                funding_purpose: self.funding_purpose.clone(),
                timeline: self.timeline.clone(),
                previous_funding: self.previous_funding,
                other_support: self.other_support.clone(),
            }),
            _ => Err(vec![FieldError {
                field: Field::ChildAge,
                message: "Child's age is required",
            }]),
        }
    }

    /// Lines shown on the review stage.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let opt = |v: Option<i64>| v.map(|n| n.to_string()).unwrap_or_default();
        vec![
            ("Name", format!("{} {}", self.first_name, self.last_name)),
            ("Contact", format!("{} / {}", self.email, self.phone)),
            (
                "Child's Information",
                format!("{}, Age: {}", self.child_name, opt(self.child_age)),
            ),
            (
                "Art Form",
                self.art_form.map(|a| a.to_string()).unwrap_or_default(),
            ),
            ("Amount", format!("${}", opt(self.funding_amount))),
            ("Timeline", self.timeline.clone()),
        ]
    }
}

#[cfg(test)]
pub(crate) fn valid_draft() -> Draft {
    Draft {
        first_name: "Amina".into(),
        last_name: "Okafor".into(),
        email: "amina@example.org".into(),
        phone: "555-010-0199".into(),
        address: "12 Elm Street".into(),
        child_name: "Zed".into(),
        child_age: Some(11),
        art_form: Some(ArtForm::Painting),
        experience: "Two years of weekend classes".into(),
        funding_amount: Some(750),
        funding_purpose: "Summer studio program tuition and supplies".into(),
        timeline: "Before June 2027".into(),
        previous_funding: false,
        other_support: String::new(),
        agreement: true,
    }
}
