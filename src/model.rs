use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store category an artwork is listed under.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Painting,
    Drawing,
    Digital,
    Photography,
    Sculpture,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Painting,
        Category::Drawing,
        Category::Digital,
        Category::Photography,
        Category::Sculpture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Painting => "painting",
            Category::Drawing => "drawing",
            Category::Digital => "digital",
            Category::Photography => "photography",
            Category::Sculpture => "sculpture",
        }
    }

    /// Label shown in the store's medium dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Painting => "Painting",
            Category::Drawing => "Drawing",
            Category::Digital => "Digital Art",
            Category::Photography => "Photography",
            Category::Sculpture => "Sculpture",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownVariant(pub String);

impl FromStr for Category {
    type Err = UnknownVariant;

    // Case-sensitive: values come from the closed option list.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Art form a grant applicant practices.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ArtForm {
    Painting,
    Drawing,
    Sculpture,
    Digital,
    Photography,
    Other,
}

impl ArtForm {
    pub const ALL: [ArtForm; 6] = [
        ArtForm::Painting,
        ArtForm::Drawing,
        ArtForm::Sculpture,
        ArtForm::Digital,
        ArtForm::Photography,
        ArtForm::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtForm::Painting => "painting",
            ArtForm::Drawing => "drawing",
            ArtForm::Sculpture => "sculpture",
            ArtForm::Digital => "digital",
            ArtForm::Photography => "photography",
            ArtForm::Other => "other",
        }
    }
}

impl fmt::Display for ArtForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtForm {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtForm::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallmentOption {
    pub months: u32,
    pub monthly_payment: u32,
}

/// A piece listed in the art store. Prices are whole dollars.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artwork {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub price: u32,
    #[serde(default)]
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub installment_options: Vec<InstallmentOption>,
    pub medium: String,
    pub dimensions: String,
    pub category: Category,
}

impl Artwork {
    pub fn installment(&self, months: u32) -> Option<&InstallmentOption> {
        self.installment_options.iter().find(|o| o.months == months)
    }
}

fn plans(three: u32, six: u32, twelve: u32) -> Vec<InstallmentOption> {
    vec![
        InstallmentOption { months: 3, monthly_payment: three },
        InstallmentOption { months: 6, monthly_payment: six },
        InstallmentOption { months: 12, monthly_payment: twelve },
    ]
}

#[allow(clippy::too_many_arguments)]
fn artwork(
    id: &str,
    title: &str,
    artist: &str,
    price: u32,
    description: &str,
    installment_options: Vec<InstallmentOption>,
    medium: &str,
    dimensions: &str,
    category: Category,
) -> Artwork {
    Artwork {
        id: id.into(),
        title: title.into(),
        artist: artist.into(),
        price,
        image: format!("/arts/art{}.jpg", id),
        description: description.into(),
        installment_options,
        medium: medium.into(),
        dimensions: dimensions.into(),
        category,
    }
}

/// The seven pieces the store ships with.
pub fn sample_artworks() -> Vec<Artwork> {
    const ORGANIC: &str =
        "Organic forms and natural colors create a sense of peace and tranquility.";
    const CANVAS: &str = "Acrylic on Canvas";
    const SIZE: &str = "16\" x 20\"";

    vec![
        artwork(
            "1",
            "Abstract Harmony",
            "Sarah Johnson",
            1200,
            "A vibrant abstract piece that captures the essence of movement and color.",
            plans(400, 200, 100),
            CANVAS,
            SIZE,
            Category::Painting,
        ),
        artwork(
            "2",
            "Urban Landscape",
            "Michael Chen",
            800,
            "Contemporary cityscape capturing the energy of urban life.",
            plans(267, 133, 67),
            "Digital Art",
            "3000px x 4000px",
            Category::Digital,
        ),
        artwork(
            "3",
            "Natural Flow",
            "Emily Rodriguez",
            1500,
            ORGANIC,
            plans(500, 250, 125),
            CANVAS,
            SIZE,
            Category::Painting,
        ),
        artwork(
            "4",
            "Dancing Snow",
            "Badr Yakub",
            3500,
            ORGANIC,
            plans(500, 250, 125),
            CANVAS,
            SIZE,
            Category::Digital,
        ),
        artwork(
            "5",
            "The Last Supper",
            "Najm Mohammed",
            4300,
            ORGANIC,
            plans(500, 250, 125),
            CANVAS,
            SIZE,
            Category::Painting,
        ),
        artwork(
            "6",
            "Butterfly",
            "Sasha Rodriguez",
            1500,
            ORGANIC,
            plans(500, 250, 125),
            CANVAS,
            SIZE,
            Category::Painting,
        ),
        artwork(
            "7",
            "Lake of the Moon",
            "Fatima Al-Haj",
            1200,
            ORGANIC,
            plans(500, 250, 125),
            CANVAS,
            SIZE,
            Category::Drawing,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_exact() {
        assert_eq!("painting".parse::<Category>(), Ok(Category::Painting));
        assert!("Painting".parse::<Category>().is_err());
        assert!("other".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn art_form_accepts_other() {
        assert_eq!("other".parse::<ArtForm>(), Ok(ArtForm::Other));
        assert!("music".parse::<ArtForm>().is_err());
    }

    #[test]
    fn art_form_rejected_by_serde() {
        let ok: ArtForm = serde_yaml::from_str("digital").unwrap();
        assert_eq!(ok, ArtForm::Digital);
        assert!(serde_yaml::from_str::<ArtForm>("music").is_err());
    }

    #[test]
    fn sample_has_unique_ids_and_plans() {
        let art = sample_artworks();
        assert_eq!(art.len(), 7);
        let ids: std::collections::HashSet<_> = art.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 7);
        assert_eq!(art[1].installment(6).map(|o| o.monthly_payment), Some(133));
        assert!(art[1].installment(24).is_none());
        assert_eq!(art[0].image, "/arts/art1.jpg");
    }
}
