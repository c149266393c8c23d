//! Plant identification results returned by the identification provider.

use serde::{Deserialize, Serialize};

/// The plant organ shown in a photo. Passed through to the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organ {
    #[default]
    Auto,
    Flower,
    Leaf,
    Fruit,
    Bark,
}

impl Organ {
    /// Parse an organ name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "flower" => Some(Self::Flower),
            "leaf" => Some(Self::Leaf),
            "fruit" => Some(Self::Fruit),
            "bark" => Some(Self::Bark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Flower => "flower",
            Self::Leaf => "leaf",
            Self::Fruit => "fruit",
            Self::Bark => "bark",
        }
    }
}

/// Best-match identification of a plant photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantIdentification {
    /// Display name: first common name, else the scientific name.
    pub species: String,
    pub scientific_name: Option<String>,
    /// Provider score in `0.0..=1.0`.
    pub confidence: f64,
    #[serde(default)]
    pub common_names: Vec<String>,
}

impl PlantIdentification {
    /// Placeholder used when the provider cannot identify the photo.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            species: "unknown".to_string(),
            scientific_name: None,
            confidence: 0.0,
            common_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.species == "unknown" && self.scientific_name.is_none()
    }

    /// Whether this identification agrees with a target plant type.
    ///
    /// Case-insensitive substring match in either direction against the
    /// species, scientific name and every common name.
    #[must_use]
    pub fn matches(&self, plant_type: &str) -> bool {
        let target = plant_type.trim().to_lowercase();
        if target.is_empty() || self.is_unknown() {
            return false;
        }

        std::iter::once(&self.species)
            .chain(self.scientific_name.iter())
            .chain(self.common_names.iter())
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .any(|name| name.contains(&target) || target.contains(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dandelion() -> PlantIdentification {
        PlantIdentification {
            species: "Common dandelion".to_string(),
            scientific_name: Some("Taraxacum officinale".to_string()),
            confidence: 0.91,
            common_names: vec!["Common dandelion".to_string(), "Lion's tooth".to_string()],
        }
    }

    #[test]
    fn test_matches_common_name_substring() {
        assert!(dandelion().matches("dandelion"));
        assert!(dandelion().matches("DANDELION"));
    }

    #[test]
    fn test_matches_scientific_name() {
        assert!(dandelion().matches("Taraxacum officinale"));
        assert!(dandelion().matches("taraxacum"));
    }

    #[test]
    fn test_target_containing_name_matches() {
        assert!(dandelion().matches("lion's tooth weed"));
    }

    #[test]
    fn test_no_match() {
        assert!(!dandelion().matches("oak"));
        assert!(!dandelion().matches("   "));
    }

    #[test]
    fn test_unknown_never_matches() {
        assert!(!PlantIdentification::unknown().matches("unknown"));
    }

    #[test]
    fn test_organ_parse() {
        assert_eq!(Organ::parse("Flower"), Some(Organ::Flower));
        assert_eq!(Organ::parse("root"), None);
        assert_eq!(Organ::default().as_str(), "auto");
    }
}
