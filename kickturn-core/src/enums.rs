//! Enum types for kickturn entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical footprint of a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotSize {
    Small,
    Medium,
    Large,
}

/// Skill level a spot is suited for. A spot can carry several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Whether a spot is a built park or a found street feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotKind {
    Park,
    Street,
}

/// Kind of catalog mutation delivered to the serving layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Created,
    Approved,
    Deleted,
}

/// Normalize a token for case/separator-insensitive enum parsing.
fn normalize_token(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for SpotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SpotSize::Small => "Small",
            SpotSize::Medium => "Medium",
            SpotSize::Large => "Large",
        };
        write!(f, "{}", value)
    }
}

impl FromStr for SpotSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "small" | "s" => Ok(SpotSize::Small),
            "medium" | "m" => Ok(SpotSize::Medium),
            "large" | "l" => Ok(SpotSize::Large),
            _ => Err(format!("Invalid SpotSize: {}", s)),
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
        };
        write!(f, "{}", value)
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "beginner" | "beg" => Ok(SkillLevel::Beginner),
            "intermediate" | "inter" => Ok(SkillLevel::Intermediate),
            "advanced" | "adv" => Ok(SkillLevel::Advanced),
            _ => Err(format!("Invalid SkillLevel: {}", s)),
        }
    }
}

impl fmt::Display for SpotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SpotKind::Park => "Park",
            SpotKind::Street => "Street",
        };
        write!(f, "{}", value)
    }
}

impl FromStr for SpotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "park" | "skatepark" => Ok(SpotKind::Park),
            "street" | "streetspot" => Ok(SpotKind::Street),
            _ => Err(format!("Invalid SpotKind: {}", s)),
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            MutationKind::Created => "Created",
            MutationKind::Approved => "Approved",
            MutationKind::Deleted => "Deleted",
        };
        write!(f, "{}", value)
    }
}

impl FromStr for MutationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "created" | "create" => Ok(MutationKind::Created),
            "approved" | "approve" => Ok(MutationKind::Approved),
            "deleted" | "delete" => Ok(MutationKind::Deleted),
            _ => Err(format!("Invalid MutationKind: {}", s)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_size_roundtrip_through_str() {
        for size in [SpotSize::Small, SpotSize::Medium, SpotSize::Large] {
            let parsed: SpotSize = size.to_string().parse().unwrap();
            assert_eq!(parsed, size);
        }
    }

    #[test]
    fn test_skill_level_parse_accepts_separators() {
        assert_eq!("inter-mediate".parse::<SkillLevel>().unwrap(), SkillLevel::Intermediate);
        assert_eq!("ADVANCED".parse::<SkillLevel>().unwrap(), SkillLevel::Advanced);
    }

    #[test]
    fn test_spot_kind_parse_aliases() {
        assert_eq!("skatepark".parse::<SpotKind>().unwrap(), SpotKind::Park);
        assert_eq!("street spot".parse::<SpotKind>().unwrap(), SpotKind::Street);
        assert!("indoor".parse::<SpotKind>().is_err());
    }

    #[test]
    fn test_mutation_kind_parse_verbs() {
        assert_eq!("create".parse::<MutationKind>().unwrap(), MutationKind::Created);
        assert_eq!("Deleted".parse::<MutationKind>().unwrap(), MutationKind::Deleted);
    }

    #[test]
    fn test_enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&SpotSize::Large).unwrap(), "\"large\"");
        assert_eq!(serde_json::to_string(&SkillLevel::Beginner).unwrap(), "\"beginner\"");
        assert_eq!(serde_json::to_string(&SpotKind::Street).unwrap(), "\"street\"");
    }
}
