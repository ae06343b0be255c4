use serde::{Deserialize, Serialize};

/// Closed set of entity categories recognized by the builtin rule table.
///
/// `Indicator` is reserved for indicator-of-compromise extraction and has
/// no patterns yet; it exists so downstream consumers can already key on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityLabel {
    ActorGroup,
    ToolMalware,
    Technique,
    Event,
    Victim,
    Industry,
    Region,
    Software,
    Vulnerability,
    Indicator,
}

impl EntityLabel {
    pub const ALL: [Self; 10] = [
        Self::ActorGroup,
        Self::ToolMalware,
        Self::Technique,
        Self::Event,
        Self::Victim,
        Self::Industry,
        Self::Region,
        Self::Software,
        Self::Vulnerability,
        Self::Indicator,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ActorGroup => "actor_group",
            Self::ToolMalware => "tool_malware",
            Self::Technique => "technique",
            Self::Event => "event",
            Self::Victim => "victim",
            Self::Industry => "industry",
            Self::Region => "region",
            Self::Software => "software",
            Self::Vulnerability => "vulnerability",
            Self::Indicator => "indicator",
        }
    }

    /// Human-readable name used in reports.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ActorGroup => "APT group",
            Self::ToolMalware => "attack tool / malware",
            Self::Technique => "attack technique",
            Self::Event => "attack event",
            Self::Victim => "target / victim",
            Self::Industry => "industry",
            Self::Region => "region / country",
            Self::Software => "software / application",
            Self::Vulnerability => "CVE vulnerability",
            Self::Indicator => "IOC indicator",
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityLabel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actor_group" => Ok(Self::ActorGroup),
            "tool_malware" => Ok(Self::ToolMalware),
            "technique" => Ok(Self::Technique),
            "event" => Ok(Self::Event),
            "victim" => Ok(Self::Victim),
            "industry" => Ok(Self::Industry),
            "region" => Ok(Self::Region),
            "software" => Ok(Self::Software),
            "vulnerability" => Ok(Self::Vulnerability),
            "indicator" => Ok(Self::Indicator),
            _ => Err(crate::Error::InvalidEntityLabel(s.to_string())),
        }
    }
}

/// One recognized occurrence of an entity in one sentence of one document.
///
/// Mentions are deduplicated per document on `(normalized, label)`; the same
/// entity recurring in another document yields a fresh mention there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityMention {
    pub row_id: usize,
    pub entity_text: String,
    pub label: EntityLabel,
    pub normalized: String,
    /// Canonical code for the entity, e.g. an upper-cased CVE identifier.
    /// Empty for every label except `Vulnerability`.
    #[serde(default)]
    pub std_id: String,
    /// Truncated sentence the match came from. For human inspection only,
    /// never used for matching.
    pub context_sentence: String,
    pub source_url: String,
    pub group_name: String,
}

impl EntityMention {
    /// Key under which mentions are deduplicated within a single document.
    #[must_use]
    pub fn dedup_key(&self) -> (String, EntityLabel) {
        (self.normalized.clone(), self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn label_round_trips_through_str() {
        for label in EntityLabel::ALL {
            assert_eq!(EntityLabel::from_str(label.as_str()).unwrap(), label);
        }
    }

    #[test]
    fn unknown_label_is_an_error() {
        assert!(EntityLabel::from_str("weather").is_err());
    }

    #[test]
    fn label_serializes_snake_case() {
        let json = serde_json::to_string(&EntityLabel::ToolMalware).unwrap();
        assert_eq!(json, "\"tool_malware\"");
    }
}
