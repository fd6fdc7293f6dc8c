use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle category of a project. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Design,
    #[serde(rename = "In Progress")]
    InProgress,
    Validation,
    #[serde(rename = "R&D Prototype")]
    RdPrototype,
    Completed,
    #[serde(rename = "On Hold")]
    OnHold,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Self::Design,
        Self::InProgress,
        Self::Validation,
        Self::RdPrototype,
        Self::Completed,
        Self::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Design => "Design",
            Self::InProgress => "In Progress",
            Self::Validation => "Validation",
            Self::RdPrototype => "R&D Prototype",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }

    /// Stages that count towards the "active projects" figure.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Design | Self::InProgress | Self::Validation | Self::RdPrototype
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("invalid stage: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_every_label() {
        for stage in Stage::ALL {
            assert_eq!(stage.as_str().parse::<Stage>().unwrap(), stage);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_label() {
        let err = "Planning".parse::<Stage>().unwrap_err();
        assert!(err.to_string().contains("invalid stage: Planning"));
        assert!("in progress".parse::<Stage>().is_err());
    }

    #[test]
    fn test_serde_uses_display_labels() {
        let json = serde_json::to_string(&Stage::RdPrototype).unwrap();
        assert_eq!(json, "\"R&D Prototype\"");
        let parsed: Stage = serde_json::from_str("\"On Hold\"").unwrap();
        assert_eq!(parsed, Stage::OnHold);
    }

    #[test]
    fn test_active_stages() {
        let active: Vec<Stage> = Stage::ALL.into_iter().filter(Stage::is_active).collect();
        assert_eq!(
            active,
            [
                Stage::Design,
                Stage::InProgress,
                Stage::Validation,
                Stage::RdPrototype
            ]
        );
    }
}
