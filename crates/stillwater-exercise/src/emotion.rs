use serde::{Deserialize, Serialize};

/// Emotions offered on the selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Anger,
    Anxiety,
    Sadness,
    Fear,
    Overwhelm,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Self::Anger,
        Self::Anxiety,
        Self::Sadness,
        Self::Fear,
        Self::Overwhelm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Anger => "Anger",
            Self::Anxiety => "Anxiety",
            Self::Sadness => "Sadness",
            Self::Fear => "Fear",
            Self::Overwhelm => "Overwhelm",
        }
    }

    /// Hex color the water is drawn in while this emotion is selected.
    pub fn water_color(&self) -> &'static str {
        match self {
            Self::Anger => "#ef4444",
            Self::Anxiety => "#f59e0b",
            Self::Sadness => "#3b82f6",
            Self::Fear => "#8b5cf6",
            Self::Overwhelm => "#14b8a6",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_emotion_has_a_distinct_color() {
        let colors: HashSet<_> = Emotion::ALL.iter().map(|e| e.water_color()).collect();
        assert_eq!(colors.len(), Emotion::ALL.len());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Emotion::Overwhelm).unwrap(), "\"overwhelm\"");
    }
}
