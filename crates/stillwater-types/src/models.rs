use serde::{Deserialize, Serialize};

/// The five scheduled notification kinds, one per daily slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    MorningCheckin,
    MiddayPause,
    AfternoonReset,
    EveningReflection,
    BedtimeWinddown,
}

impl NotificationType {
    pub const ALL: [NotificationType; 5] = [
        Self::MorningCheckin,
        Self::MiddayPause,
        Self::AfternoonReset,
        Self::EveningReflection,
        Self::BedtimeWinddown,
    ];

    /// Stored in the `type` column and sent as the push `tag`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MorningCheckin => "morning_checkin",
            Self::MiddayPause => "midday_pause",
            Self::AfternoonReset => "afternoon_reset",
            Self::EveningReflection => "evening_reflection",
            Self::BedtimeWinddown => "bedtime_winddown",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::MorningCheckin => "Good morning",
            Self::MiddayPause => "Midday pause",
            Self::AfternoonReset => "Afternoon reset",
            Self::EveningReflection => "Evening reflection",
            Self::BedtimeWinddown => "Time to wind down",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            Self::MorningCheckin => "How are you feeling as the day starts? Take a minute to check in.",
            Self::MiddayPause => "Pause for a breath. Notice what you're carrying right now.",
            Self::AfternoonReset => "Feeling the pressure build? Turn down the tap for a moment.",
            Self::EveningReflection => "Look back on today. What emotion stood out the most?",
            Self::BedtimeWinddown => "Let the water settle before sleep. A short exercise can help.",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn storage_names_are_unique_and_match_display() {
        let names: HashSet<_> = NotificationType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(names.len(), NotificationType::ALL.len());
        for t in NotificationType::ALL {
            assert_eq!(t.to_string(), t.as_str());
        }
    }

    #[test]
    fn serde_uses_storage_names() {
        let json = serde_json::to_string(&NotificationType::MorningCheckin).unwrap();
        assert_eq!(json, "\"morning_checkin\"");
    }
}
