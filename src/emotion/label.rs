//! The fixed set of emotion labels.

use std::fmt;

/// Coarse facial expression recognised by the booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Emotion {
    Happy,
    Sad,
    #[default]
    Neutral,
    Angry,
    Surprise,
    Fear,
}

impl Emotion {
    /// Every label, in display order.
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Neutral,
        Emotion::Angry,
        Emotion::Surprise,
        Emotion::Fear,
    ];

    /// Parse a label exactly as written (lowercase).
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "happy" => Some(Self::Happy),
            "sad" => Some(Self::Sad),
            "neutral" => Some(Self::Neutral),
            "angry" => Some(Self::Angry),
            "surprise" => Some(Self::Surprise),
            "fear" => Some(Self::Fear),
            _ => None,
        }
    }

    /// Map any label to the fixed set; unknown or empty labels become neutral.
    pub fn from_label(label: &str) -> Self {
        Self::parse(label.trim()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Neutral => "neutral",
            Self::Angry => "angry",
            Self::Surprise => "surprise",
            Self::Fear => "fear",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_display() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::parse(&emotion.to_string()), Some(emotion));
        }
    }

    #[test]
    fn test_from_label_falls_back_to_neutral() {
        assert_eq!(Emotion::from_label("disgust"), Emotion::Neutral);
        assert_eq!(Emotion::from_label(""), Emotion::Neutral);
        assert_eq!(Emotion::from_label("HAPPY"), Emotion::Neutral);
        assert_eq!(Emotion::from_label(" sad "), Emotion::Sad);
    }
}
