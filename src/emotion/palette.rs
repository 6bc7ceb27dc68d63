//! Per-emotion colors and mouth shapes.

use image::Rgb;

use super::label::Emotion;

// Web/X11 named colors
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 128, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
pub const GRAY: Rgb<u8> = Rgb([128, 128, 128]);
pub const LIGHT_GRAY: Rgb<u8> = Rgb([211, 211, 211]);
pub const BROWN: Rgb<u8> = Rgb([165, 42, 42]);
pub const LIGHT_BLUE: Rgb<u8> = Rgb([173, 216, 230]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const DARK_RED: Rgb<u8> = Rgb([139, 0, 0]);
pub const PURPLE: Rgb<u8> = Rgb([128, 0, 128]);
pub const PINK: Rgb<u8> = Rgb([255, 192, 203]);
pub const LIGHT_PINK: Rgb<u8> = Rgb([255, 182, 193]);
pub const DARK_BLUE: Rgb<u8> = Rgb([0, 0, 139]);
pub const DARK_GRAY: Rgb<u8> = Rgb([169, 169, 169]);

/// The three colors that vary by emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceColors {
    pub mouth: Rgb<u8>,
    pub eyes: Rgb<u8>,
    /// Fill of the head disc
    pub background: Rgb<u8>,
}

/// Mouth geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouthShape {
    /// Lower half of an ellipse (smile)
    ArcUp,
    /// Upper half of an ellipse (frown)
    ArcDown,
    /// Horizontal stroke
    Line,
    /// Filled oval
    Oval,
}

impl FaceColors {
    pub fn for_emotion(emotion: Emotion) -> Self {
        let (mouth, eyes, background) = match emotion {
            Emotion::Happy => (GREEN, BLUE, YELLOW),
            Emotion::Sad => (BLUE, GRAY, LIGHT_GRAY),
            Emotion::Neutral => (BLACK, BROWN, LIGHT_BLUE),
            Emotion::Angry => (RED, BLACK, DARK_RED),
            Emotion::Surprise => (PURPLE, PINK, LIGHT_PINK),
            Emotion::Fear => (PURPLE, DARK_BLUE, DARK_GRAY),
        };
        Self {
            mouth,
            eyes,
            background,
        }
    }
}

impl MouthShape {
    pub fn for_emotion(emotion: Emotion) -> Self {
        match emotion {
            Emotion::Happy => Self::ArcUp,
            Emotion::Sad | Emotion::Fear => Self::ArcDown,
            Emotion::Neutral | Emotion::Angry => Self::Line,
            Emotion::Surprise => Self::Oval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_colors() {
        let colors = FaceColors::for_emotion(Emotion::Neutral);
        assert_eq!(colors.mouth, BLACK);
        assert_eq!(colors.eyes, BROWN);
        assert_eq!(colors.background, LIGHT_BLUE);
    }

    #[test]
    fn test_mouth_shapes() {
        assert_eq!(MouthShape::for_emotion(Emotion::Happy), MouthShape::ArcUp);
        assert_eq!(MouthShape::for_emotion(Emotion::Fear), MouthShape::ArcDown);
        assert_eq!(MouthShape::for_emotion(Emotion::Angry), MouthShape::Line);
        assert_eq!(MouthShape::for_emotion(Emotion::Surprise), MouthShape::Oval);
    }

    #[test]
    fn test_surprise_and_fear_share_mouth_color_only() {
        let surprise = FaceColors::for_emotion(Emotion::Surprise);
        let fear = FaceColors::for_emotion(Emotion::Fear);
        assert_eq!(surprise.mouth, fear.mouth);
        assert_ne!(surprise.eyes, fear.eyes);
        assert_ne!(surprise.background, fear.background);
    }
}
