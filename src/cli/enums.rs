//! CLI enum types.

use clap::ValueEnum;

use crate::transform::AvatarStyle;

/// Avatar style selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StyleArg {
    /// Edge + color cartoon filter
    #[default]
    Stylize,
    /// Emoji face matching the detected emotion
    Emotion,
}

impl From<StyleArg> for AvatarStyle {
    fn from(s: StyleArg) -> Self {
        match s {
            StyleArg::Stylize => AvatarStyle::Stylize,
            StyleArg::Emotion => AvatarStyle::Emotion,
        }
    }
}
