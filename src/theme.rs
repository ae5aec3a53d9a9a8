use std::fmt;

use serde::{Deserialize, Serialize};

use crate::observe::Observable;

pub const COLOR_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Light,
    Dark,
}

impl DisplayMode {
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Reads the mode from a color-scheme source. `None` while the host has
    /// not reported a preference.
    pub fn detect(prefers_dark: &impl Observable<bool>) -> Option<Self> {
        prefers_dark.current().map(Self::from_prefers_dark)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::PushSource;

    #[test]
    fn test_mode_from_preference() {
        assert_eq!(DisplayMode::from_prefers_dark(true), DisplayMode::Dark);
        assert_eq!(DisplayMode::from_prefers_dark(false), DisplayMode::Light);
        assert_eq!(DisplayMode::Dark.to_string(), "dark");
    }

    #[test]
    fn test_detect_unresolved_until_published() {
        let source = PushSource::new();
        assert_eq!(DisplayMode::detect(&source), None);
        source.publish(true);
        assert_eq!(DisplayMode::detect(&source), Some(DisplayMode::Dark));
    }

    #[test]
    fn test_serde_lowercase() {
        let mode: DisplayMode = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(mode, DisplayMode::Light);
    }
}
