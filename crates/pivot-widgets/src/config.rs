#![forbid(unsafe_code)]

//! Pivot configuration.
//!
//! Every timing and layout constant the pivot uses lives here so hosts can
//! tune them without touching behavior. Defaults reproduce the stock look.
//!
//! ```
//! use pivot_widgets::config::PivotConfig;
//!
//! let config = PivotConfig::from_json(r#"{ "animations_enabled": false }"#).unwrap();
//! assert!(!config.animations_enabled);
//! assert_eq!(config.header_horizontal_margin, 12.0);
//! ```

use pivot_core::gesture::SwipeConfig;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{PivotError, Result};

/// Tunable pivot behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotConfig {
    /// Horizontal margin on each side of a header, in pixels.
    pub header_horizontal_margin: f32,
    /// Duration of header slides and header-state entry transitions (ms).
    pub header_slide_ms: u64,
    /// Duration of the outgoing item's fade-out (ms).
    pub item_hide_ms: u64,
    /// Duration of the incoming item's fade and slide-in (ms).
    pub item_show_ms: u64,
    /// Horizontal distance the incoming item slides in from, in pixels.
    pub item_show_offset: f32,
    /// Duration of the fade-out of the header scrolled past on backward
    /// overflow navigation (ms).
    pub peek_fade_ms: u64,
    /// Overflow headers wider than this fraction of the header area are
    /// truncated with an ellipsis.
    pub overflow_max_header_ratio: f32,
    /// Headers rendered before the selection in overflow mode.
    pub overflow_leading_headers: usize,
    /// Headers rendered before the selection in overflow mode right after a
    /// backward navigation.
    pub overflow_leading_headers_backward: usize,
    /// Global animation switch. When off, every transition finalizes at once.
    pub animations_enabled: bool,
    /// Whether swipes over the content area navigate. When off, both pointer
    /// endpoints must lie within the header strip.
    pub content_swipe_enabled: bool,
    /// Swipe recognition thresholds.
    pub swipe: SwipeConfig,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            header_horizontal_margin: 12.0,
            header_slide_ms: 250,
            item_hide_ms: 67,
            item_show_ms: 367,
            item_show_offset: 40.0,
            peek_fade_ms: 167,
            overflow_max_header_ratio: 0.8,
            overflow_leading_headers: 1,
            overflow_leading_headers_backward: 2,
            animations_enabled: true,
            content_swipe_enabled: true,
            swipe: SwipeConfig::default(),
        }
    }
}

impl PivotConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that values are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.header_horizontal_margin >= 0.0) {
            return Err(PivotError::Config(
                "header_horizontal_margin must be non-negative".into(),
            ));
        }
        if !(self.overflow_max_header_ratio > 0.0 && self.overflow_max_header_ratio <= 1.0) {
            return Err(PivotError::Config(
                "overflow_max_header_ratio must be in (0, 1]".into(),
            ));
        }
        if self.overflow_leading_headers_backward < self.overflow_leading_headers {
            return Err(PivotError::Config(
                "overflow_leading_headers_backward must be >= overflow_leading_headers".into(),
            ));
        }
        if !(self.item_show_offset >= 0.0) {
            return Err(PivotError::Config("item_show_offset must be non-negative".into()));
        }
        let swipe = &self.swipe;
        if !(swipe.max_vertical_ratio > 0.0)
            || !(swipe.min_horizontal_px >= 0.0)
            || !(swipe.viewport_fraction > 0.0 && swipe.viewport_fraction <= 1.0)
        {
            return Err(PivotError::Config("swipe thresholds out of range".into()));
        }
        Ok(())
    }

    /// Header slide duration.
    #[must_use]
    pub fn header_slide(&self) -> Duration {
        Duration::from_millis(self.header_slide_ms)
    }

    /// Item fade-out duration.
    #[must_use]
    pub fn item_hide(&self) -> Duration {
        Duration::from_millis(self.item_hide_ms)
    }

    /// Item show duration.
    #[must_use]
    pub fn item_show(&self) -> Duration {
        Duration::from_millis(self.item_show_ms)
    }

    /// Peek header fade duration.
    #[must_use]
    pub fn peek_fade(&self) -> Duration {
        Duration::from_millis(self.peek_fade_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PivotConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.header_slide(), Duration::from_millis(250));
        assert_eq!(config.overflow_leading_headers, 1);
        assert_eq!(config.overflow_leading_headers_backward, 2);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            PivotConfig::from_json(r#"{ "item_show_ms": 500, "swipe": { "viewport_fraction": 0.5 } }"#)
                .expect("valid config");
        assert_eq!(config.item_show(), Duration::from_millis(500));
        assert_eq!(config.swipe.viewport_fraction, 0.5);
        assert_eq!(config.swipe.min_horizontal_px, 32.0);
        assert_eq!(config.item_hide_ms, 67);
    }

    #[test]
    fn json_round_trip() {
        let mut config = PivotConfig::default();
        config.content_swipe_enabled = false;
        let json = serde_json::to_string(&config).expect("serialize");
        assert_eq!(PivotConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn rejects_bad_ratio() {
        let err = PivotConfig::from_json(r#"{ "overflow_max_header_ratio": 1.5 }"#).unwrap_err();
        assert!(matches!(err, PivotError::Config(_)));
    }

    #[test]
    fn rejects_inverted_window() {
        let err = PivotConfig::from_json(
            r#"{ "overflow_leading_headers": 3, "overflow_leading_headers_backward": 2 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, PivotError::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(PivotConfig::from_json("{").is_err());
    }
}
