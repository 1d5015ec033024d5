//! Configuration file support for reel
//!
//! Config file location: `~/.config/reel/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [playback]
//! speed = 0.08
//! arrow_speed = 0.6
//! autoplay = true
//! resume_delay_ms = 3000
//! hover_pause = false
//! hold_delay_ms = 600
//! hold_release_ms = 180
//!
//! [ui]
//! zen = false
//! slider = true
//! gap = 1
//! hint_ms = 1500
//! ```

use crate::app::{clamp_speed, AppSettings};
use reel_core::{ArbiterConfig, EngineConfig};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// UI configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Start in zen mode (no status bar)
    pub zen: bool,
    /// Show the slider column
    pub slider: bool,
    /// Blank rows between cards
    pub gap: u16,
    /// How long status hints stay visible, in milliseconds
    pub hint_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            zen: false,
            slider: true,
            gap: 1,
            hint_ms: 1500,
        }
    }
}

/// Playback configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Rows advanced per tick while auto-scrolling
    pub speed: f64,
    /// Rows moved per tick while an arrow is held
    pub arrow_speed: f64,
    /// Start with auto-scroll enabled
    pub autoplay: bool,
    /// Delay before auto-scroll resumes after an interaction
    pub resume_delay_ms: u64,
    /// Pause while the mouse hovers the timeline
    pub hover_pause: bool,
    /// Terminals without key release events: how long a fresh key hold waits
    /// for the first repeat before it counts as released
    pub hold_delay_ms: u64,
    /// Terminals without key release events: release a held arrow key after
    /// this long without a repeat
    pub hold_release_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 0.08,
            arrow_speed: 0.6,
            autoplay: true,
            resume_delay_ms: 3000,
            hover_pause: false,
            hold_delay_ms: 600,
            hold_release_ms: 180,
        }
    }
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub ui: UiConfig,
    pub playback: PlaybackConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG_CONFIG_HOME (if set)
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("reel").join("config.toml"));
        }

        // 2. ~/.config/reel/config.toml (XDG default, works on all platforms)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("reel").join("config.toml"));
        }

        // 3. Platform-specific config dir (~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("reel").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from XDG config path
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| Self::parse(&content))
            .unwrap_or_default()
    }

    fn parse(content: &str) -> Option<Self> {
        toml::from_str(content)
            .map_err(|e| {
                eprintln!("Warning: Failed to parse config: {}", e);
                log::warn!("failed to parse config: {}", e);
                e
            })
            .ok()
    }

    /// Resolve startup settings for the app
    pub fn settings(&self) -> AppSettings {
        let defaults = PlaybackConfig::default();
        AppSettings {
            engine: EngineConfig {
                base_speed: clamp_speed(self.playback.speed, defaults.speed),
                autoplay: self.playback.autoplay,
            },
            arbiter: ArbiterConfig {
                arrow_speed: clamp_speed(self.playback.arrow_speed, defaults.arrow_speed),
                resume_delay: Duration::from_millis(self.playback.resume_delay_ms),
                hover_pause: self.playback.hover_pause,
            },
            hold_delay: Duration::from_millis(self.playback.hold_delay_ms),
            hold_release: Duration::from_millis(self.playback.hold_release_ms),
            hint_duration: Duration::from_millis(self.ui.hint_ms),
            gap: self.ui.gap,
            slider_visible: self.ui.slider,
            zen: self.ui.zen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::parse("[playback]\nspeed = 0.2\n").unwrap();
        assert_eq!(config.playback.speed, 0.2);
        assert_eq!(config.playback.resume_delay_ms, 3000);
        assert!(config.ui.slider);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Config::parse("[playback]\nspeed = \"fast\"\n").is_none());
    }

    #[test]
    fn test_settings_conversion() {
        let config = Config::parse(
            "[playback]\nresume_delay_ms = 500\nhover_pause = true\n[ui]\ngap = 0\n",
        )
        .unwrap();
        let settings = config.settings();
        assert_eq!(settings.arbiter.resume_delay, Duration::from_millis(500));
        assert!(settings.arbiter.hover_pause);
        assert_eq!(settings.gap, 0);
        assert_eq!(settings.engine.base_speed, 0.08);
        assert_eq!(settings.hold_delay, Duration::from_millis(600));
    }

    #[test]
    fn test_speeds_are_clamped() {
        let config = Config::parse("[playback]\nspeed = 1e17\narrow_speed = -3.0\n").unwrap();
        let settings = config.settings();
        assert_eq!(settings.engine.base_speed, 2.0);
        assert_eq!(settings.arbiter.arrow_speed, 0.6);

        let config = Config::parse("[playback]\nspeed = nan\n").unwrap();
        assert_eq!(config.settings().engine.base_speed, 0.08);
    }
}
