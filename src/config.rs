//! Construction-time settings for the button controller and the menu.

use crate::scheduler::Millis;

/// Default minimum animation time before a click is committed.
pub const DEFAULT_MIN_DURATION: Millis = 700;
/// Default period of the glyph-scramble tick.
pub const DEFAULT_TICK_INTERVAL: Millis = 70;
/// Default viewport width (px) below which the menu collapses.
pub const DEFAULT_BREAKPOINT_PX: u32 = 640;

/// Error returned by config validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("tick interval {tick_interval}ms exceeds minimum duration {min_duration}ms")]
    TickLongerThanDuration { tick_interval: Millis, min_duration: Millis },
    #[error("menu breakpoint must be greater than zero")]
    ZeroBreakpoint,
    #[cfg(feature = "toml")]
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Timing for a [`DebounceController`](crate::DebounceController).
///
/// Both values are fixed once the controller is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ControllerConfig {
    /// Minimum time the animation plays before a click goes through
    pub min_duration: Millis,
    /// Period of the glyph-scramble tick
    pub tick_interval: Millis,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            min_duration: DEFAULT_MIN_DURATION,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl ControllerConfig {
    /// Check that the timing is usable.
    ///
    /// A tick interval longer than the minimum duration would let a click
    /// commit before the label changed even once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.tick_interval > self.min_duration {
            return Err(ConfigError::TickLongerThanDuration {
                tick_interval: self.tick_interval,
                min_duration: self.min_duration,
            });
        }
        Ok(())
    }
}

/// Layout settings for a [`NavMenu`](crate::NavMenu).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MenuConfig {
    /// Viewports narrower than this use the collapsible mobile menu
    pub breakpoint_px: u32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self { breakpoint_px: DEFAULT_BREAKPOINT_PX }
    }
}

impl MenuConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.breakpoint_px == 0 {
            return Err(ConfigError::ZeroBreakpoint);
        }
        Ok(())
    }
}

/// Combined settings as stored in a site config file.
///
/// All sections are optional; missing ones fall back to defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SiteConfig {
    pub button: ControllerConfig,
    pub menu: MenuConfig,
}

impl SiteConfig {
    /// Parse and validate a TOML config string.
    ///
    /// ```toml
    /// [button]
    /// min_duration = 700
    /// tick_interval = 70
    ///
    /// [menu]
    /// breakpoint_px = 640
    /// ```
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.button.validate()?;
        self.menu.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.button.min_duration, 700);
        assert_eq!(config.button.tick_interval, 70);
        assert_eq!(config.menu.breakpoint_px, 640);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_tick_rejected() {
        let config = ControllerConfig { tick_interval: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));
    }

    #[test]
    fn tick_longer_than_duration_rejected() {
        let config = ControllerConfig { min_duration: 50, tick_interval: 70 };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TickLongerThanDuration { tick_interval: 70, min_duration: 50 })
        );
    }

    #[test]
    fn zero_breakpoint_rejected() {
        let config = MenuConfig { breakpoint_px: 0 };
        assert_eq!(config.validate(), Err(ConfigError::ZeroBreakpoint));
    }

    #[test]
    fn error_messages() {
        let err = ConfigError::TickLongerThanDuration { tick_interval: 90, min_duration: 10 };
        assert_eq!(err.to_string(), "tick interval 90ms exceeds minimum duration 10ms");
    }

    #[cfg(feature = "toml")]
    #[test]
    fn from_toml_partial() {
        let config = SiteConfig::from_toml_str("[button]\nmin_duration = 1000\n").unwrap();
        assert_eq!(config.button.min_duration, 1000);
        assert_eq!(config.button.tick_interval, 70);
        assert_eq!(config.menu.breakpoint_px, 640);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn from_toml_invalid() {
        let err = SiteConfig::from_toml_str("[button]\ntick_interval = 0\n").unwrap_err();
        assert_eq!(err, ConfigError::ZeroTickInterval);
    }
}
