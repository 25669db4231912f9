use std::env;

use crate::controller::frame_updater::{DepthOrder, DEFAULT_ROTATION_STEP};

pub const ENV_DEPTH_ORDER: &str = "SPINCUBE_DEPTH_ORDER";
pub const ENV_ROTATION_STEP: &str = "SPINCUBE_ROTATION_STEP";
pub const ENV_VSYNC: &str = "SPINCUBE_VSYNC";

/// Runtime settings. Defaults reproduce the classic demo; environment
/// variables override individual fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Radians per frame per held key. Rotation speed follows the frame rate.
    pub rotation_step: f32,
    pub depth_order: DepthOrder,
    pub vsync: bool,
    pub show_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "spincube".to_string(),
            window_width: 800,
            window_height: 800,
            rotation_step: DEFAULT_ROTATION_STEP,
            depth_order: DepthOrder::Reference,
            vsync: false,
            show_overlay: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup`; malformed values are logged and skipped.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_DEPTH_ORDER) {
            match raw.parse::<DepthOrder>() {
                Ok(order) => settings.depth_order = order,
                Err(e) => tracing::warn!("ignoring {ENV_DEPTH_ORDER}: {e}"),
            }
        }

        if let Some(raw) = lookup(ENV_ROTATION_STEP) {
            match raw.trim().parse::<f32>() {
                Ok(step) if step.is_finite() && step > 0.0 => settings.rotation_step = step,
                _ => tracing::warn!("ignoring {ENV_ROTATION_STEP}={raw:?}: expected a positive number of radians"),
            }
        }

        if let Some(raw) = lookup(ENV_VSYNC) {
            match parse_flag(&raw) {
                Some(flag) => settings.vsync = flag,
                None => tracing::warn!("ignoring {ENV_VSYNC}={raw:?}: expected on/off"),
            }
        }

        settings
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_overrides() {
        let settings = settings_from(&[]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.window_width, 800);
        assert_eq!(settings.window_height, 800);
        assert_eq!(settings.depth_order, DepthOrder::Reference);
        assert_eq!(settings.present_mode(), wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn test_overrides_apply() {
        let settings = settings_from(&[
            (ENV_DEPTH_ORDER, "sorted"),
            (ENV_ROTATION_STEP, "0.01"),
            (ENV_VSYNC, "on"),
        ]);
        assert_eq!(settings.depth_order, DepthOrder::Sorted);
        assert_eq!(settings.rotation_step, 0.01);
        assert!(settings.vsync);
        assert_eq!(settings.present_mode(), wgpu::PresentMode::AutoVsync);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let settings = settings_from(&[
            (ENV_DEPTH_ORDER, "zigzag"),
            (ENV_ROTATION_STEP, "-0.5"),
            (ENV_VSYNC, "maybe"),
        ]);
        assert_eq!(settings, Settings::default());

        let settings = settings_from(&[(ENV_ROTATION_STEP, "NaN")]);
        assert_eq!(settings.rotation_step, DEFAULT_ROTATION_STEP);
    }
}
