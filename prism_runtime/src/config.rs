use std::sync::Arc;

pub const DEFAULT_COLOR_PRESET: &str = "erdc_rainbow_bright";

/// Engine-wide defaults applied when a description leaves a setting out.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Lookup-table preset used by representations without `color_map_preset`.
    pub default_color_preset: Arc<str>,
    /// Volume properties interpolate linearly between voxels when set.
    pub linear_interpolation: bool,
}

impl SyncConfig {
    pub fn with_color_preset(mut self, preset: impl AsRef<str>) -> Self {
        self.default_color_preset = Arc::<str>::from(preset.as_ref());
        self
    }

    pub fn with_linear_interpolation(mut self, enabled: bool) -> Self {
        self.linear_interpolation = enabled;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            default_color_preset: Arc::<str>::from(DEFAULT_COLOR_PRESET),
            linear_interpolation: true,
        }
    }
}
