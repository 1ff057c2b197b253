//! Layout configuration parsed from environment variables.

pub const DEFAULT_NODE_WIDTH: f64 = 160.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 60.0;
pub const DEFAULT_NODE_SPACING: f64 = 200.0;
pub const DEFAULT_RANK_SPACING: f64 = 140.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive number, got `{value}`")]
    Invalid { var: &'static str, value: String },
}

/// Node box size and spacing, in logical pixels before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Center-to-center distance between neighbours in the same rank.
    pub node_spacing: f64,
    /// Center-to-center distance between consecutive ranks.
    pub rank_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            node_spacing: DEFAULT_NODE_SPACING,
            rank_spacing: DEFAULT_RANK_SPACING,
        }
    }
}

impl LayoutConfig {
    /// Build layout config from environment variables.
    ///
    /// Optional, each defaulting to the matching `DEFAULT_*` constant:
    /// - `FLOWCHART_NODE_WIDTH`
    /// - `FLOWCHART_NODE_HEIGHT`
    /// - `FLOWCHART_NODE_SPACING`
    /// - `FLOWCHART_RANK_SPACING`
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when a variable is set but is not a positive
    /// finite number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LayoutConfig::from_env`] over an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`LayoutConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            node_width: parse_dimension(&lookup, "FLOWCHART_NODE_WIDTH", DEFAULT_NODE_WIDTH)?,
            node_height: parse_dimension(&lookup, "FLOWCHART_NODE_HEIGHT", DEFAULT_NODE_HEIGHT)?,
            node_spacing: parse_dimension(&lookup, "FLOWCHART_NODE_SPACING", DEFAULT_NODE_SPACING)?,
            rank_spacing: parse_dimension(&lookup, "FLOWCHART_RANK_SPACING", DEFAULT_RANK_SPACING)?,
        })
    }
}

fn parse_dimension(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: f64,
) -> Result<f64, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ConfigError::Invalid { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
