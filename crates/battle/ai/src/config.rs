//! Planner configuration.

use battle_core::BattleSide;

/// Tuning of the spellcast planner.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "loaders", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "loaders", serde(default))]
pub struct PlannerConfig {
    /// Side the planner plays for.
    pub side: BattleSide,
    /// Weight of spell damage dealt to own stacks.
    pub friendly_damage_multiplier: i64,
    /// A cast is chosen only when its value exceeds this.
    pub minimum_cast_value: f64,
}

impl PlannerConfig {
    pub const DEFAULT_FRIENDLY_DAMAGE_MULTIPLIER: i64 = 10;

    pub fn for_side(side: BattleSide) -> Self {
        Self {
            side,
            ..Self::default()
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            side: BattleSide::Attacker,
            friendly_damage_multiplier: Self::DEFAULT_FRIENDLY_DAMAGE_MULTIPLIER,
            minimum_cast_value: 0.0,
        }
    }
}

#[cfg(feature = "loaders")]
pub use loader::ConfigLoader;

#[cfg(feature = "loaders")]
mod loader {
    use std::path::Path;

    use super::PlannerConfig;

    /// Loader for planner configuration from TOML files.
    pub struct ConfigLoader;

    impl ConfigLoader {
        /// Load config data from a TOML file.
        ///
        /// Missing keys fall back to [`PlannerConfig::default`].
        pub fn load(path: &Path) -> anyhow::Result<PlannerConfig> {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))?;
            Self::from_toml_str(&content)
        }

        pub fn from_toml_str(content: &str) -> anyhow::Result<PlannerConfig> {
            let config: PlannerConfig = toml::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse planner config TOML: {}", e))?;

            if config.friendly_damage_multiplier < 0 {
                anyhow::bail!(
                    "friendly_damage_multiplier must not be negative, got {}",
                    config.friendly_damage_multiplier
                );
            }
            Ok(config)
        }
    }
}
