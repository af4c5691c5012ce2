//! Simulation parameters and their defaults.
//!
//! Cell size and density are responsive: they are picked from the viewport width through the same
//! breakpoints the hosting page uses for its layout.

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::PixelSize;
use crate::render::CellGeometry;
use crate::render::DEFAULT_CELL_SIZE;
use crate::rule_set::RuleError;
use crate::rule_set::RuleSet;

/// Wall-clock time between generations.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(150);

/// Probability of a cell being alive after a (re)seed.
pub const DEFAULT_DENSITY: f64 = 0.15;

/// Viewport width classes, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    Base,
    Sm,
    Md,
    Lg,
    Xl,
    Xxl,
}

impl Breakpoint {
    /// Smallest viewport width, in pixels, of each breakpoint.
    const MIN_WIDTHS: [(PixelSize, Breakpoint); 6] = [
        (1536, Breakpoint::Xxl),
        (1280, Breakpoint::Xl),
        (992, Breakpoint::Lg),
        (768, Breakpoint::Md),
        (480, Breakpoint::Sm),
        (0, Breakpoint::Base),
    ];

    pub fn for_width(width: PixelSize) -> Self {
        Self::MIN_WIDTHS
            .iter()
            .find(|&&(min, _)| width >= min)
            .map_or(Breakpoint::Base, |&(_, bp)| bp)
    }

    /// Multiplier applied to [`DEFAULT_CELL_SIZE`]. Small screens get smaller cells.
    pub fn cell_size_multiplier(self) -> f64 {
        match self {
            Breakpoint::Base => 0.7,
            Breakpoint::Sm => 0.8,
            _ => 1.0,
        }
    }

    /// Small screens get a denser pattern so it still reads as texture.
    pub fn density(self) -> f64 {
        match self {
            Breakpoint::Base => 0.25,
            Breakpoint::Sm => 0.2,
            _ => DEFAULT_DENSITY,
        }
    }

    pub fn cell_size(self) -> PixelSize {
        (DEFAULT_CELL_SIZE as f64 * self.cell_size_multiplier()).round() as PixelSize
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Cell size must be positive")]
    ZeroCellSize,

    #[error("Invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Invalid rule in {var}: {source}")]
    InvalidRule {
        var: &'static str,
        #[source]
        source: RuleError,
    },
}

/// The parameters whose change restarts the simulation from scratch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    interval: Duration,
    density: f64,
    cell_size: PixelSize,
}

impl SimulationParams {
    /// Density is clamped into `[0, 1]`.
    pub fn new(
        interval: Duration,
        density: f64,
        cell_size: PixelSize,
    ) -> Result<Self, ConfigError> {
        if cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }

        let density = if density.is_nan() {
            warn!("Density is NaN. Using the default");
            DEFAULT_DENSITY
        } else if !(0f64..=1f64).contains(&density) {
            warn!(density, "Density out of range. Clamping into [0, 1]");
            density.clamp(0f64, 1f64)
        } else {
            density
        };

        Ok(Self {
            interval,
            density,
            cell_size,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn cell_size(&self) -> PixelSize {
        self.cell_size
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            density: DEFAULT_DENSITY,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// Everything a driver needs that does not come from the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub interval: Duration,

    /// Fixed density. When unset, density follows the viewport's breakpoint.
    pub density: Option<f64>,

    /// Fixed cell size. When unset, cell size follows the viewport's breakpoint.
    pub cell_size: Option<PixelSize>,

    /// Gap and global offset. The cell size stored here is ignored in favor of the one above.
    pub geometry: CellGeometry,

    pub rules: RuleSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            density: None,
            cell_size: None,
            geometry: CellGeometry::default(),
            rules: RuleSet::default(),
        }
    }
}

impl Config {
    pub const INTERVAL_VAR: &'static str = "BACKDROP_INTERVAL_MS";
    pub const DENSITY_VAR: &'static str = "BACKDROP_DENSITY";
    pub const CELL_SIZE_VAR: &'static str = "BACKDROP_CELL_SIZE";
    pub const RULE_VAR: &'static str = "BACKDROP_RULE";

    /// Defaults, overridden by any of the `BACKDROP_*` environment variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(ms) = parse_var::<u64>(&lookup, Self::INTERVAL_VAR)? {
            config.interval = Duration::from_millis(ms);
        }

        config.density = parse_var(&lookup, Self::DENSITY_VAR)?;

        if let Some(cell_size) = parse_var(&lookup, Self::CELL_SIZE_VAR)? {
            if cell_size == 0 {
                return Err(ConfigError::ZeroCellSize);
            }
            config.cell_size = Some(cell_size);
        }

        if let Some(rule) = lookup(Self::RULE_VAR) {
            config.rules = rule.parse().map_err(|source| ConfigError::InvalidRule {
                var: Self::RULE_VAR,
                source,
            })?;
        }

        Ok(config)
    }

    /// Parameters for a viewport `width` pixels wide.
    pub fn params_for_width(&self, width: PixelSize) -> Result<SimulationParams, ConfigError> {
        let bp = Breakpoint::for_width(width);

        SimulationParams::new(
            self.interval,
            self.density.unwrap_or_else(|| bp.density()),
            self.cell_size.unwrap_or_else(|| bp.cell_size()),
        )
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    match value.trim().parse() {
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(ConfigError::InvalidValue { var, value }),
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::Breakpoint;
    use super::Config;
    use super::ConfigError;
    use super::SimulationParams;
    use crate::rule_set::RuleSet;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |var| vars.get(var).cloned()
    }

    #[test]
    fn breakpoints() {
        assert_eq!(Breakpoint::for_width(0), Breakpoint::Base);
        assert_eq!(Breakpoint::for_width(479), Breakpoint::Base);
        assert_eq!(Breakpoint::for_width(480), Breakpoint::Sm);
        assert_eq!(Breakpoint::for_width(800), Breakpoint::Md);
        assert_eq!(Breakpoint::for_width(1000), Breakpoint::Lg);
        assert_eq!(Breakpoint::for_width(4000), Breakpoint::Xxl);
    }

    #[test]
    fn responsive_cell_size() {
        assert_eq!(Breakpoint::Base.cell_size(), 14);
        assert_eq!(Breakpoint::Sm.cell_size(), 16);
        assert_eq!(Breakpoint::Md.cell_size(), 20);
        assert_eq!(Breakpoint::Xl.cell_size(), 20);
    }

    #[test]
    fn density_is_clamped() {
        let params = SimulationParams::new(Duration::ZERO, 1.5, 10).unwrap();
        assert_eq!(params.density(), 1.0);

        let params = SimulationParams::new(Duration::ZERO, -0.5, 10).unwrap();
        assert_eq!(params.density(), 0.0);
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        assert_eq!(
            SimulationParams::new(Duration::ZERO, 0.5, 0),
            Err(ConfigError::ZeroCellSize)
        );
    }

    #[test]
    fn env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BACKDROP_INTERVAL_MS", "40"),
            ("BACKDROP_DENSITY", "0.5"),
            ("BACKDROP_RULE", "B36/S23"),
        ]))
        .unwrap();

        assert_eq!(config.interval, Duration::from_millis(40));
        assert_eq!(config.density, Some(0.5));
        assert_eq!(config.cell_size, None);
        assert_eq!(config.rules, "B36/S23".parse::<RuleSet>().unwrap());

        let params = config.params_for_width(320).unwrap();
        assert_eq!(params.cell_size(), 14);
        assert_eq!(params.density(), 0.5);
    }

    #[test]
    fn env_errors_name_the_variable() {
        let err = Config::from_lookup(lookup(&[("BACKDROP_CELL_SIZE", "big")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "BACKDROP_CELL_SIZE",
                value: "big".to_string()
            }
        );

        let err = Config::from_lookup(lookup(&[("BACKDROP_RULE", "B9")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid rule in BACKDROP_RULE: Neighbor count 9 is out of range, expected 0 to 8"
        );
    }

    #[test]
    fn defaults_follow_breakpoints() {
        let config = Config::default();

        assert_eq!(config.params_for_width(1600).unwrap(), SimulationParams::default());
        assert_eq!(config.params_for_width(300).unwrap().density(), 0.25);
    }
}
