use crate::{Error, Result};
use changeviz_core::GraphConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_X_SCALE: f64 = 8.0;
pub const DEFAULT_Y_SCALE: f64 = 20.0;
pub const DEFAULT_RADIUS: f64 = 4.0;
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;
pub const DEFAULT_NODE_RADIUS: f64 = 3.0;
pub const DEFAULT_EMPTY_DESCRIPTION: &str = "no description";

/// The three semantic colors. Values are opaque to the layout pass and passed through verbatim,
/// so any CSS color (including `var(--...)`) works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub normal: String,
    pub conflict: String,
    pub background: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            normal: "#3794ff".to_string(),
            conflict: "#f14c4c".to_string(),
            background: "#1e1e1e".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal pixels per grid column.
    pub x_scale: f64,
    /// Vertical pixels per grid row.
    pub y_scale: f64,
    /// Corner radius of orthogonal edge routes.
    pub radius: f64,
    /// Height of one info-panel entry; entries are centered on their node's row.
    pub row_height: f64,
    /// Radius of the node marker. Only the SVG emitter reads this.
    pub node_radius: f64,
    pub theme: ThemeColors,
    /// Placeholder shown for changes with an empty description.
    pub empty_description: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x_scale: DEFAULT_X_SCALE,
            y_scale: DEFAULT_Y_SCALE,
            radius: DEFAULT_RADIUS,
            row_height: DEFAULT_ROW_HEIGHT,
            node_radius: DEFAULT_NODE_RADIUS,
            theme: ThemeColors::default(),
            empty_description: DEFAULT_EMPTY_DESCRIPTION.to_string(),
        }
    }
}

impl LayoutConfig {
    /// Reads a layout config from host JSON, falling back to defaults for absent keys.
    ///
    /// Recognized keys: `layout.{xScale,yScale,radius,rowHeight,nodeRadius}`,
    /// `theme.{normal,conflict,background}` and `panel.emptyDescription`. The result is validated.
    pub fn from_config(cfg: &GraphConfig) -> Result<Self> {
        let d = Self::default();
        let out = Self {
            x_scale: cfg.get_f64("layout.xScale").unwrap_or(d.x_scale),
            y_scale: cfg.get_f64("layout.yScale").unwrap_or(d.y_scale),
            radius: cfg.get_f64("layout.radius").unwrap_or(d.radius),
            row_height: cfg.get_f64("layout.rowHeight").unwrap_or(d.row_height),
            node_radius: cfg.get_f64("layout.nodeRadius").unwrap_or(d.node_radius),
            theme: ThemeColors {
                normal: cfg
                    .get_str("theme.normal")
                    .map(str::to_string)
                    .unwrap_or(d.theme.normal),
                conflict: cfg
                    .get_str("theme.conflict")
                    .map(str::to_string)
                    .unwrap_or(d.theme.conflict),
                background: cfg
                    .get_str("theme.background")
                    .map(str::to_string)
                    .unwrap_or(d.theme.background),
            },
            empty_description: cfg
                .get_str("panel.emptyDescription")
                .map(str::to_string)
                .unwrap_or(d.empty_description),
        };
        out.validate()?;
        Ok(out)
    }

    pub fn half_row_height(&self) -> f64 {
        self.row_height / 2.0
    }

    /// Rejects configurations no layout pass could honor. Runs before any geometry is computed.
    pub fn validate(&self) -> Result<()> {
        fn positive(field: &'static str, v: f64) -> Result<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidConfig {
                    field,
                    value: v.to_string(),
                })
            }
        }
        fn color(field: &'static str, v: &str) -> Result<()> {
            if v.trim().is_empty() {
                Err(Error::InvalidConfig {
                    field,
                    value: format!("{v:?}"),
                })
            } else {
                Ok(())
            }
        }

        positive("x_scale", self.x_scale)?;
        positive("y_scale", self.y_scale)?;
        positive("radius", self.radius)?;
        positive("row_height", self.row_height)?;
        positive("node_radius", self.node_radius)?;
        color("theme.normal", &self.theme.normal)?;
        color("theme.conflict", &self.theme.conflict)?;
        color("theme.background", &self.theme.background)?;
        Ok(())
    }
}
