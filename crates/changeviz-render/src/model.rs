use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub fill: String,
    pub stroke: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub id: String,
    pub column: u32,
    pub row: u32,
    pub x: f64,
    pub y: f64,
    pub style: NodeStyle,
    pub has_conflict: bool,
    pub is_checked_out: bool,
    pub clickable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    Straight,
    Orthogonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcSweep {
    Clockwise,
    CounterClockwise,
}

impl ArcSweep {
    /// SVG `sweep-flag` for this direction.
    pub fn svg_flag(self) -> u8 {
        match self {
            ArcSweep::Clockwise => 1,
            ArcSweep::CounterClockwise => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo {
        to: Point,
    },
    LineTo {
        to: Point,
    },
    /// Quarter-circle arc from the current point to `to`.
    Arc {
        radius: f64,
        sweep: ArcSweep,
        to: Point,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeLayout {
    /// Logical source, as given in the snapshot.
    pub from: String,
    /// Logical target, as given in the snapshot.
    pub to: String,
    pub kind: PathKind,
    /// Canonical start of the route: the endpoint on the larger row.
    pub start: Point,
    pub end: Point,
    pub segments: Vec<PathSegment>,
    /// SVG path data for `segments`.
    pub d: String,
}

impl EdgeLayout {
    pub fn arc_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Arc { .. }))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelName {
    /// Shown as-is (the synthetic working node).
    Verbatim { text: String },
    /// Shared prefix and disambiguating suffix, styled separately.
    Split { prefix: String, suffix: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelDescription {
    Hidden,
    Text { text: String },
    Placeholder { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelEntry {
    pub id: String,
    /// Vertical offset of the entry's top edge.
    pub top: f64,
    pub height: f64,
    pub name: PanelName,
    pub description: PanelDescription,
    pub clickable: bool,
    pub is_checked_out: bool,
    pub has_conflict: bool,
    #[serde(default)]
    pub tooltip: Option<String>,
}

/// Everything a rendering surface needs for one snapshot. Holds no references into the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub canvas: CanvasSize,
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub panel: Vec<PanelEntry>,
    /// Edges skipped because an endpoint is not part of the snapshot.
    pub dropped_edges: usize,
}

impl RenderModel {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn panel_entry(&self, id: &str) -> Option<&PanelEntry> {
        self.panel.iter().find(|p| p.id == id)
    }

    pub fn to_json_string(&self, pretty: bool) -> crate::Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }
}
