//! Edge routing between already-placed nodes.
//!
//! Every route is a pure function of its two endpoint grid cells and the scale/radius settings.
//! Endpoints are first canonicalized so the route always starts on the larger row; routing
//! `(a, b)` and `(b, a)` across different rows therefore yields identical geometry.
//!
//! Same-column endpoints get a straight segment. Everything else gets an orthogonal route: a
//! horizontal run along the start row that stops one radius short of the end column, a single
//! quarter-circle arc into that column, and a vertical run into the end point.

use crate::config::LayoutConfig;
use crate::coords::map_with;
use crate::model::{ArcSweep, EdgeLayout, PathKind, PathSegment, Point};
use crate::svg::path_data;
use changeviz_core::{Edge, GraphSnapshot, GridPos};

#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    pub kind: PathKind,
    pub start: Point,
    pub end: Point,
    pub segments: Vec<PathSegment>,
}

/// Orders two endpoints so the one on the larger row comes first. Equal rows keep input order.
pub fn canonicalize(from: GridPos, to: GridPos) -> (GridPos, GridPos) {
    if to.row > from.row {
        (to, from)
    } else {
        (from, to)
    }
}

/// Arc direction for a corner joining a horizontal run of sign `dx` to a vertical run of sign
/// `dy`: clockwise when the signs differ. A zero `dy` counts as non-negative.
pub fn arc_sweep(dx: f64, dy: f64) -> ArcSweep {
    if (dx < 0.0) != (dy < 0.0) {
        ArcSweep::Clockwise
    } else {
        ArcSweep::CounterClockwise
    }
}

pub fn route_between(from: GridPos, to: GridPos, config: &LayoutConfig) -> RoutedPath {
    let (a, b) = canonicalize(from, to);
    let start = map_with(a, config);
    let end = map_with(b, config);

    if a.column == b.column {
        return RoutedPath {
            kind: PathKind::Straight,
            start,
            end,
            segments: vec![
                PathSegment::MoveTo { to: start },
                PathSegment::LineTo { to: end },
            ],
        };
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let sx = dx.signum();
    let sy = if dy < 0.0 { -1.0 } else { 1.0 };
    // Never let the corner overshoot either run.
    let radius = config.radius.min(dx.abs()).min(dy.abs());

    let corner_in = Point::new(end.x - sx * radius, start.y);
    let corner_out = Point::new(end.x, start.y + sy * radius);

    RoutedPath {
        kind: PathKind::Orthogonal,
        start,
        end,
        segments: vec![
            PathSegment::MoveTo { to: start },
            PathSegment::LineTo { to: corner_in },
            PathSegment::Arc {
                radius,
                sweep: arc_sweep(dx, dy),
                to: corner_out,
            },
            PathSegment::LineTo { to: end },
        ],
    }
}

/// Routes one snapshot edge, or `None` when either endpoint is missing from the snapshot.
pub fn route_edge(
    snapshot: &GraphSnapshot,
    edge: &Edge,
    config: &LayoutConfig,
) -> Option<EdgeLayout> {
    let (from_idx, to_idx) = snapshot.resolve_edge(edge).ok()?;
    Some(edge_layout(snapshot, edge, from_idx, to_idx, config))
}

fn edge_layout(
    snapshot: &GraphSnapshot,
    edge: &Edge,
    from_idx: usize,
    to_idx: usize,
    config: &LayoutConfig,
) -> EdgeLayout {
    let changes = snapshot.changes();
    let from = changes[from_idx].grid_pos();
    let to = changes[to_idx].grid_pos();
    let routed = route_between(from, to, config);
    let d = path_data(&routed.segments);
    EdgeLayout {
        from: edge.from.clone(),
        to: edge.to.clone(),
        kind: routed.kind,
        start: routed.start,
        end: routed.end,
        segments: routed.segments,
        d,
    }
}

/// Routes every edge in input order. Returns the routes and the number of dropped edges.
pub fn route_edges(snapshot: &GraphSnapshot, config: &LayoutConfig) -> (Vec<EdgeLayout>, usize) {
    let mut out = Vec::with_capacity(snapshot.edges().len());
    let mut dropped = 0usize;
    for edge in snapshot.edges() {
        match snapshot.resolve_edge(edge) {
            Ok((from_idx, to_idx)) => {
                out.push(edge_layout(snapshot, edge, from_idx, to_idx, config));
            }
            Err(missing) => {
                dropped += 1;
                tracing::debug!(
                    from = %edge.from,
                    to = %edge.to,
                    missing,
                    "dropping edge with unknown endpoint"
                );
            }
        }
    }
    (out, dropped)
}
