#![forbid(unsafe_code)]

//! Headless layout for change graphs.
//!
//! [`layout_snapshot`] turns one [`GraphSnapshot`] into a [`RenderModel`]: pixel positions and
//! styles for every change, a routed path for every resolvable edge, and an info-panel entry per
//! change aligned with its row. The pass is synchronous and pure; running it twice on the same
//! input produces identical output.

pub mod config;
pub mod coords;
pub mod interaction;
pub mod model;
pub mod node_state;
pub mod panel;
pub mod routing;
pub mod svg;

pub use config::{LayoutConfig, ThemeColors};
pub use interaction::{
    HighlightState, InteractionEvent, InteractionMediator, PointerAction, PointerEvent,
    PointerTarget,
};
pub use model::RenderModel;

use crate::model::NodeLayout;
use changeviz_core::{Change, GraphSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout configuration: {field} = {value}")]
    InvalidConfig { field: &'static str, value: String },
    #[error(transparent)]
    Core(#[from] changeviz_core::Error),
    #[error("render model JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn node_layout(change: &Change, config: &LayoutConfig) -> NodeLayout {
    let p = coords::map_with(change.grid_pos(), config);
    NodeLayout {
        id: change.id.clone(),
        column: change.column,
        row: change.row,
        x: p.x,
        y: p.y,
        style: node_state::resolve_node_style(change, &config.theme),
        has_conflict: change.has_conflict(),
        is_checked_out: change.is_checked_out,
        clickable: !change.is_synthetic() && !change.is_checked_out,
    }
}

/// Lays out one snapshot.
///
/// The configuration is validated first; an invalid configuration fails the whole pass before
/// any geometry is produced. Edges with an endpoint outside the snapshot are skipped and counted
/// in [`RenderModel::dropped_edges`].
pub fn layout_snapshot(snapshot: &GraphSnapshot, config: &LayoutConfig) -> Result<RenderModel> {
    config.validate()?;

    let span = tracing::debug_span!(
        "layout_snapshot",
        nodes = snapshot.len(),
        edges = snapshot.edges().len()
    );
    let _enter = span.enter();

    for (cell, members) in snapshot.overlapping_cells() {
        let ids: Vec<&str> = members
            .iter()
            .filter_map(|&i| snapshot.change(i))
            .map(|c| c.id.as_str())
            .collect();
        tracing::warn!(
            column = cell.column,
            row = cell.row,
            changes = ?ids,
            "changes share a grid cell; their panel entries will overlap"
        );
    }

    let nodes = snapshot
        .changes()
        .iter()
        .map(|c| node_layout(c, config))
        .collect();
    let panel = snapshot
        .changes()
        .iter()
        .map(|c| panel::panel_entry(c, config))
        .collect();
    let (edges, dropped_edges) = routing::route_edges(snapshot, config);

    tracing::debug!(
        routed = edges.len(),
        dropped = dropped_edges,
        "layout pass complete"
    );

    Ok(RenderModel {
        canvas: coords::canvas_size(snapshot, config),
        nodes,
        edges,
        panel,
        dropped_edges,
    })
}
