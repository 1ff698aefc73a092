use crate::config::ThemeColors;
use crate::model::NodeStyle;
use changeviz_core::Change;

/// Fill and stroke for a node marker.
///
/// Conflicted changes use the conflict color, everything else the normal color; the stroke is
/// always that base color. Checked-out changes are filled solid with it, the rest are outlined
/// over the background color.
pub fn resolve_node_style(change: &Change, theme: &ThemeColors) -> NodeStyle {
    let base = if change.has_conflict() {
        &theme.conflict
    } else {
        &theme.normal
    };
    let fill = if change.is_checked_out {
        base
    } else {
        &theme.background
    };
    NodeStyle {
        fill: fill.clone(),
        stroke: base.clone(),
    }
}
