//! Info-panel entries, one per change, vertically centered on the change's row.

use crate::config::LayoutConfig;
use crate::coords::row_y;
use crate::model::{PanelDescription, PanelEntry, PanelName};
use changeviz_core::Change;
use std::fmt::Write as _;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Top edge of the entry for `row`: the row's pixel y minus half an entry height.
pub fn top_offset(row: u32, config: &LayoutConfig) -> f64 {
    row_y(row, config.y_scale) - config.half_row_height()
}

pub fn panel_entry(change: &Change, config: &LayoutConfig) -> PanelEntry {
    let top = top_offset(change.row, config);
    if change.is_synthetic() {
        return PanelEntry {
            id: change.id.clone(),
            top,
            height: config.row_height,
            name: PanelName::Verbatim {
                text: change.name(),
            },
            description: PanelDescription::Hidden,
            clickable: false,
            is_checked_out: change.is_checked_out,
            has_conflict: change.has_conflict(),
            tooltip: None,
        };
    }

    let description = if change.description.is_empty() {
        PanelDescription::Placeholder {
            text: config.empty_description.clone(),
        }
    } else {
        PanelDescription::Text {
            text: change.description.clone(),
        }
    };

    PanelEntry {
        id: change.id.clone(),
        top,
        height: config.row_height,
        name: PanelName::Split {
            prefix: change.unique_prefix.clone(),
            suffix: change.unique_suffix.clone(),
        },
        description,
        clickable: !change.is_checked_out,
        is_checked_out: change.is_checked_out,
        has_conflict: change.has_conflict(),
        tooltip: Some(tooltip(change)),
    }
}

fn tooltip(change: &Change) -> String {
    let mut out = String::new();
    let _ = writeln!(&mut out, "{}", change.id);
    let _ = writeln!(
        &mut out,
        "created {}",
        change.created_at.format(TIMESTAMP_FORMAT)
    );
    let _ = write!(
        &mut out,
        "updated {}",
        change.updated_at.format(TIMESTAMP_FORMAT)
    );
    if let Some(files) = change.conflict_files.as_ref().filter(|f| !f.is_empty()) {
        out.push_str("\nconflicts:");
        for f in files {
            let _ = write!(&mut out, "\n  {f}");
        }
    }
    out
}
