use crate::{Error, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Identifier of the synthetic working node. It is drawn like any other change but never shows a
/// description and never offers a checkout affordance.
pub const SYNTHETIC_CHANGE_ID: &str = "~";

/// Grid cell assigned to a change by the external layout step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub column: u32,
    pub row: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub id: String,
    pub unique_prefix: String,
    pub unique_suffix: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub conflict_files: Option<Vec<String>>,
    #[serde(default)]
    pub is_checked_out: bool,
    pub column: u32,
    pub row: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Change {
    /// Creates a change with an empty description, no conflicts, and epoch timestamps.
    pub fn new(
        id: impl Into<String>,
        unique_prefix: impl Into<String>,
        unique_suffix: impl Into<String>,
        column: u32,
        row: u32,
    ) -> Self {
        Self {
            id: id.into(),
            unique_prefix: unique_prefix.into(),
            unique_suffix: unique_suffix.into(),
            description: String::new(),
            conflict_files: None,
            is_checked_out: false,
            column,
            row,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_conflict_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflict_files = Some(files.into_iter().map(Into::into).collect());
        self
    }

    pub fn checked_out(mut self, is_checked_out: bool) -> Self {
        self.is_checked_out = is_checked_out;
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Full display name. Always `unique_prefix` followed by `unique_suffix`.
    pub fn name(&self) -> String {
        let mut out = String::with_capacity(self.unique_prefix.len() + self.unique_suffix.len());
        out.push_str(&self.unique_prefix);
        out.push_str(&self.unique_suffix);
        out
    }

    pub fn grid_pos(&self) -> GridPos {
        GridPos {
            column: self.column,
            row: self.row,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.id == SYNTHETIC_CHANGE_ID
    }

    /// A missing list and an empty list both mean "no conflict".
    pub fn has_conflict(&self) -> bool {
        self.conflict_files
            .as_ref()
            .is_some_and(|files| !files.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Wire shape of a change. `name` is optional and only checked against the prefix/suffix split.
#[derive(Debug, Clone, Deserialize)]
struct RawChange {
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    change: Change,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    changes: Vec<RawChange>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl TryFrom<RawSnapshot> for GraphSnapshot {
    type Error = Error;

    fn try_from(raw: RawSnapshot) -> Result<Self> {
        let mut changes = Vec::with_capacity(raw.changes.len());
        for RawChange { name, change } in raw.changes {
            if let Some(name) = name {
                let (prefix, suffix) = (&change.unique_prefix, &change.unique_suffix);
                let matches = name.len() == prefix.len() + suffix.len()
                    && name.starts_with(prefix.as_str())
                    && name.ends_with(suffix.as_str());
                if !matches {
                    return Err(Error::NameMismatch {
                        id: change.id,
                        name,
                        prefix: prefix.clone(),
                        suffix: suffix.clone(),
                    });
                }
            }
            changes.push(change);
        }
        GraphSnapshot::new(changes, raw.edges)
    }
}

/// One immutable point-in-time view of the change graph.
///
/// Changes live in an arena (`Vec`) and are addressed by index; the identifier map is built once
/// when the snapshot is constructed, so every endpoint lookup afterwards is a single hash probe
/// and a missing endpoint is just a lookup miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct GraphSnapshot {
    changes: Vec<Change>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl GraphSnapshot {
    pub fn empty() -> Self {
        Self {
            changes: Vec::new(),
            edges: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Builds a snapshot, rejecting duplicate change identifiers.
    ///
    /// Edges are kept verbatim, including edges whose endpoints are not part of `changes`.
    pub fn new(changes: Vec<Change>, edges: Vec<Edge>) -> Result<Self> {
        let mut index = FxHashMap::default();
        index.reserve(changes.len());
        for (i, change) in changes.iter().enumerate() {
            if index.insert(change.id.clone(), i).is_some() {
                return Err(Error::DuplicateChange {
                    id: change.id.clone(),
                });
            }
        }
        Ok(Self {
            changes,
            edges,
            index,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(text)?;
        Self::try_from(raw)
    }

    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        let raw = RawSnapshot::deserialize(value)?;
        Self::try_from(raw)
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn change(&self, index: usize) -> Option<&Change> {
        self.changes.get(index)
    }

    /// Arena index of the change with identifier `id`.
    pub fn lookup(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&Change> {
        self.lookup(id).map(|i| &self.changes[i])
    }

    /// Resolves both endpoints of `edge` to arena indices. On a miss, returns the identifier of
    /// the first endpoint (`from` before `to`) absent from this snapshot.
    pub fn resolve_edge<'e>(&self, edge: &'e Edge) -> std::result::Result<(usize, usize), &'e str> {
        let from = self.lookup(&edge.from).ok_or(edge.from.as_str())?;
        let to = self.lookup(&edge.to).ok_or(edge.to.as_str())?;
        Ok((from, to))
    }

    /// Largest column and largest row over all changes, or `None` for an empty snapshot.
    pub fn grid_extent(&self) -> Option<GridPos> {
        let first = self.changes.first()?.grid_pos();
        Some(self.changes.iter().fold(first, |acc, c| GridPos {
            column: acc.column.max(c.column),
            row: acc.row.max(c.row),
        }))
    }

    /// Grid cells occupied by more than one change, in order of first occupancy, each with the
    /// arena indices of the changes sharing it.
    pub fn overlapping_cells(&self) -> Vec<(GridPos, Vec<usize>)> {
        let mut cells: IndexMap<GridPos, Vec<usize>> = IndexMap::new();
        for (i, change) in self.changes.iter().enumerate() {
            cells.entry(change.grid_pos()).or_default().push(i);
        }
        cells
            .into_iter()
            .filter(|(_, members)| members.len() > 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_is_prefix_then_suffix() {
        let c = Change::new("abc", "kx", "yzlm", 0, 0);
        assert_eq!(c.name(), "kxyzlm");
    }

    #[test]
    fn empty_conflict_list_is_not_a_conflict() {
        let none = Change::new("a", "a", "", 0, 0);
        let empty = none.clone().with_conflict_files(Vec::<String>::new());
        let some = none.clone().with_conflict_files(["src/lib.rs"]);
        assert!(!none.has_conflict());
        assert!(!empty.has_conflict());
        assert!(some.has_conflict());
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let err = GraphSnapshot::new(
            vec![
                Change::new("a", "a", "", 0, 0),
                Change::new("a", "a", "", 1, 1),
            ],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateChange { id } if id == "a"));
    }

    #[test]
    fn name_mismatch_is_rejected() {
        let value = json!({
            "changes": [{
                "id": "a",
                "name": "qpvuntsm",
                "unique_prefix": "q",
                "unique_suffix": "xyz",
                "column": 0,
                "row": 0,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }],
            "edges": []
        });
        let err = GraphSnapshot::from_value(&value).unwrap_err();
        assert!(matches!(err, Error::NameMismatch { .. }));
    }

    #[test]
    fn grid_extent_of_empty_snapshot_is_none() {
        assert_eq!(GraphSnapshot::empty().grid_extent(), None);
    }

    #[test]
    fn overlapping_cells_groups_shared_positions() {
        let snapshot = GraphSnapshot::new(
            vec![
                Change::new("a", "a", "", 0, 0),
                Change::new("b", "b", "", 1, 0),
                Change::new("c", "c", "", 0, 0),
            ],
            Vec::new(),
        )
        .unwrap();
        let cells = snapshot.overlapping_cells();
        assert_eq!(cells, vec![(GridPos { column: 0, row: 0 }, vec![0, 2])]);
    }
}
