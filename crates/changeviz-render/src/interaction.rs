//! Pointer interaction over a rendered layout.
//!
//! Each change is either `Normal` or `Highlighted`. Entering a clickable change (its node marker
//! or its panel entry) highlights it, leaving returns it to normal, and clicking it emits a
//! checkout intent. The mediator never performs the checkout and never updates state
//! optimistically; the next snapshot reflects whatever the host did.

use crate::model::RenderModel;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightState {
    #[default]
    Normal,
    Highlighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    Node,
    PanelEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    Enter,
    Leave,
    Click,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub change_id: String,
    pub target: PointerTarget,
    pub action: PointerAction,
}

impl PointerEvent {
    pub fn new(change_id: impl Into<String>, target: PointerTarget, action: PointerAction) -> Self {
        Self {
            change_id: change_id.into(),
            target,
            action,
        }
    }
}

/// Outbound events for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InteractionEvent {
    HighlightChanged {
        change_id: String,
        highlighted: bool,
    },
    CheckoutRequested {
        change_id: String,
    },
}

#[derive(Debug, Clone)]
struct Slot {
    id: String,
    clickable: bool,
    state: HighlightState,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionMediator {
    slots: Vec<Slot>,
    index: FxHashMap<String, usize>,
}

impl InteractionMediator {
    pub fn new(model: &RenderModel) -> Self {
        let mut out = Self::default();
        out.load(model);
        out
    }

    fn load(&mut self, model: &RenderModel) {
        self.slots.clear();
        self.index.clear();
        for entry in &model.panel {
            self.index.insert(entry.id.clone(), self.slots.len());
            self.slots.push(Slot {
                id: entry.id.clone(),
                clickable: entry.clickable,
                state: HighlightState::Normal,
            });
        }
    }

    /// Switches to a freshly laid-out snapshot. Changes that were highlighted and are still
    /// present and clickable stay highlighted; everything else starts out normal. Returns a
    /// `HighlightChanged { highlighted: false }` for every highlight that did not survive.
    pub fn rebase_onto(&mut self, model: &RenderModel) -> Vec<InteractionEvent> {
        let kept: Vec<String> = self.highlighted().map(str::to_string).collect();
        self.load(model);
        let mut lost = Vec::new();
        for id in kept {
            match self.index.get(&id) {
                Some(&i) if self.slots[i].clickable => {
                    self.slots[i].state = HighlightState::Highlighted;
                }
                _ => lost.push(InteractionEvent::HighlightChanged {
                    change_id: id,
                    highlighted: false,
                }),
            }
        }
        lost
    }

    pub fn state(&self, change_id: &str) -> Option<HighlightState> {
        self.index.get(change_id).map(|&i| self.slots[i].state)
    }

    pub fn is_clickable(&self, change_id: &str) -> bool {
        self.index
            .get(change_id)
            .is_some_and(|&i| self.slots[i].clickable)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .filter(|s| s.state == HighlightState::Highlighted)
            .map(|s| s.id.as_str())
    }

    /// Applies one pointer event and returns the resulting outbound event, if any.
    pub fn handle(&mut self, event: &PointerEvent) -> Option<InteractionEvent> {
        let Some(&i) = self.index.get(&event.change_id) else {
            tracing::trace!(change_id = %event.change_id, "pointer event for unknown change");
            return None;
        };
        let slot = &mut self.slots[i];
        if !slot.clickable {
            tracing::trace!(
                change_id = %slot.id,
                action = ?event.action,
                "ignoring pointer event on inert change"
            );
            return None;
        }

        match event.action {
            PointerAction::Enter => transition(slot, HighlightState::Highlighted),
            PointerAction::Leave => transition(slot, HighlightState::Normal),
            PointerAction::Click => Some(InteractionEvent::CheckoutRequested {
                change_id: slot.id.clone(),
            }),
        }
    }
}

fn transition(slot: &mut Slot, next: HighlightState) -> Option<InteractionEvent> {
    if slot.state == next {
        return None;
    }
    slot.state = next;
    Some(InteractionEvent::HighlightChanged {
        change_id: slot.id.clone(),
        highlighted: next == HighlightState::Highlighted,
    })
}
