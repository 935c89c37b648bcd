//! Write-once names.
//!
//! Containers and fields are created nameless during parallel lowering and
//! named exactly once during finalization. [`NameSlot`] makes the two
//! states explicit; [`WriteOnce`] guards the transition.

use parking_lot::RwLock;

/// The naming state of a synthesized symbol.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NameSlot<T> {
    #[default]
    Unassigned,
    Assigned(T),
}

impl<T> NameSlot<T> {
    pub fn is_assigned(&self) -> bool {
        matches!(self, NameSlot::Assigned(_))
    }

    pub fn as_assigned(&self) -> Option<&T> {
        match self {
            NameSlot::Unassigned => None,
            NameSlot::Assigned(value) => Some(value),
        }
    }
}

/// A slot that transitions `Unassigned -> Assigned` at most once.
#[derive(Debug)]
pub(crate) struct WriteOnce<T> {
    slot: RwLock<NameSlot<T>>,
}

impl<T: Clone> WriteOnce<T> {
    pub(crate) fn new() -> Self {
        WriteOnce {
            slot: RwLock::new(NameSlot::Unassigned),
        }
    }

    /// Snapshot of the current state.
    pub(crate) fn get(&self) -> NameSlot<T> {
        self.slot.read().clone()
    }

    /// Assign the value, or hand back the value already present.
    pub(crate) fn try_set(&self, value: T) -> Result<(), T> {
        let mut slot = self.slot.write();
        match &*slot {
            NameSlot::Assigned(existing) => Err(existing.clone()),
            NameSlot::Unassigned => {
                *slot = NameSlot::Assigned(value);
                Ok(())
            }
        }
    }
}
