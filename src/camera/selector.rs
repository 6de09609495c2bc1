//! Camera selection for the multi-view layout
//!
//! Holds, for each of the four output slots, either the batch index of the
//! selected camera or nothing. Every selection rebuilds all slots from
//! scratch; there are no partial updates.

use super::registry::CameraRegistry;

/// Number of output slots in the multi-view layout
pub const MAX_SLOTS: usize = 4;

/// What happened to a selection request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionReport {
    /// Names beyond the fourth, which were ignored
    pub ignored: usize,

    /// Names within the first four that are not registered cameras
    pub unknown: Vec<String>,

    /// Camera bound to each slot once the request was applied
    pub slots: [Option<String>; MAX_SLOTS],
}

impl SelectionReport {
    /// Whether the request had more names than slots
    pub fn truncated(&self) -> bool {
        self.ignored > 0
    }
}

/// Current slot-to-camera binding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraSelector {
    slots: [Option<usize>; MAX_SLOTS],
}

impl CameraSelector {
    /// Create a selector with every slot unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `names`, slot by slot
    pub fn select<S: AsRef<str>>(
        &mut self,
        registry: &CameraRegistry,
        names: &[S],
    ) -> SelectionReport {
        let mut report = SelectionReport {
            ignored: names.len().saturating_sub(MAX_SLOTS),
            ..SelectionReport::default()
        };

        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = names.get(i).and_then(|name| {
                let name = name.as_ref();
                match registry.index_of(name) {
                    Some(index) => {
                        report.slots[i] = Some(name.to_string());
                        Some(index)
                    }
                    None => {
                        report.unknown.push(name.to_string());
                        None
                    }
                }
            });
        }

        report
    }

    /// Batch index bound to each slot
    pub fn slots(&self) -> &[Option<usize>; MAX_SLOTS] {
        &self.slots
    }

    /// Number of slots currently bound to a camera
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
