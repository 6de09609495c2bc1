//! Multi-view layout: four selectable slots

use super::FrameLayout;
use crate::camera::{
    null_frame, CameraRegistry, CameraSelector, Frame, SelectionReport, MAX_SLOTS,
};

/// Four-slot layout driven by a camera selection
#[derive(Debug, Clone)]
pub struct MultiViewLayout {
    registry: CameraRegistry,
    selector: CameraSelector,
}

impl MultiViewLayout {
    /// Create a layout with every slot unset
    pub fn new(registry: CameraRegistry) -> Self {
        Self {
            registry,
            selector: CameraSelector::new(),
        }
    }

    /// Replace the current selection
    pub fn select<S: AsRef<str>>(&mut self, names: &[S], log_prefix: &str) -> SelectionReport {
        let report = self.selector.select(&self.registry, names);

        if report.truncated() {
            tracing::warn!(
                "{}Received more than {} camera names; ignoring the extra {}",
                log_prefix,
                MAX_SLOTS,
                report.ignored
            );
        }
        for name in &report.unknown {
            tracing::debug!("{}Unknown camera '{}'; slot left unset", log_prefix, name);
        }

        report
    }

    pub fn selector(&self) -> &CameraSelector {
        &self.selector
    }

    /// Names bound to each slot
    pub fn selected_names(&self) -> [Option<String>; MAX_SLOTS] {
        self.selector
            .slots()
            .map(|slot| slot.and_then(|i| self.registry.name_of(i)).map(str::to_string))
    }
}

impl FrameLayout for MultiViewLayout {
    /// `None` keeps the current selection
    type Options = Option<Vec<String>>;

    fn configure(&mut self, options: Self::Options, log_prefix: &str) -> bool {
        match options {
            Some(names) => {
                self.select(names.as_slice(), log_prefix);
                true
            }
            None => false,
        }
    }

    fn assemble(&self, batch: &[Frame]) -> Vec<Frame> {
        self.selector
            .slots()
            .iter()
            .map(|slot| {
                slot.and_then(|index| batch.get(index).cloned())
                    .unwrap_or_else(null_frame)
            })
            .collect()
    }
}
