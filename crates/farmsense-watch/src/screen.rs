//! Decides what the poll loop prints.

use crate::render;
use farmsense_common::types::EnrichedAnimal;

/// Tracks the last printed dashboard so unchanged polls stay quiet.
///
/// A failed poll prints one error line and forgets the dashboard, so the
/// next successful poll always redraws it.
#[derive(Debug, Default)]
pub struct Screen {
    last_dashboard: Option<String>,
    failing: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dashboard text if it should be printed.
    pub fn on_poll(&mut self, animals: &[EnrichedAnimal]) -> Option<String> {
        self.failing = false;
        let dashboard = render::dashboard(animals);
        if self.last_dashboard.as_deref() == Some(dashboard.as_str()) {
            return None;
        }
        self.last_dashboard = Some(dashboard.clone());
        Some(dashboard)
    }

    /// Returns the error line for the first failure in a row.
    pub fn on_error(&mut self, err: &dyn std::fmt::Display) -> Option<String> {
        self.last_dashboard = None;
        if self.failing {
            return None;
        }
        self.failing = true;
        Some(render::error_line(err))
    }
}
