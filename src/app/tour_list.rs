//! Numbered, removable list of tour stops, derived from the selection.

use crate::app::selection::SelectionState;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct TourStopItem {
    /// 1-based position shown to the user
    pub number: usize,
    pub name: String,
}

impl TourStopItem {
    /// Index to pass to `remove_tour_stop`
    pub fn index(&self) -> usize {
        self.number - 1
    }
}

impl fmt::Display for TourStopItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {} [x]", self.number, self.name)
    }
}

/// Re-derives the list on every call; holds no state of its own.
pub fn tour_stop_items(selection: &SelectionState) -> Vec<TourStopItem> {
    selection
        .tour()
        .stops
        .iter()
        .enumerate()
        .map(|(i, stop)| TourStopItem {
            number: i + 1,
            name: stop.name.clone(),
        })
        .collect()
}

/// Converts a displayed 1-based number to a model index. `0` maps to an
/// index past any list so the removal stays a no-op.
pub fn index_for_number(number: usize) -> usize {
    number.checked_sub(1).unwrap_or(usize::MAX)
}
