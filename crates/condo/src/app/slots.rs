//! Time-slot range selection for facility reservations.

use std::collections::BTreeSet;

use time::Time;
use time::macros::format_description;

use crate::domain::model::{Slot, SlotIndex};

/// Shown by [`SlotSelectionEngine::summary`] while nothing is selected.
pub const NO_SELECTION: &str = "No time selected";

const UNKNOWN_LABEL: &str = "--:--";

/// Current selection: nothing, one slot, or two adjacent slots.
///
/// `end` is only ever present together with `start`, and then always equals `start + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SelectionState {
    start: Option<SlotIndex>,
    end: Option<SlotIndex>,
}

impl SelectionState {
    /// The empty selection.
    pub const fn empty() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// A selection covering exactly one slot.
    pub const fn single(index: SlotIndex) -> Self {
        Self {
            start: Some(index),
            end: None,
        }
    }

    /// A selection covering `start` and the slot right after it. There is no slot after
    /// `SlotIndex::MAX`, so that start yields a single selection.
    pub const fn pair(start: SlotIndex) -> Self {
        Self {
            start: Some(start),
            end: start.checked_add(1),
        }
    }

    pub fn start(&self) -> Option<SlotIndex> {
        self.start
    }

    pub fn end(&self) -> Option<SlotIndex> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Number of selected slots (0, 1 or 2).
    pub fn len(&self) -> usize {
        match (self.start, self.end) {
            (None, _) => 0,
            (Some(_), None) => 1,
            (Some(_), Some(_)) => 2,
        }
    }

    /// Inclusive `(first, last)` slot indices of the selection.
    pub fn range(&self) -> Option<(SlotIndex, SlotIndex)> {
        let start = self.start?;
        Some((start, self.end.unwrap_or(start)))
    }

    /// Whether `index` falls inside the selection.
    pub fn contains(&self, index: SlotIndex) -> bool {
        self.range()
            .map(|(first, last)| first <= index && index <= last)
            .unwrap_or(false)
    }
}

/// Compute the selection that results from tapping `clicked`.
///
/// Taps on slots outside `availability` leave the state untouched. A single selection grows
/// into a pair only when the tap lands on a neighbouring slot; every other tap starts over.
pub fn next_state(
    state: SelectionState,
    clicked: SlotIndex,
    availability: &BTreeSet<SlotIndex>,
) -> SelectionState {
    if !availability.contains(&clicked) {
        return state;
    }

    match (state.start, state.end) {
        (None, _) => SelectionState::single(clicked),
        (Some(start), None) if clicked == start => SelectionState::empty(),
        (Some(start), None) if start.checked_add(1) == Some(clicked) => {
            SelectionState::pair(start)
        }
        (Some(start), None) if start.checked_sub(1) == Some(clicked) => {
            SelectionState::pair(clicked)
        }
        (Some(_), None) => SelectionState::single(clicked),
        (Some(_), Some(_)) => SelectionState::single(clicked),
    }
}

/// Owns the selection for one facility/day pairing.
#[derive(Debug, Default, Clone)]
pub struct SlotSelectionEngine {
    state: SelectionState,
}

impl SlotSelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Apply a tap and return the resulting state.
    pub fn select_slot(
        &mut self,
        clicked: SlotIndex,
        availability: &BTreeSet<SlotIndex>,
    ) -> SelectionState {
        let previous = self.state;
        self.state = next_state(previous, clicked, availability);
        if self.state == previous {
            tracing::debug!(clicked, ?previous, "slot tap left selection unchanged");
        } else {
            tracing::debug!(clicked, ?previous, next = ?self.state, "slot selection changed");
        }
        self.state
    }

    pub fn is_selected(&self, index: SlotIndex) -> bool {
        self.state.contains(index)
    }

    /// Drop the current selection.
    pub fn reset(&mut self) {
        self.state = SelectionState::empty();
    }

    /// Human readable `"HH:MM - HH:MM"` range for the selection.
    ///
    /// Each slot starts an hour-long interval, so the closing time is the label one past the
    /// last selected slot. Labels past the end of `labels` are extrapolated hour by hour.
    pub fn summary<S: AsRef<str>>(&self, labels: &[S]) -> String {
        match self.state.range() {
            None => NO_SELECTION.to_owned(),
            Some((first, last)) => describe_range(labels, first, last),
        }
    }
}

/// `"HH:MM - HH:MM"` for the slots `first..=last`.
pub fn describe_range<S: AsRef<str>>(labels: &[S], first: SlotIndex, last: SlotIndex) -> String {
    format!(
        "{} - {}",
        boundary_label(labels, Some(first)),
        boundary_label(labels, last.checked_add(1))
    )
}

fn boundary_label<S: AsRef<str>>(labels: &[S], index: Option<SlotIndex>) -> String {
    let Some(index) = index else {
        return UNKNOWN_LABEL.to_owned();
    };
    if let Some(label) = labels.get(index) {
        return label.as_ref().to_owned();
    }

    let Some(last) = labels.last() else {
        return UNKNOWN_LABEL.to_owned();
    };
    // clock time wraps daily, so only the hour offset within a day matters
    let steps = (index - (labels.len() - 1)) % 24;
    parse_label(last.as_ref())
        .map(|closing| format_label(closing + time::Duration::hours(steps as i64)))
        .unwrap_or_else(|| UNKNOWN_LABEL.to_owned())
}

fn parse_label(label: &str) -> Option<Time> {
    Time::parse(label.trim(), format_description!("[hour]:[minute]")).ok()
}

fn format_label(time: Time) -> String {
    time.format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| UNKNOWN_LABEL.to_owned())
}

/// Fixed hourly schedule for a facility day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSchedule {
    opening_hour: u8,
    closing_hour: u8,
}

impl SlotSchedule {
    /// Build a schedule spanning `opening_hour..closing_hour`. Inverted bounds produce an
    /// empty schedule; hours are clamped to a single day.
    pub fn new(opening_hour: u8, closing_hour: u8) -> Self {
        let closing_hour = closing_hour.min(24);
        let opening_hour = opening_hour.min(closing_hour);
        Self {
            opening_hour,
            closing_hour,
        }
    }

    pub fn len(&self) -> usize {
        usize::from(self.closing_hour - self.opening_hour)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start-time label for every slot, in order.
    pub fn labels(&self) -> Vec<String> {
        (self.opening_hour..self.closing_hour)
            .map(|hour| format!("{hour:02}:00"))
            .collect()
    }

    /// Every index in the schedule.
    pub fn indices(&self) -> BTreeSet<SlotIndex> {
        (0..self.len()).collect()
    }

    /// Join labels with an availability set.
    pub fn slots(&self, availability: &BTreeSet<SlotIndex>) -> Vec<Slot> {
        self.labels()
            .into_iter()
            .enumerate()
            .map(|(index, label)| Slot {
                index,
                label,
                available: availability.contains(&index),
            })
            .collect()
    }
}

impl Default for SlotSchedule {
    fn default() -> Self {
        Self::new(9, 21)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(count: usize) -> BTreeSet<SlotIndex> {
        (0..count).collect()
    }

    fn tap_all(taps: &[SlotIndex], availability: &BTreeSet<SlotIndex>) -> SelectionState {
        let mut engine = SlotSelectionEngine::new();
        for tap in taps {
            engine.select_slot(*tap, availability);
        }
        engine.state()
    }

    #[test]
    fn first_tap_selects_single_slot() {
        assert_eq!(tap_all(&[3], &all(8)), SelectionState::single(3));
    }

    #[test]
    fn tapping_the_single_slot_again_clears_it() {
        assert_eq!(tap_all(&[3, 3], &all(8)), SelectionState::empty());
    }

    #[test]
    fn adjacent_forward_tap_extends_range() {
        let state = tap_all(&[3, 4], &all(8));
        assert_eq!(state.start(), Some(3));
        assert_eq!(state.end(), Some(4));
    }

    #[test]
    fn adjacent_backward_tap_swaps_into_order() {
        let state = tap_all(&[4, 3], &all(8));
        assert_eq!(state.start(), Some(3));
        assert_eq!(state.end(), Some(4));
    }

    #[test]
    fn non_adjacent_tap_restarts_selection() {
        assert_eq!(tap_all(&[1, 5], &all(8)), SelectionState::single(5));
    }

    #[test]
    fn backward_extension_at_slot_zero_does_not_underflow() {
        assert_eq!(tap_all(&[0, 1], &all(8)), SelectionState::pair(0));
        assert_eq!(tap_all(&[1, 0], &all(8)), SelectionState::pair(0));
    }

    #[test]
    fn any_tap_on_a_range_restarts_selection() {
        assert_eq!(tap_all(&[3, 4, 4], &all(8)), SelectionState::single(4));
        assert_eq!(tap_all(&[3, 4, 3], &all(8)), SelectionState::single(3));
        assert_eq!(tap_all(&[3, 4, 7], &all(8)), SelectionState::single(7));
        assert_eq!(tap_all(&[3, 4, 5], &all(8)), SelectionState::single(5));
    }

    #[test]
    fn unavailable_taps_never_change_state() {
        let mut availability = all(8);
        availability.remove(&6);
        let priors = [
            SelectionState::empty(),
            SelectionState::single(5),
            SelectionState::single(7),
            SelectionState::pair(4),
        ];
        for prior in priors {
            assert_eq!(next_state(prior, 6, &availability), prior);
            assert_eq!(next_state(prior, 42, &availability), prior);
        }
    }

    #[test]
    fn range_invariant_holds_for_every_tap_sequence() {
        let availability: BTreeSet<SlotIndex> = [0, 1, 2, 4, 5].into_iter().collect();
        let mut states = vec![SelectionState::empty()];
        let mut seen = std::collections::HashSet::new();
        while let Some(state) = states.pop() {
            if !seen.insert(state) {
                continue;
            }
            if let Some(end) = state.end() {
                assert_eq!(state.start().map(|start| start + 1), Some(end));
            }
            for index in state.range().into_iter().flat_map(|(a, b)| [a, b]) {
                assert!(availability.contains(&index));
            }
            for clicked in 0..7 {
                states.push(next_state(state, clicked, &availability));
            }
        }
    }

    #[test]
    fn blocked_slots_scenario() {
        let mut availability = all(8);
        availability.remove(&1);
        availability.remove(&5);

        let mut engine = SlotSelectionEngine::new();
        assert_eq!(engine.select_slot(1, &availability), SelectionState::empty());
        assert_eq!(engine.select_slot(2, &availability), SelectionState::single(2));
        assert_eq!(engine.select_slot(1, &availability), SelectionState::single(2));
        assert_eq!(engine.select_slot(3, &availability), SelectionState::pair(2));
    }

    #[test]
    fn is_selected_covers_both_ends() {
        let mut engine = SlotSelectionEngine::new();
        engine.select_slot(2, &all(8));
        engine.select_slot(3, &all(8));
        assert!(!engine.is_selected(1));
        assert!(engine.is_selected(2));
        assert!(engine.is_selected(3));
        assert!(!engine.is_selected(4));
    }

    #[test]
    fn summary_uses_following_label_as_end() {
        let labels = ["09:00", "10:00", "11:00"];
        let mut engine = SlotSelectionEngine::new();
        assert_eq!(engine.summary(&labels), NO_SELECTION);

        engine.select_slot(1, &all(3));
        assert_eq!(engine.summary(&labels), "10:00 - 11:00");

        engine.select_slot(2, &all(3));
        assert_eq!(engine.summary(&labels), "10:00 - 12:00");
    }

    #[test]
    fn summary_extrapolates_past_the_last_label() {
        let labels = ["09:00", "10:00", "11:00"];
        let mut engine = SlotSelectionEngine::new();
        engine.select_slot(2, &all(4));
        assert_eq!(engine.summary(&labels), "11:00 - 12:00");

        engine.select_slot(3, &all(4));
        assert_eq!(engine.summary(&labels), "11:00 - 13:00");
    }

    #[test]
    fn summary_falls_back_for_unparseable_labels() {
        let labels = ["morning"];
        let mut engine = SlotSelectionEngine::new();
        engine.select_slot(0, &all(1));
        assert_eq!(engine.summary(&labels), "morning - --:--");
    }

    #[test]
    fn largest_index_never_overflows() {
        let availability: BTreeSet<SlotIndex> =
            [SlotIndex::MAX - 1, SlotIndex::MAX].into_iter().collect();
        assert_eq!(
            tap_all(&[SlotIndex::MAX], &availability),
            SelectionState::single(SlotIndex::MAX)
        );
        assert_eq!(
            tap_all(&[SlotIndex::MAX, SlotIndex::MAX - 1], &availability),
            SelectionState::pair(SlotIndex::MAX - 1)
        );
        assert_eq!(
            tap_all(&[SlotIndex::MAX - 1, SlotIndex::MAX], &availability),
            SelectionState::pair(SlotIndex::MAX - 1)
        );

        let at_max = SelectionState::pair(SlotIndex::MAX);
        assert_eq!(at_max.end(), None);
        assert_eq!(at_max.len(), 1);

        let labels = ["09:00", "10:00"];
        assert!(describe_range(&labels, SlotIndex::MAX, SlotIndex::MAX).ends_with(" - --:--"));
        assert_eq!(describe_range(&labels, 1, 23), "10:00 - 09:00");
    }

    #[test]
    fn schedule_labels_are_hourly() {
        let schedule = SlotSchedule::new(9, 12);
        assert_eq!(schedule.labels(), vec!["09:00", "10:00", "11:00"]);
        assert_eq!(schedule.len(), 3);
        assert!(SlotSchedule::new(20, 8).is_empty());
    }

    #[test]
    fn schedule_slots_reflect_availability() {
        let schedule = SlotSchedule::new(9, 12);
        let availability: BTreeSet<SlotIndex> = [0, 2].into_iter().collect();
        let slots = schedule.slots(&availability);
        assert!(slots[0].available);
        assert!(!slots[1].available);
        assert_eq!(slots[2].label, "11:00");
    }
}
