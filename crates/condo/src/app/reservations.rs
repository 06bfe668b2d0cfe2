//! Facility booking board driving the slot selection engine.

use std::collections::BTreeSet;

use time::{Date, Duration};

use crate::app::ports::{BookingGateway, BookingRequest};
use crate::app::slots::{SelectionState, SlotSchedule, SlotSelectionEngine};
use crate::domain::errors::DomainError;
use crate::domain::model::{Facility, Reservation, Slot, SlotIndex};
use crate::infra::mock::MockCatalog;

/// Booking state for one resident: which facility and day are shown, what is free, and
/// what is selected. The selection is dropped whenever the facility or day changes.
#[derive(Debug, Clone)]
pub struct ReservationBoard {
    unit: String,
    today: Date,
    window_days: u8,
    schedule: SlotSchedule,
    facilities: Vec<Facility>,
    /// Bookings by other units, from the catalog.
    taken: Vec<Reservation>,
    /// Bookings confirmed in this session.
    confirmed: Vec<Reservation>,
    facility: usize,
    day: u8,
    availability: BTreeSet<SlotIndex>,
    engine: SlotSelectionEngine,
}

impl ReservationBoard {
    pub fn new(
        catalog: &MockCatalog,
        unit: impl Into<String>,
        schedule: SlotSchedule,
        window_days: u8,
    ) -> Self {
        let mut board = Self {
            unit: unit.into(),
            today: catalog.today,
            window_days: window_days.max(1),
            schedule,
            facilities: catalog.facilities.clone(),
            taken: catalog.reservations.clone(),
            confirmed: Vec::new(),
            facility: 0,
            day: 0,
            availability: BTreeSet::new(),
            engine: SlotSelectionEngine::new(),
        };
        board.refresh_context();
        board
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn facility(&self) -> Option<&Facility> {
        self.facilities.get(self.facility)
    }

    pub fn facility_index(&self) -> usize {
        self.facility
    }

    /// Days from today of the displayed date.
    pub fn day_offset(&self) -> u8 {
        self.day
    }

    pub fn date(&self) -> Date {
        self.today.saturating_add(Duration::days(i64::from(self.day)))
    }

    pub fn schedule(&self) -> SlotSchedule {
        self.schedule
    }

    pub fn availability(&self) -> &BTreeSet<SlotIndex> {
        &self.availability
    }

    pub fn selection(&self) -> SelectionState {
        self.engine.state()
    }

    pub fn is_selected(&self, index: SlotIndex) -> bool {
        self.engine.is_selected(index)
    }

    /// Reservations confirmed during this session, oldest first.
    pub fn confirmed(&self) -> &[Reservation] {
        &self.confirmed
    }

    pub fn select_facility(&mut self, index: usize) -> Result<(), DomainError> {
        if index >= self.facilities.len() {
            return Err(DomainError::UnknownFacility(index.to_string()));
        }
        if index != self.facility {
            self.facility = index;
            self.refresh_context();
        }
        Ok(())
    }

    pub fn select_facility_by_id(&mut self, id: &str) -> Result<(), DomainError> {
        let index = self
            .facilities
            .iter()
            .position(|facility| facility.id == id)
            .ok_or_else(|| DomainError::UnknownFacility(id.to_owned()))?;
        self.select_facility(index)
    }

    pub fn next_facility(&mut self) {
        if !self.facilities.is_empty() {
            self.facility = (self.facility + 1) % self.facilities.len();
            self.refresh_context();
        }
    }

    pub fn previous_facility(&mut self) {
        if !self.facilities.is_empty() {
            self.facility = (self.facility + self.facilities.len() - 1) % self.facilities.len();
            self.refresh_context();
        }
    }

    /// Show the day `offset` days from today, clamped to the booking window.
    pub fn select_day(&mut self, offset: u8) {
        let offset = offset.min(self.window_days - 1);
        if offset != self.day {
            self.day = offset;
            self.refresh_context();
        }
    }

    pub fn next_day(&mut self) {
        self.select_day(self.day.saturating_add(1));
    }

    pub fn previous_day(&mut self) {
        self.select_day(self.day.saturating_sub(1));
    }

    /// Handle a tap on `index`. Indices outside the schedule are rejected; taps on taken
    /// slots leave the selection as it was.
    pub fn tap(&mut self, index: SlotIndex) -> Result<SelectionState, DomainError> {
        let count = self.schedule.len();
        if index >= count {
            return Err(DomainError::SlotOutOfRange { index, count });
        }
        Ok(self.engine.select_slot(index, &self.availability))
    }

    pub fn slots(&self) -> Vec<Slot> {
        self.schedule.slots(&self.availability)
    }

    pub fn summary(&self) -> String {
        self.engine.summary(&self.schedule.labels())
    }

    /// Submit the current selection.
    pub fn confirm(&mut self, gateway: &dyn BookingGateway) -> Result<Reservation, DomainError> {
        let (start, end) = self
            .engine
            .state()
            .range()
            .ok_or(DomainError::EmptySelection)?;
        let facility = self
            .facility()
            .ok_or_else(|| DomainError::UnknownFacility(self.facility.to_string()))?;

        let request = BookingRequest {
            facility_id: facility.id.clone(),
            unit: self.unit.clone(),
            date: self.date(),
            start,
            end,
        };
        let reservation = gateway.submit_booking(&request).inspect_err(|err| {
            tracing::warn!(facility = %request.facility_id, error = %err, "booking rejected");
        })?;

        tracing::info!(
            id = reservation.id,
            facility = %reservation.facility_id,
            date = %reservation.date,
            start,
            end,
            "reservation confirmed"
        );
        for index in reservation.slots() {
            self.availability.remove(&index);
        }
        self.confirmed.push(reservation.clone());
        self.engine.reset();
        Ok(reservation)
    }

    fn refresh_context(&mut self) {
        let date = self.date();
        let mut availability = self.schedule.indices();
        if let Some(facility) = self.facilities.get(self.facility) {
            let blocked = self
                .taken
                .iter()
                .chain(self.confirmed.iter())
                .filter(|reservation| reservation.facility_id == facility.id && reservation.date == date)
                .flat_map(Reservation::slots);
            for index in blocked {
                availability.remove(&index);
            }
        }
        self.availability = availability;
        self.engine.reset();
        tracing::debug!(
            facility = self.facility,
            day = self.day,
            free = self.availability.len(),
            "reservation context changed"
        );
    }
}
