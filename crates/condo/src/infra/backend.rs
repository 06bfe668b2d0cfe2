//! In-memory gateways with simulated latency.

use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::app::ports::{
    AlertGateway, BookingGateway, BookingRequest, GatewayError, PackageGateway, PackageRequest,
    PanicAlert, PaymentGateway, PaymentRequest,
};
use crate::domain::model::{Package, PackageStatus, Payment, Reservation};

#[derive(Debug, Default)]
struct Ledger {
    next_id: u64,
    bookings: Vec<BookingRequest>,
    payments: Vec<PaymentRequest>,
    packages: Vec<PackageRequest>,
    alerts: Vec<PanicAlert>,
}

impl Ledger {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Accepts every request after sleeping for `latency`, unless built with [`MockBackend::failing`].
#[derive(Debug)]
pub struct MockBackend {
    latency: Duration,
    reject: bool,
    ledger: Mutex<Ledger>,
}

impl MockBackend {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            reject: false,
            ledger: Mutex::new(Ledger {
                next_id: 10_000,
                ..Ledger::default()
            }),
        }
    }

    /// No latency; what tests use.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Rejects every request.
    pub fn failing() -> Self {
        Self {
            reject: true,
            ..Self::instant()
        }
    }

    pub fn bookings(&self) -> Vec<BookingRequest> {
        self.ledger.lock().bookings.clone()
    }

    pub fn payments(&self) -> Vec<PaymentRequest> {
        self.ledger.lock().payments.clone()
    }

    pub fn packages(&self) -> Vec<PackageRequest> {
        self.ledger.lock().packages.clone()
    }

    pub fn alerts(&self) -> Vec<PanicAlert> {
        self.ledger.lock().alerts.clone()
    }

    fn round_trip(&self, operation: &str) -> Result<(), GatewayError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        if self.reject {
            tracing::warn!(operation, "mock backend rejected request");
            return Err(GatewayError::Unavailable);
        }
        tracing::debug!(operation, latency_ms = self.latency.as_millis() as u64, "mock backend call");
        Ok(())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::instant()
    }
}

impl BookingGateway for MockBackend {
    fn submit_booking(&self, request: &BookingRequest) -> Result<Reservation, GatewayError> {
        self.round_trip("submit_booking")?;
        if request.end < request.start {
            return Err(GatewayError::Rejected("booking ends before it starts".into()));
        }
        let mut ledger = self.ledger.lock();
        let id = ledger.allocate_id();
        ledger.bookings.push(request.clone());
        Ok(Reservation {
            id,
            facility_id: request.facility_id.clone(),
            unit: request.unit.clone(),
            date: request.date,
            start: request.start,
            end: request.end,
        })
    }
}

impl PaymentGateway for MockBackend {
    fn submit_payment(&self, request: &PaymentRequest) -> Result<Payment, GatewayError> {
        self.round_trip("submit_payment")?;
        if request.amount_cents == 0 {
            return Err(GatewayError::Rejected("payment amount must be positive".into()));
        }
        let mut ledger = self.ledger.lock();
        let id = ledger.allocate_id();
        ledger.payments.push(request.clone());
        Ok(Payment {
            id,
            unit: request.unit.clone(),
            debt_id: request.debt_id,
            amount_cents: request.amount_cents,
            paid_on: request.date,
            reference: format!("TRX-{id:06}"),
        })
    }
}

impl PackageGateway for MockBackend {
    fn register_package(&self, request: &PackageRequest) -> Result<Package, GatewayError> {
        self.round_trip("register_package")?;
        let mut ledger = self.ledger.lock();
        let id = ledger.allocate_id();
        ledger.packages.push(request.clone());
        Ok(Package {
            id,
            unit: request.unit.clone(),
            carrier: request.carrier.clone(),
            received_at: request.received_at,
            status: PackageStatus::Waiting,
        })
    }
}

impl AlertGateway for MockBackend {
    fn raise_panic(&self, alert: &PanicAlert) -> Result<(), GatewayError> {
        self.round_trip("raise_panic")?;
        tracing::warn!(unit = %alert.unit, raised_by = %alert.raised_by, "panic alert raised");
        self.ledger.lock().alerts.push(alert.clone());
        Ok(())
    }
}
