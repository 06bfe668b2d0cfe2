//! Gateways standing between the controllers and a backend.
//!
//! Nothing here talks to a network yet: [`crate::infra::backend::MockBackend`] implements every
//! trait with simulated latency, and tests use its instant variant.

use thiserror::Error;
use time::{Date, OffsetDateTime};

use crate::domain::model::{Package, Payment, Reservation, SlotIndex};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("service unavailable")]
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub facility_id: String,
    pub unit: String,
    pub date: Date,
    pub start: SlotIndex,
    pub end: SlotIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub unit: String,
    pub debt_id: u64,
    pub amount_cents: u64,
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub unit: String,
    pub carrier: String,
    pub received_at: OffsetDateTime,
}

/// Emergency alert raised by a resident's panic button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicAlert {
    pub unit: String,
    pub raised_by: String,
    pub raised_at: OffsetDateTime,
}

pub trait BookingGateway {
    fn submit_booking(&self, request: &BookingRequest) -> Result<Reservation, GatewayError>;
}

pub trait PaymentGateway {
    fn submit_payment(&self, request: &PaymentRequest) -> Result<Payment, GatewayError>;
}

pub trait PackageGateway {
    fn register_package(&self, request: &PackageRequest) -> Result<Package, GatewayError>;
}

pub trait AlertGateway {
    fn raise_panic(&self, alert: &PanicAlert) -> Result<(), GatewayError>;
}
