//! Plain-text receipts for confirmed bookings and payments.

use anyhow::{Result, anyhow};
use minijinja::Environment;
use serde::Serialize;

use crate::app::payments::format_money;
use crate::app::slots::{SlotSchedule, describe_range};
use crate::domain::model::{Debt, Facility, Payment, Reservation};

const BOOKING_TEMPLATE: &str = "Reservation #{{ id }} confirmed
{{ facility }} on {{ date }}, {{ time_range }}
Unit {{ unit }}";

const PAYMENT_TEMPLATE: &str = "Payment {{ reference }} received
{{ concept }}: {{ amount }}
Paid on {{ paid_on }} by unit {{ unit }}";

pub struct ReceiptRenderer {
    env: Environment<'static>,
}

impl ReceiptRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template("booking", BOOKING_TEMPLATE)
            .map_err(|err| anyhow!("failed to register booking receipt template: {err}"))?;
        env.add_template("payment", PAYMENT_TEMPLATE)
            .map_err(|err| anyhow!("failed to register payment receipt template: {err}"))?;
        Ok(Self { env })
    }

    pub fn booking(
        &self,
        reservation: &Reservation,
        facility: &Facility,
        schedule: &SlotSchedule,
    ) -> Result<String> {
        let context = BookingContext {
            id: reservation.id,
            facility: &facility.name,
            date: reservation.date.to_string(),
            time_range: describe_range(&schedule.labels(), reservation.start, reservation.end),
            unit: &reservation.unit,
        };
        self.render("booking", &context)
    }

    pub fn payment(&self, payment: &Payment, debt: &Debt) -> Result<String> {
        let context = PaymentContext {
            reference: &payment.reference,
            concept: &debt.concept,
            amount: format_money(payment.amount_cents),
            paid_on: payment.paid_on.to_string(),
            unit: &payment.unit,
        };
        self.render("payment", &context)
    }

    fn render<S: Serialize>(&self, name: &str, context: &S) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(context))
            .map_err(|err| anyhow!("failed to render {name} receipt: {err}"))
    }
}

#[derive(Serialize)]
struct BookingContext<'a> {
    id: u64,
    facility: &'a str,
    date: String,
    time_range: String,
    unit: &'a str,
}

#[derive(Serialize)]
struct PaymentContext<'a> {
    reference: &'a str,
    concept: &'a str,
    amount: String,
    paid_on: String,
    unit: &'a str,
}
