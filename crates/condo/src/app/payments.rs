//! Resident debts and payments.

use time::Date;

use crate::app::ports::{PaymentGateway, PaymentRequest};
use crate::domain::errors::DomainError;
use crate::domain::model::{Debt, DebtStatus, Payment};

/// Debts and payments of a single unit.
#[derive(Debug, Clone)]
pub struct PaymentsLedger {
    unit: String,
    debts: Vec<Debt>,
    payments: Vec<Payment>,
}

impl PaymentsLedger {
    /// Keep only the records that belong to `unit`.
    pub fn for_unit(unit: &str, debts: &[Debt], payments: &[Payment]) -> Self {
        Self {
            unit: unit.to_owned(),
            debts: debts.iter().filter(|d| d.unit == unit).cloned().collect(),
            payments: payments.iter().filter(|p| p.unit == unit).cloned().collect(),
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn debt(&self, id: u64) -> Option<&Debt> {
        self.debts.iter().find(|debt| debt.id == id)
    }

    /// Unpaid debts, earliest due first.
    pub fn outstanding(&self) -> Vec<&Debt> {
        let mut open: Vec<&Debt> = self.debts.iter().filter(|debt| !debt.is_paid()).collect();
        open.sort_by_key(|debt| (debt.due, debt.id));
        open
    }

    pub fn total_due_cents(&self) -> u64 {
        self.outstanding().iter().map(|debt| debt.amount_cents).sum()
    }

    pub fn overdue_count(&self, today: Date) -> usize {
        self.outstanding()
            .iter()
            .filter(|debt| effective_status(debt, today) == DebtStatus::Overdue)
            .count()
    }

    /// Payments made, newest first.
    pub fn history(&self) -> Vec<&Payment> {
        let mut history: Vec<&Payment> = self.payments.iter().collect();
        history.sort_by(|a, b| b.paid_on.cmp(&a.paid_on).then(b.id.cmp(&a.id)));
        history
    }

    /// Pay a debt in full.
    pub fn pay(
        &mut self,
        debt_id: u64,
        gateway: &dyn PaymentGateway,
        today: Date,
    ) -> Result<Payment, DomainError> {
        let debt = self
            .debts
            .iter_mut()
            .find(|debt| debt.id == debt_id)
            .ok_or(DomainError::UnknownDebt(debt_id))?;
        if debt.is_paid() {
            return Err(DomainError::AlreadyPaid(debt_id));
        }

        let request = PaymentRequest {
            unit: self.unit.clone(),
            debt_id,
            amount_cents: debt.amount_cents,
            date: today,
        };
        let payment = gateway.submit_payment(&request).inspect_err(|err| {
            tracing::warn!(debt_id, error = %err, "payment rejected");
        })?;

        debt.status = DebtStatus::Paid;
        tracing::info!(
            debt_id,
            amount = %format_money(payment.amount_cents),
            reference = %payment.reference,
            "payment recorded"
        );
        self.payments.push(payment.clone());
        Ok(payment)
    }
}

/// Status as of `today`: unpaid debts past their due date are overdue.
pub fn effective_status(debt: &Debt, today: Date) -> DebtStatus {
    match debt.status {
        DebtStatus::Paid => DebtStatus::Paid,
        _ if debt.due < today => DebtStatus::Overdue,
        _ => DebtStatus::Pending,
    }
}

/// Render cents as `$1,250.00`.
pub fn format_money(cents: u64) -> String {
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (position, digit) in whole.chars().enumerate() {
        if position > 0 && (whole.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${grouped}.{:02}", cents % 100)
}
