//! Parcels held at the front desk.

use time::OffsetDateTime;

use crate::app::ports::{PackageGateway, PackageRequest};
use crate::domain::errors::DomainError;
use crate::domain::model::{Package, PackageStatus};

#[derive(Debug, Clone, Default)]
pub struct PackageInbox {
    packages: Vec<Package>,
}

impl PackageInbox {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    pub fn all(&self) -> &[Package] {
        &self.packages
    }

    /// Parcels waiting for `unit`, oldest first so the desk hands them out in order.
    pub fn waiting_for(&self, unit: &str) -> Vec<&Package> {
        let mut waiting: Vec<&Package> = self
            .packages
            .iter()
            .filter(|package| package.unit == unit && package.status == PackageStatus::Waiting)
            .collect();
        waiting.sort_by_key(|package| package.received_at);
        waiting
    }

    /// Every waiting parcel, oldest first.
    pub fn waiting(&self) -> Vec<&Package> {
        let mut waiting: Vec<&Package> = self
            .packages
            .iter()
            .filter(|package| package.status == PackageStatus::Waiting)
            .collect();
        waiting.sort_by_key(|package| package.received_at);
        waiting
    }

    pub fn waiting_count(&self) -> usize {
        self.packages
            .iter()
            .filter(|package| package.status == PackageStatus::Waiting)
            .count()
    }

    /// Log a new parcel at the desk.
    pub fn register(
        &mut self,
        unit: &str,
        carrier: &str,
        gateway: &dyn PackageGateway,
        now: OffsetDateTime,
    ) -> Result<Package, DomainError> {
        let unit = unit.trim();
        let carrier = carrier.trim();
        if unit.is_empty() {
            return Err(DomainError::MissingField("unit"));
        }
        if carrier.is_empty() {
            return Err(DomainError::MissingField("carrier"));
        }

        let request = PackageRequest {
            unit: unit.to_owned(),
            carrier: carrier.to_owned(),
            received_at: now,
        };
        let package = gateway.register_package(&request)?;
        tracing::info!(id = package.id, unit, carrier, "package registered");
        self.packages.push(package.clone());
        Ok(package)
    }

    pub fn mark_collected(&mut self, id: u64) -> Result<(), DomainError> {
        let package = self
            .packages
            .iter_mut()
            .find(|package| package.id == id)
            .ok_or(DomainError::UnknownPackage(id))?;
        if package.status == PackageStatus::Collected {
            return Err(DomainError::AlreadyCollected(id));
        }
        package.status = PackageStatus::Collected;
        tracing::info!(id, unit = %package.unit, "package collected");
        Ok(())
    }
}
