//! Administrator console: collections, roster, logbook, metrics, and plate checks.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use time::{Date, Duration, OffsetDateTime};

use crate::app::payments::effective_status;
use crate::app::visits;
use crate::domain::model::{
    Debt, DebtStatus, LogCategory, LogEntry, PackageStatus, Resident, StaffMember, Vehicle,
    Visit,
};
use crate::infra::mock::MockCatalog;

static PLATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]{5,8}$").expect("plate pattern compiles"));

/// Money billed versus collected across the community.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionReport {
    pub billed_cents: u64,
    pub collected_cents: u64,
    pub outstanding_cents: u64,
    pub overdue_cents: u64,
    /// Units owing money, largest balance first.
    pub delinquent_units: Vec<(String, u64)>,
}

impl CollectionReport {
    pub fn build(debts: &[Debt], today: Date) -> Self {
        let mut report = Self {
            billed_cents: 0,
            collected_cents: 0,
            outstanding_cents: 0,
            overdue_cents: 0,
            delinquent_units: Vec::new(),
        };
        let mut owed: BTreeMap<&str, u64> = BTreeMap::new();

        for debt in debts {
            report.billed_cents += debt.amount_cents;
            match effective_status(debt, today) {
                DebtStatus::Paid => report.collected_cents += debt.amount_cents,
                DebtStatus::Overdue => {
                    report.outstanding_cents += debt.amount_cents;
                    report.overdue_cents += debt.amount_cents;
                    *owed.entry(debt.unit.as_str()).or_default() += debt.amount_cents;
                }
                DebtStatus::Pending => report.outstanding_cents += debt.amount_cents,
            }
        }

        report.delinquent_units = owed
            .into_iter()
            .map(|(unit, cents)| (unit.to_owned(), cents))
            .collect();
        report
            .delinquent_units
            .sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        report
    }

    /// Share of billed money already collected, in `[0, 1]`.
    pub fn collection_rate(&self) -> f64 {
        if self.billed_cents == 0 {
            return 1.0;
        }
        self.collected_cents as f64 / self.billed_cents as f64
    }
}

/// A roster search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterEntry<'a> {
    Resident(&'a Resident),
    Staff(&'a StaffMember),
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    residents: Vec<Resident>,
    staff: Vec<StaffMember>,
}

impl Roster {
    pub fn new(residents: Vec<Resident>, staff: Vec<StaffMember>) -> Self {
        Self { residents, staff }
    }

    /// Case-insensitive match on resident name/unit and staff name/position. Residents are
    /// listed before staff; an empty query lists everyone.
    pub fn search(&self, query: &str) -> Vec<RosterEntry<'_>> {
        let needle = query.trim().to_lowercase();
        let matches = |field: &str| needle.is_empty() || field.to_lowercase().contains(&needle);

        let residents = self
            .residents
            .iter()
            .filter(|resident| matches(&resident.name) || matches(&resident.unit))
            .map(RosterEntry::Resident);
        let staff = self
            .staff
            .iter()
            .filter(|member| matches(&member.name) || matches(&member.position))
            .map(RosterEntry::Staff);
        residents.chain(staff).collect()
    }
}

/// Guard logbook.
#[derive(Debug, Clone, Default)]
pub struct Logbook {
    entries: Vec<LogEntry>,
}

impl Logbook {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn record(
        &mut self,
        category: LogCategory,
        description: &str,
        author: &str,
        at: OffsetDateTime,
    ) -> Option<&LogEntry> {
        let description = description.trim();
        if description.is_empty() {
            return None;
        }
        tracing::info!(category = category.label(), author, "logbook entry recorded");
        self.entries.push(LogEntry {
            at,
            category,
            description: description.to_owned(),
            author: author.to_owned(),
        });
        self.entries.last()
    }

    /// Entries newest first, optionally limited to one category.
    pub fn entries(&self, filter: Option<LogCategory>) -> Vec<&LogEntry> {
        let mut entries: Vec<&LogEntry> = self
            .entries
            .iter()
            .filter(|entry| filter.is_none_or(|category| entry.category == category))
            .collect();
        entries.sort_by(|a, b| b.at.cmp(&a.at));
        entries
    }
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityMetrics {
    pub residents: usize,
    pub units: usize,
    pub occupied_units: usize,
    pub waiting_packages: usize,
    pub visits_today: usize,
    pub upcoming_reservations: usize,
    pub collection_rate: f64,
}

impl CommunityMetrics {
    pub fn compute(catalog: &MockCatalog, today: Date) -> Self {
        let mut occupied: Vec<&str> = catalog
            .residents
            .iter()
            .map(|resident| resident.unit.as_str())
            .collect();
        occupied.sort_unstable();
        occupied.dedup();

        let horizon = today.saturating_add(Duration::days(7));
        Self {
            residents: catalog.residents.len(),
            units: catalog.units.len(),
            occupied_units: occupied.len(),
            waiting_packages: catalog
                .packages
                .iter()
                .filter(|package| package.status == PackageStatus::Waiting)
                .count(),
            visits_today: visits::on_day(&catalog.visits, today).count(),
            upcoming_reservations: catalog
                .reservations
                .iter()
                .filter(|reservation| reservation.date >= today && reservation.date < horizon)
                .count(),
            collection_rate: CollectionReport::build(&catalog.debts, today).collection_rate(),
        }
    }

    pub fn occupancy(&self) -> f64 {
        if self.units == 0 {
            return 0.0;
        }
        self.occupied_units as f64 / self.units as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlateVerdict {
    Resident { plate: String, unit: String, owner: String },
    ExpectedVisitor { plate: String, unit: String, visitor: String },
    Unknown { plate: String },
    Invalid,
}

#[derive(Debug, Clone, Default)]
pub struct PlateRegistry {
    vehicles: Vec<Vehicle>,
}

impl PlateRegistry {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        let vehicles = vehicles
            .into_iter()
            .map(|vehicle| Vehicle {
                plate: normalize_plate(&vehicle.plate),
                ..vehicle
            })
            .collect();
        Self { vehicles }
    }

    /// Check a plate typed at the gate against resident vehicles and today's visits.
    pub fn verify(&self, raw: &str, visit_log: &[Visit], today: Date) -> PlateVerdict {
        let plate = normalize_plate(raw);
        if !PLATE_PATTERN.is_match(&plate) {
            tracing::debug!(raw, "plate rejected by format check");
            return PlateVerdict::Invalid;
        }

        if let Some(vehicle) = self.vehicles.iter().find(|vehicle| vehicle.plate == plate) {
            return PlateVerdict::Resident {
                plate,
                unit: vehicle.unit.clone(),
                owner: vehicle.owner.clone(),
            };
        }

        let expected = visits::on_day(visit_log, today).find(|visit| {
            visit
                .plate
                .as_deref()
                .is_some_and(|candidate| normalize_plate(candidate) == plate)
        });
        match expected {
            Some(visit) => PlateVerdict::ExpectedVisitor {
                plate,
                unit: visit.unit.clone(),
                visitor: visit.visitor.clone(),
            },
            None => {
                tracing::warn!(%plate, "unknown plate at gate");
                PlateVerdict::Unknown { plate }
            }
        }
    }
}

/// Uppercase and drop whitespace and dashes.
pub fn normalize_plate(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::macros::datetime;

    fn catalog() -> MockCatalog {
        MockCatalog::seeded(datetime!(2026-03-10 12:00 UTC))
    }

    #[test]
    fn collection_report_balances() {
        let catalog = catalog();
        let report = CollectionReport::build(&catalog.debts, catalog.today);
        assert_eq!(
            report.billed_cents,
            report.collected_cents + report.outstanding_cents
        );
        assert!(report.overdue_cents <= report.outstanding_cents);
        assert!(
            report
                .delinquent_units
                .windows(2)
                .all(|pair| pair[0].1 >= pair[1].1)
        );
        assert!(report.collection_rate() > 0.0 && report.collection_rate() < 1.0);
    }

    #[test]
    fn empty_collection_report_has_full_rate() {
        let report = CollectionReport::build(&[], catalog().today);
        assert_eq!(report.collection_rate(), 1.0);
        assert!(report.delinquent_units.is_empty());
    }

    #[test]
    fn roster_search_is_case_insensitive() {
        let catalog = catalog();
        let roster = Roster::new(catalog.residents.clone(), catalog.staff.clone());
        assert_eq!(roster.search("").len(), 12);

        let guards = roster.search("GUARD");
        assert_eq!(guards.len(), 2);
        assert!(guards.iter().all(|entry| matches!(entry, RosterEntry::Staff(_))));

        let by_unit = roster.search("b-10");
        assert_eq!(by_unit.len(), 2);
    }

    #[test]
    fn logbook_records_newest_first() {
        let catalog = catalog();
        let mut logbook = Logbook::new(catalog.logbook.clone());
        let now = datetime!(2026-03-10 12:00 UTC);
        assert!(logbook.record(LogCategory::Incident, "   ", "Elena", now).is_none());
        logbook
            .record(LogCategory::Incident, "Gate motor jammed", "Elena", now)
            .unwrap();

        let incidents = logbook.entries(Some(LogCategory::Incident));
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].description, "Gate motor jammed");
        assert_eq!(logbook.entries(None).len(), 5);
    }

    #[test]
    fn metrics_summarize_catalog() {
        let catalog = catalog();
        let metrics = CommunityMetrics::compute(&catalog, catalog.today);
        assert_eq!(metrics.residents, 8);
        assert_eq!(metrics.units, 10);
        assert_eq!(metrics.occupied_units, 8);
        assert_eq!(metrics.waiting_packages, 3);
        assert_eq!(metrics.visits_today, 3);
        assert_eq!(metrics.upcoming_reservations, 28);
        assert!((metrics.occupancy() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn plates_are_normalized() {
        assert_eq!(normalize_plate(" abc-123 "), "ABC123");
        assert_eq!(normalize_plate("kj h 2231"), "KJH2231");
    }

    #[test]
    fn verify_resident_visitor_unknown_invalid() {
        let catalog = catalog();
        let registry = PlateRegistry::new(catalog.vehicles.clone());
        let today = catalog.today;

        assert_eq!(
            registry.verify("abc-123", &catalog.visits, today),
            PlateVerdict::Resident {
                plate: "ABC123".into(),
                unit: "A-101".into(),
                owner: "María González".into(),
            }
        );
        assert!(matches!(
            registry.verify("kjh 2231", &catalog.visits, today),
            PlateVerdict::ExpectedVisitor { ref visitor, .. } if visitor == "Laura Méndez"
        ));
        // yesterday's visitor is no longer expected
        assert!(matches!(
            registry.verify("PLM-7781", &catalog.visits, today),
            PlateVerdict::Unknown { .. }
        ));
        assert_eq!(registry.verify("a1", &catalog.visits, today), PlateVerdict::Invalid);
        assert_eq!(registry.verify("ABC$123", &catalog.visits, today), PlateVerdict::Invalid);
    }
}
