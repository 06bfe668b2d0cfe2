//! Hardcoded community data standing in for a backend.
//!
//! Dates are generated relative to the `now` passed to [`MockCatalog::seeded`], so the data
//! always looks current and tests stay deterministic.

use std::collections::BTreeSet;

use time::{Date, Duration, OffsetDateTime};

use crate::domain::model::{
    Debt, DebtStatus, Facility, LogCategory, LogEntry, Notice, NoticeCategory, Package,
    PackageStatus, Payment, Reservation, Resident, SlotIndex, StaffMember, Tenure, Vehicle,
    Visit, VisitKind,
};

const UNITS: &[&str] = &[
    "A-101", "A-102", "A-201", "A-202", "B-101", "B-102", "B-201", "B-202", "C-101", "C-102",
];

/// Everything the screens display.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    pub today: Date,
    pub units: Vec<String>,
    pub facilities: Vec<Facility>,
    /// Bookings made by other residents; they block slots.
    pub reservations: Vec<Reservation>,
    pub debts: Vec<Debt>,
    pub payments: Vec<Payment>,
    pub visits: Vec<Visit>,
    pub packages: Vec<Package>,
    pub notices: Vec<Notice>,
    pub residents: Vec<Resident>,
    pub staff: Vec<StaffMember>,
    pub vehicles: Vec<Vehicle>,
    pub logbook: Vec<LogEntry>,
}

impl MockCatalog {
    pub fn seeded(now: OffsetDateTime) -> Self {
        let today = now.date();
        let facilities = facilities();
        Self {
            today,
            units: UNITS.iter().map(|unit| (*unit).to_owned()).collect(),
            reservations: reservations(&facilities, today),
            facilities,
            debts: debts(today),
            payments: payments(today),
            visits: visits(now),
            packages: packages(now),
            notices: notices(today),
            residents: residents(),
            staff: staff(),
            vehicles: vehicles(),
            logbook: logbook(now),
        }
    }

    pub fn facility(&self, id: &str) -> Option<&Facility> {
        self.facilities.iter().find(|facility| facility.id == id)
    }

    /// Slots already taken for a facility on `date`, limited to the schedule length.
    pub fn blocked_slots(&self, facility_id: &str, date: Date, slot_count: usize) -> BTreeSet<SlotIndex> {
        self.reservations
            .iter()
            .filter(|reservation| reservation.facility_id == facility_id && reservation.date == date)
            .flat_map(Reservation::slots)
            .filter(|index| *index < slot_count)
            .collect()
    }
}

fn facilities() -> Vec<Facility> {
    [
        ("pool", "Swimming Pool", 20),
        ("gym", "Gym", 8),
        ("bbq", "BBQ Area", 12),
        ("hall", "Event Hall", 60),
    ]
    .into_iter()
    .map(|(id, name, capacity)| Facility {
        id: id.to_owned(),
        name: name.to_owned(),
        capacity,
    })
    .collect()
}

fn reservations(facilities: &[Facility], today: Date) -> Vec<Reservation> {
    let mut out = Vec::new();
    let mut id = 9_000;
    for (facility_index, facility) in facilities.iter().enumerate() {
        for day in 0..7_usize {
            let start = (facility_index * 2 + day * 3) % 10;
            let end = if day % 2 == 0 { start + 1 } else { start };
            id += 1;
            out.push(Reservation {
                id,
                facility_id: facility.id.clone(),
                unit: UNITS[(facility_index + day) % UNITS.len()].to_owned(),
                date: today.saturating_add(Duration::days(day as i64)),
                start,
                end,
            });
        }
    }
    out
}

fn debts(today: Date) -> Vec<Debt> {
    let mut out = Vec::new();
    let mut id = 100;
    for (position, unit) in UNITS.iter().enumerate() {
        let entries = [
            ("Maintenance fee", 185_000, -40, position % 3 != 0),
            ("Maintenance fee", 185_000, -10, position % 2 == 0),
            ("Maintenance fee", 185_000, 20, false),
        ];
        for (concept, amount_cents, offset, paid) in entries {
            id += 1;
            let due = today.saturating_add(Duration::days(offset));
            out.push(Debt {
                id,
                unit: (*unit).to_owned(),
                concept: concept.to_owned(),
                amount_cents,
                due,
                status: if paid {
                    DebtStatus::Paid
                } else if due < today {
                    DebtStatus::Overdue
                } else {
                    DebtStatus::Pending
                },
            });
        }
    }
    id += 1;
    out.push(Debt {
        id,
        unit: "A-101".to_owned(),
        concept: "Event hall cleaning".to_owned(),
        amount_cents: 45_000,
        due: today.saturating_add(Duration::days(5)),
        status: DebtStatus::Pending,
    });
    out
}

fn payments(today: Date) -> Vec<Payment> {
    vec![
        Payment {
            id: 501,
            unit: "A-101".to_owned(),
            debt_id: 90,
            amount_cents: 185_000,
            paid_on: today.saturating_sub(Duration::days(62)),
            reference: "TRX-000501".to_owned(),
        },
        Payment {
            id: 502,
            unit: "A-101".to_owned(),
            debt_id: 91,
            amount_cents: 185_000,
            paid_on: today.saturating_sub(Duration::days(33)),
            reference: "TRX-000502".to_owned(),
        },
    ]
}

fn visits(now: OffsetDateTime) -> Vec<Visit> {
    [
        ("A-101", "Laura Méndez", VisitKind::Guest, 1, Some("KJH-2231")),
        ("A-101", "QuickShip courier", VisitKind::Delivery, 3, None),
        ("A-101", "Aqua Plumbing", VisitKind::Service, 26, Some("PLM-7781")),
        ("A-101", "Jorge Ríos", VisitKind::Guest, 30, None),
        ("A-101", "Fresh Market", VisitKind::Delivery, 75, None),
        ("B-202", "Ana Torres", VisitKind::Guest, 2, Some("TRS-4410")),
        ("C-101", "Elevator Co.", VisitKind::Service, 50, Some("ELV-0099")),
    ]
    .into_iter()
    .enumerate()
    .map(|(position, (unit, visitor, kind, hours_ago, plate))| Visit {
        id: 300 + position as u64,
        unit: unit.to_owned(),
        visitor: visitor.to_owned(),
        kind,
        arrived_at: now - Duration::hours(hours_ago),
        plate: plate.map(str::to_owned),
    })
    .collect()
}

fn packages(now: OffsetDateTime) -> Vec<Package> {
    [
        ("A-101", "DHL", 2, PackageStatus::Waiting),
        ("A-101", "Amazon", 20, PackageStatus::Waiting),
        ("A-101", "FedEx", 96, PackageStatus::Collected),
        ("B-101", "Mercado Libre", 5, PackageStatus::Waiting),
        ("C-102", "UPS", 30, PackageStatus::Collected),
    ]
    .into_iter()
    .enumerate()
    .map(|(position, (unit, carrier, hours_ago, status))| Package {
        id: 700 + position as u64,
        unit: unit.to_owned(),
        carrier: carrier.to_owned(),
        received_at: now - Duration::hours(hours_ago),
        status,
    })
    .collect()
}

fn notices(today: Date) -> Vec<Notice> {
    [
        (
            "Water shutdown",
            "Tower B water supply will be interrupted Thursday from 10:00 to 14:00.",
            NoticeCategory::Maintenance,
            1,
            true,
        ),
        (
            "Community assembly",
            "Annual assembly in the event hall, Saturday 18:00. Quorum required.",
            NoticeCategory::Event,
            3,
            false,
        ),
        (
            "Gate access update",
            "Visitors must now present a QR invitation at the main gate.",
            NoticeCategory::Security,
            6,
            false,
        ),
        (
            "Recycling schedule",
            "Recycling pickup moves to Tuesdays and Fridays.",
            NoticeCategory::General,
            10,
            false,
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(position, (title, body, category, days_ago, pinned))| Notice {
        id: 40 + position as u64,
        title: title.to_owned(),
        body: body.to_owned(),
        category,
        published: today.saturating_sub(Duration::days(days_ago)),
        pinned,
    })
    .collect()
}

fn residents() -> Vec<Resident> {
    [
        ("María González", "A-101", "+52 55 1234 0001", Tenure::Owner),
        ("Carlos Pérez", "A-102", "+52 55 1234 0002", Tenure::Tenant),
        ("Lucía Herrera", "A-201", "+52 55 1234 0003", Tenure::Owner),
        ("Diego Castillo", "A-202", "+52 55 1234 0004", Tenure::Owner),
        ("Sofía Ramírez", "B-101", "+52 55 1234 0005", Tenure::Tenant),
        ("Andrés Morales", "B-102", "+52 55 1234 0006", Tenure::Owner),
        ("Valeria Cruz", "B-202", "+52 55 1234 0007", Tenure::Tenant),
        ("Miguel Ortega", "C-101", "+52 55 1234 0008", Tenure::Owner),
    ]
    .into_iter()
    .map(|(name, unit, phone, tenure)| Resident {
        name: name.to_owned(),
        unit: unit.to_owned(),
        phone: phone.to_owned(),
        tenure,
    })
    .collect()
}

fn staff() -> Vec<StaffMember> {
    [
        ("Roberto Vega", "Security guard", "Night"),
        ("Elena Navarro", "Security guard", "Day"),
        ("Tomás Ibarra", "Maintenance", "Day"),
        ("Patricia Luna", "Administrator", "Office hours"),
    ]
    .into_iter()
    .map(|(name, position, shift)| StaffMember {
        name: name.to_owned(),
        position: position.to_owned(),
        shift: shift.to_owned(),
    })
    .collect()
}

fn vehicles() -> Vec<Vehicle> {
    [
        ("ABC123", "A-101", "María González"),
        ("XYZ9876", "A-202", "Diego Castillo"),
        ("MOR4521", "B-102", "Andrés Morales"),
        ("ORT777", "C-101", "Miguel Ortega"),
    ]
    .into_iter()
    .map(|(plate, unit, owner)| Vehicle {
        plate: plate.to_owned(),
        unit: unit.to_owned(),
        owner: owner.to_owned(),
    })
    .collect()
}

fn logbook(now: OffsetDateTime) -> Vec<LogEntry> {
    [
        (LogCategory::Round, "Perimeter round completed, no findings.", "Roberto Vega", 9),
        (LogCategory::Entry, "Water utility crew entered through service gate.", "Elena Navarro", 5),
        (LogCategory::Incident, "Parking lot light out near tower C.", "Elena Navarro", 4),
        (LogCategory::Exit, "Water utility crew left the premises.", "Elena Navarro", 2),
    ]
    .into_iter()
    .map(|(category, description, author, hours_ago)| LogEntry {
        at: now - Duration::hours(hours_ago),
        category,
        description: description.to_owned(),
        author: author.to_owned(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::macros::datetime;

    #[test]
    fn blocked_slots_come_from_existing_bookings() {
        let catalog = MockCatalog::seeded(datetime!(2026-03-10 12:00 UTC));
        // pool, day 0: start 0, two slots
        let blocked = catalog.blocked_slots("pool", catalog.today, 12);
        assert_eq!(blocked, [0, 1].into_iter().collect());
        assert!(catalog.blocked_slots("pool", catalog.today, 1).len() == 1);
        assert!(catalog.blocked_slots("spa", catalog.today, 12).is_empty());
    }

    #[test]
    fn seeded_data_is_relative_to_now() {
        let catalog = MockCatalog::seeded(datetime!(2026-03-10 12:00 UTC));
        assert!(catalog.debts.iter().any(|debt| debt.status == DebtStatus::Overdue));
        assert!(catalog.visits.iter().all(|visit| visit.arrived_at <= datetime!(2026-03-10 12:00 UTC)));
        assert!(catalog.facility("gym").is_some());
    }
}
