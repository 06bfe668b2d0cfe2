//! Domain models for the community: facilities, bookings, money, visits, and people.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Position of a slot in the day's schedule.
pub type SlotIndex = usize;

/// Who is signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[default]
    Resident,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Resident => "resident",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resident" | "residente" => Ok(Role::Resident),
            "admin" | "administrator" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// One bookable hour for a facility on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub index: SlotIndex,
    pub label: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub capacity: u32,
}

/// A confirmed booking covering slots `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: u64,
    pub facility_id: String,
    pub unit: String,
    pub date: Date,
    pub start: SlotIndex,
    pub end: SlotIndex,
}

impl Reservation {
    pub fn slots(&self) -> impl Iterator<Item = SlotIndex> {
        self.start..=self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebtStatus {
    Pending,
    Overdue,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debt {
    pub id: u64,
    pub unit: String,
    pub concept: String,
    pub amount_cents: u64,
    pub due: Date,
    pub status: DebtStatus,
}

impl Debt {
    pub fn is_paid(&self) -> bool {
        self.status == DebtStatus::Paid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: u64,
    pub unit: String,
    pub debt_id: u64,
    pub amount_cents: u64,
    pub paid_on: Date,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitKind {
    Guest,
    Delivery,
    Service,
}

impl VisitKind {
    pub fn label(&self) -> &'static str {
        match self {
            VisitKind::Guest => "Guest",
            VisitKind::Delivery => "Delivery",
            VisitKind::Service => "Service",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub id: u64,
    pub unit: String,
    pub visitor: String,
    pub kind: VisitKind,
    pub arrived_at: OffsetDateTime,
    pub plate: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    Waiting,
    Collected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub id: u64,
    pub unit: String,
    pub carrier: String,
    pub received_at: OffsetDateTime,
    pub status: PackageStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeCategory {
    General,
    Maintenance,
    Event,
    Security,
}

impl NoticeCategory {
    pub fn label(&self) -> &'static str {
        match self {
            NoticeCategory::General => "General",
            NoticeCategory::Maintenance => "Maintenance",
            NoticeCategory::Event => "Event",
            NoticeCategory::Security => "Security",
        }
    }

    pub fn all() -> &'static [NoticeCategory] {
        &[
            NoticeCategory::General,
            NoticeCategory::Maintenance,
            NoticeCategory::Event,
            NoticeCategory::Security,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub category: NoticeCategory,
    pub published: Date,
    pub pinned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tenure {
    Owner,
    Tenant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resident {
    pub name: String,
    pub unit: String,
    pub phone: String,
    pub tenure: Tenure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    pub name: String,
    pub position: String,
    pub shift: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub plate: String,
    pub unit: String,
    pub owner: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Entry,
    Exit,
    Incident,
    Round,
}

impl LogCategory {
    pub fn label(&self) -> &'static str {
        match self {
            LogCategory::Entry => "Entry",
            LogCategory::Exit => "Exit",
            LogCategory::Incident => "Incident",
            LogCategory::Round => "Round",
        }
    }

    pub fn all() -> &'static [LogCategory] {
        &[
            LogCategory::Entry,
            LogCategory::Exit,
            LogCategory::Incident,
            LogCategory::Round,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub at: OffsetDateTime,
    pub category: LogCategory,
    pub description: String,
    pub author: String,
}
