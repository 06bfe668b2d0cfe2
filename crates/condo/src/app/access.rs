//! Gate access: the resident's rotating QR pass and visitor invitations.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use time::{Duration, OffsetDateTime};

use crate::domain::errors::DomainError;
use crate::domain::model::VisitKind;

/// Code shown as the resident's QR. It rotates every refresh window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPass {
    pub unit: String,
    pub code: String,
    pub expires_at: OffsetDateTime,
}

impl AccessPass {
    pub fn for_resident(unit: &str, now: OffsetDateTime, refresh: std::time::Duration) -> Self {
        let refresh = refresh.as_secs().max(1) as i64;
        let timestamp = now.unix_timestamp();
        let window = timestamp.div_euclid(refresh);
        let seconds_left = refresh - timestamp.rem_euclid(refresh);

        Self {
            unit: unit.to_owned(),
            code: pass_code(unit, window),
            expires_at: now + Duration::seconds(seconds_left)
                - Duration::nanoseconds(i64::from(now.nanosecond())),
        }
    }

    pub fn is_valid(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }

    /// Whole seconds until the pass rotates.
    pub fn remaining_secs(&self, now: OffsetDateTime) -> i64 {
        (self.expires_at - now).whole_seconds().max(0)
    }
}

fn pass_code(unit: &str, window: i64) -> String {
    let mut hasher = DefaultHasher::new();
    unit.hash(&mut hasher);
    window.hash(&mut hasher);
    let digest = hasher.finish();
    format!(
        "CND-{:04X}-{:04X}",
        (digest >> 16) & 0xFFFF,
        digest & 0xFFFF
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub code: String,
    pub visitor: String,
    pub kind: VisitKind,
    pub created_at: OffsetDateTime,
    pub valid_until: OffsetDateTime,
}

impl Invitation {
    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        self.created_at <= now && now < self.valid_until
    }
}

/// Visitor invitations issued by one unit.
#[derive(Debug, Clone)]
pub struct InvitationBook {
    unit: String,
    next_sequence: u32,
    invitations: Vec<Invitation>,
}

impl InvitationBook {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            next_sequence: 1,
            invitations: Vec::new(),
        }
    }

    pub fn invite(
        &mut self,
        visitor: &str,
        kind: VisitKind,
        valid_for: Duration,
        now: OffsetDateTime,
    ) -> Result<Invitation, DomainError> {
        let visitor = visitor.trim();
        if visitor.is_empty() {
            return Err(DomainError::MissingField("visitor name"));
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let invitation = Invitation {
            code: format!("{}-{sequence:04}", self.unit),
            visitor: visitor.to_owned(),
            kind,
            created_at: now,
            valid_until: now + valid_for,
        };
        tracing::info!(code = %invitation.code, kind = kind.label(), "visitor invited");
        self.invitations.push(invitation.clone());
        Ok(invitation)
    }

    /// Invitations still usable at `now`, newest first.
    pub fn active(&self, now: OffsetDateTime) -> Vec<&Invitation> {
        let mut active: Vec<&Invitation> = self
            .invitations
            .iter()
            .filter(|invitation| invitation.is_active(now))
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        active
    }

    pub fn revoke(&mut self, code: &str) -> bool {
        let before = self.invitations.len();
        self.invitations.retain(|invitation| invitation.code != code);
        before != self.invitations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::macros::datetime;

    const REFRESH: std::time::Duration = std::time::Duration::from_secs(30);

    #[test]
    fn pass_is_stable_within_a_window() {
        let now = datetime!(2026-03-10 12:00:05 UTC);
        let first = AccessPass::for_resident("A-101", now, REFRESH);
        let later = AccessPass::for_resident("A-101", now + Duration::seconds(20), REFRESH);
        assert_eq!(first, later);
        assert_eq!(first.expires_at, datetime!(2026-03-10 12:00:30 UTC));
        assert_eq!(first.remaining_secs(now), 25);
        assert!(first.code.starts_with("CND-"));
    }

    #[test]
    fn pass_rotates_with_the_window() {
        let now = datetime!(2026-03-10 12:00:05 UTC);
        let first = AccessPass::for_resident("A-101", now, REFRESH);
        let next = AccessPass::for_resident("A-101", now + Duration::seconds(30), REFRESH);
        assert!(!first.is_valid(next.expires_at - Duration::seconds(1)));
        assert_ne!(first.expires_at, next.expires_at);
    }

    #[test]
    fn invitations_get_sequential_codes_and_expire() {
        let now = datetime!(2026-03-10 12:00 UTC);
        let mut book = InvitationBook::new("A-101");
        let first = book
            .invite("Laura", VisitKind::Guest, Duration::hours(4), now)
            .unwrap();
        let second = book
            .invite("  Plumber ", VisitKind::Service, Duration::hours(1), now + Duration::minutes(5))
            .unwrap();
        assert_eq!(first.code, "A-101-0001");
        assert_eq!(second.code, "A-101-0002");
        assert_eq!(second.visitor, "Plumber");

        let active = book.active(now + Duration::minutes(30));
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].code, "A-101-0002");
        assert_eq!(book.active(now + Duration::hours(2)).len(), 1);
    }

    #[test]
    fn blank_visitor_is_rejected() {
        let mut book = InvitationBook::new("A-101");
        let now = datetime!(2026-03-10 12:00 UTC);
        assert_eq!(
            book.invite("   ", VisitKind::Guest, Duration::hours(1), now),
            Err(DomainError::MissingField("visitor name"))
        );
    }

    #[test]
    fn revoke_removes_invitation() {
        let mut book = InvitationBook::new("A-101");
        let now = datetime!(2026-03-10 12:00 UTC);
        let invitation = book
            .invite("Laura", VisitKind::Guest, Duration::hours(1), now)
            .unwrap();
        assert!(book.revoke(&invitation.code));
        assert!(!book.revoke(&invitation.code));
        assert!(book.active(now).is_empty());
    }
}
