//! Visit history grouped by calendar day.

use std::collections::BTreeMap;

use time::macros::format_description;
use time::{Date, Duration};

use crate::domain::model::Visit;

/// Visits that arrived on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitSection {
    pub title: String,
    pub date: Date,
    pub visits: Vec<Visit>,
}

/// Group `visits` by the day they arrived. Newest day first, newest visit first within a day.
pub fn group_by_day(visits: &[Visit], today: Date) -> Vec<VisitSection> {
    let mut days: BTreeMap<Date, Vec<Visit>> = BTreeMap::new();
    for visit in visits {
        days.entry(visit.arrived_at.date())
            .or_default()
            .push(visit.clone());
    }

    days.into_iter()
        .rev()
        .map(|(date, mut visits)| {
            visits.sort_by(|a, b| b.arrived_at.cmp(&a.arrived_at));
            VisitSection {
                title: section_title(date, today),
                date,
                visits,
            }
        })
        .collect()
}

/// "Today", "Yesterday", or the formatted date.
pub fn section_title(date: Date, today: Date) -> String {
    if date == today {
        return "Today".to_owned();
    }
    if today.checked_sub(Duration::days(1)) == Some(date) {
        return "Yesterday".to_owned();
    }
    date.format(format_description!("[day] [month repr:short] [year]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Visits for one unit, grouped.
pub fn history_for(visits: &[Visit], unit: &str, today: Date) -> Vec<VisitSection> {
    let mine: Vec<Visit> = visits
        .iter()
        .filter(|visit| visit.unit == unit)
        .cloned()
        .collect();
    group_by_day(&mine, today)
}

/// Visits that arrived on `date`.
pub fn on_day(visits: &[Visit], date: Date) -> impl Iterator<Item = &Visit> {
    visits.iter().filter(move |visit| visit.arrived_at.date() == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::OffsetDateTime;
    use time::macros::{date, datetime};

    use crate::domain::model::VisitKind;

    fn visit(id: u64, unit: &str, at: OffsetDateTime) -> Visit {
        Visit {
            id,
            unit: unit.into(),
            visitor: format!("visitor {id}"),
            kind: VisitKind::Guest,
            arrived_at: at,
            plate: None,
        }
    }

    #[test]
    fn groups_into_today_yesterday_and_dates() {
        let today = date!(2026 - 03 - 10);
        let visits = vec![
            visit(1, "A-101", datetime!(2026-03-08 18:00 UTC)),
            visit(2, "A-101", datetime!(2026-03-10 09:00 UTC)),
            visit(3, "A-101", datetime!(2026-03-09 22:30 UTC)),
            visit(4, "A-101", datetime!(2026-03-10 11:45 UTC)),
        ];

        let sections = group_by_day(&visits, today);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Today", "Yesterday", "08 Mar 2026"]);

        let today_ids: Vec<u64> = sections[0].visits.iter().map(|v| v.id).collect();
        assert_eq!(today_ids, vec![4, 2]);
    }

    #[test]
    fn empty_history_has_no_sections() {
        assert!(group_by_day(&[], date!(2026 - 03 - 10)).is_empty());
    }

    #[test]
    fn history_is_filtered_by_unit() {
        let today = date!(2026 - 03 - 10);
        let visits = vec![
            visit(1, "A-101", datetime!(2026-03-10 09:00 UTC)),
            visit(2, "B-202", datetime!(2026-03-10 10:00 UTC)),
        ];
        let sections = history_for(&visits, "B-202", today);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].visits[0].id, 2);
        assert_eq!(on_day(&visits, today).count(), 2);
    }
}
