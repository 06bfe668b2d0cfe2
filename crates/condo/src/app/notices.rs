//! Community notice board.

use std::collections::HashSet;

use crate::domain::model::{Notice, NoticeCategory};

#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
    read: HashSet<u64>,
}

impl NoticeBoard {
    pub fn new(notices: Vec<Notice>) -> Self {
        Self {
            notices,
            read: HashSet::new(),
        }
    }

    /// Pinned notices first, then newest first. `None` lists every category.
    pub fn list(&self, filter: Option<NoticeCategory>) -> Vec<&Notice> {
        let mut listed: Vec<&Notice> = self
            .notices
            .iter()
            .filter(|notice| filter.is_none_or(|category| notice.category == category))
            .collect();
        listed.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then(b.published.cmp(&a.published))
                .then(a.id.cmp(&b.id))
        });
        listed
    }

    pub fn is_read(&self, id: u64) -> bool {
        self.read.contains(&id)
    }

    /// Returns `false` for unknown notices.
    pub fn mark_read(&mut self, id: u64) -> bool {
        if !self.notices.iter().any(|notice| notice.id == id) {
            return false;
        }
        self.read.insert(id);
        true
    }

    pub fn unread_count(&self) -> usize {
        self.notices
            .iter()
            .filter(|notice| !self.read.contains(&notice.id))
            .count()
    }
}

/// Cycle `None -> General -> ... -> Security -> None`.
pub fn next_filter(current: Option<NoticeCategory>) -> Option<NoticeCategory> {
    let all = NoticeCategory::all();
    match current {
        None => all.first().copied(),
        Some(category) => all
            .iter()
            .position(|candidate| *candidate == category)
            .and_then(|position| all.get(position + 1))
            .copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::macros::datetime;

    use crate::infra::mock::MockCatalog;

    fn board() -> NoticeBoard {
        NoticeBoard::new(MockCatalog::seeded(datetime!(2026-03-10 12:00 UTC)).notices)
    }

    #[test]
    fn pinned_notices_come_first() {
        let board = board();
        let listed = board.list(None);
        assert!(listed[0].pinned);
        assert!(
            listed[1..]
                .windows(2)
                .all(|pair| pair[0].published >= pair[1].published)
        );
    }

    #[test]
    fn filter_by_category() {
        let board = board();
        let security = board.list(Some(NoticeCategory::Security));
        assert_eq!(security.len(), 1);
        assert_eq!(security[0].title, "Gate access update");
    }

    #[test]
    fn read_tracking() {
        let mut board = board();
        assert_eq!(board.unread_count(), 4);
        assert!(board.mark_read(40));
        assert!(board.mark_read(40));
        assert!(!board.mark_read(999));
        assert_eq!(board.unread_count(), 3);
        assert!(board.is_read(40));
    }

    #[test]
    fn filter_cycles_back_to_all() {
        let mut filter = None;
        let mut seen = Vec::new();
        for _ in 0..5 {
            filter = next_filter(filter);
            seen.push(filter);
        }
        assert_eq!(seen.last(), Some(&None));
        assert_eq!(seen[0], Some(NoticeCategory::General));
    }
}
