//! Resident dashboard views.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::app::access::{AccessPass, Invitation};
use crate::app::notices::NoticeBoard;
use crate::app::payments::{PaymentsLedger, effective_status, format_money};
use crate::app::visits::VisitSection;
use crate::domain::model::{DebtStatus, NoticeCategory, Package};

fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(title.into())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn placeholder(text: &'static str) -> Paragraph<'static> {
    Paragraph::new(text).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

fn highlight() -> Style {
    Style::default()
        .bg(Color::Rgb(32, 52, 70))
        .add_modifier(Modifier::BOLD)
}

fn clock(at: OffsetDateTime) -> String {
    at.format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| at.to_string())
}

/// QR-style access pass plus the resident's active invitations.
#[derive(Debug, Default)]
pub struct AccessView;

impl AccessView {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        pass: &AccessPass,
        invitations: &[&Invitation],
        cursor: usize,
        now: OffsetDateTime,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(3)])
            .split(area);

        let code_style = if pass.is_valid(now) {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("Unit ", Style::default().fg(Color::Gray)),
                Span::raw(pass.unit.clone()),
            ]),
            Line::styled(pass.code.clone(), code_style),
            Line::styled(
                format!("refreshes in {}s", pass.remaining_secs(now)),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        let block = panel("Access pass");
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center),
            layout[0],
        );

        let block = panel(format!("Invitations ({})", invitations.len()));
        if invitations.is_empty() {
            frame.render_widget(
                placeholder("No active invitations · press / to invite").block(block),
                layout[1],
            );
            return;
        }
        let items: Vec<ListItem> = invitations
            .iter()
            .map(|invitation| {
                let until = invitation
                    .valid_until
                    .format(format_description!("[day] [month repr:short] [hour]:[minute]"))
                    .unwrap_or_else(|_| invitation.valid_until.to_string());
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<10} ", invitation.code),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(format!("{} ({})", invitation.visitor, invitation.kind.label())),
                    Span::styled(
                        format!("  until {until}"),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(cursor));
        frame.render_stateful_widget(
            List::new(items).block(block).highlight_style(highlight()),
            layout[1],
            &mut state,
        );
    }
}

#[derive(Debug, Default)]
pub struct PaymentsView;

impl PaymentsView {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        ledger: &PaymentsLedger,
        cursor: usize,
        today: Date,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(6),
            ])
            .split(area);

        let overdue = ledger.overdue_count(today);
        let totals = Line::from(vec![
            Span::styled("Balance due ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_money(ledger.total_due_cents()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{overdue} overdue"),
                Style::default().fg(if overdue > 0 { Color::Red } else { Color::Green }),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(totals).block(panel(format!("Unit {}", ledger.unit()))),
            layout[0],
        );

        let outstanding = ledger.outstanding();
        let block = panel("Outstanding · enter to pay");
        if outstanding.is_empty() {
            frame.render_widget(placeholder("All paid up").block(block), layout[1]);
        } else {
            let items: Vec<ListItem> = outstanding
                .iter()
                .map(|debt| {
                    let (status, color) = match effective_status(debt, today) {
                        DebtStatus::Overdue => ("overdue", Color::Red),
                        DebtStatus::Pending => ("pending", Color::Yellow),
                        DebtStatus::Paid => ("paid", Color::Green),
                    };
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("{:<18}", debt.concept)),
                        Span::raw(format!("{:>12}  ", format_money(debt.amount_cents))),
                        Span::styled(
                            format!("due {}  ", debt.due),
                            Style::default().fg(Color::Gray),
                        ),
                        Span::styled(status, Style::default().fg(color)),
                    ]))
                })
                .collect();
            let mut state = ListState::default().with_selected(Some(cursor));
            frame.render_stateful_widget(
                List::new(items).block(block).highlight_style(highlight()),
                layout[1],
                &mut state,
            );
        }

        let history: Vec<Line> = ledger
            .history()
            .iter()
            .map(|payment| {
                Line::from(vec![
                    Span::styled(
                        format!("{}  ", payment.paid_on),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::raw(format!("{:>12}  ", format_money(payment.amount_cents))),
                    Span::styled(payment.reference.clone(), Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(history).block(panel("History")), layout[2]);
    }
}

#[derive(Debug, Default)]
pub struct VisitsView;

impl VisitsView {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, sections: &[VisitSection]) {
        let block = panel("Visits");
        if sections.is_empty() {
            frame.render_widget(placeholder("No visits recorded").block(block), area);
            return;
        }

        let mut lines = Vec::new();
        for section in sections {
            lines.push(Line::styled(
                section.title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            for visit in &section.visits {
                let mut spans = vec![
                    Span::styled(
                        format!("  {}  ", clock(visit.arrived_at)),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::raw(visit.visitor.clone()),
                    Span::styled(
                        format!(" · {}", visit.kind.label()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ];
                if let Some(plate) = &visit.plate {
                    spans.push(Span::styled(
                        format!(" · {plate}"),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                lines.push(Line::from(spans));
            }
        }
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }
}

/// Parcels waiting at the front desk.
#[derive(Debug, Default)]
pub struct PackagesView;

impl PackagesView {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        title: &str,
        packages: &[&Package],
        cursor: usize,
    ) {
        let block = panel(format!("{title} ({})", packages.len()));
        if packages.is_empty() {
            frame.render_widget(placeholder("Nothing waiting at the desk").block(block), area);
            return;
        }
        let items: Vec<ListItem> = packages
            .iter()
            .map(|package| {
                let received = package
                    .received_at
                    .format(format_description!("[day] [month repr:short] [hour]:[minute]"))
                    .unwrap_or_else(|_| package.received_at.to_string());
                ListItem::new(Line::from(vec![
                    Span::styled(format!("#{:<5} ", package.id), Style::default().fg(Color::Gray)),
                    Span::raw(format!("{:<8} ", package.unit)),
                    Span::raw(format!("{:<12} ", package.carrier)),
                    Span::styled(received, Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(cursor));
        frame.render_stateful_widget(
            List::new(items).block(block).highlight_style(highlight()),
            area,
            &mut state,
        );
    }
}

#[derive(Debug, Default)]
pub struct NoticesView;

impl NoticesView {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        board: &NoticeBoard,
        filter: Option<NoticeCategory>,
        cursor: usize,
    ) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Min(3)])
            .split(area);

        let notices = board.list(filter);
        let title = format!(
            "Notices · {} · {} unread",
            filter.map_or("All", |category| category.label()),
            board.unread_count()
        );
        let block = panel(title);
        if notices.is_empty() {
            frame.render_widget(placeholder("No notices in this category").block(block), area);
            return;
        }

        let items: Vec<ListItem> = notices
            .iter()
            .map(|notice| {
                let marker = if board.is_read(notice.id) { "  " } else { "● " };
                let mut title_style = Style::default();
                if notice.pinned {
                    title_style = title_style.add_modifier(Modifier::BOLD);
                }
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!("{:<12}", notice.category.label()),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(notice.title.clone(), title_style),
                    Span::styled(
                        format!("  {}", notice.published),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();
        let mut state = ListState::default().with_selected(Some(cursor));
        frame.render_stateful_widget(
            List::new(items).block(block).highlight_style(highlight()),
            layout[0],
            &mut state,
        );

        if let Some(notice) = notices.get(cursor) {
            frame.render_widget(
                Paragraph::new(notice.body.clone())
                    .block(Block::default().borders(Borders::ALL).title(notice.title.clone()))
                    .wrap(Wrap { trim: true }),
                layout[1],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use time::macros::datetime;

    use crate::app::visits;
    use crate::infra::mock::MockCatalog;
    use crate::ui::components::rendered_text;

    fn catalog() -> MockCatalog {
        MockCatalog::seeded(datetime!(2026-03-10 12:00 UTC))
    }

    fn draw<F: FnOnce(&mut Frame<'_>, Rect)>(render: F) -> String {
        let backend = TestBackend::new(90, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                render(frame, area);
            })
            .unwrap();
        rendered_text(terminal.backend())
    }

    #[test]
    fn access_pass_shows_code() {
        let now = datetime!(2026-03-10 12:00 UTC);
        let pass = AccessPass::for_resident("A-101", now, std::time::Duration::from_secs(30));
        let rendered = draw(|frame, area| AccessView.render(frame, area, &pass, &[], 0, now));
        assert!(rendered.contains(&pass.code));
        assert!(rendered.contains("No active invitations"));
    }

    #[test]
    fn payments_show_balance() {
        let catalog = catalog();
        let ledger = PaymentsLedger::for_unit("A-101", &catalog.debts, &catalog.payments);
        let rendered =
            draw(|frame, area| PaymentsView.render(frame, area, &ledger, 0, catalog.today));
        assert!(rendered.contains(&format_money(ledger.total_due_cents())));
        assert!(rendered.contains("overdue"));
    }

    #[test]
    fn visits_show_section_titles() {
        let catalog = catalog();
        let sections = visits::group_by_day(&catalog.visits, catalog.today);
        let rendered = draw(|frame, area| VisitsView.render(frame, area, &sections));
        assert!(rendered.contains("Today"));
        assert!(rendered.contains("Yesterday"));
    }

    #[test]
    fn empty_packages_placeholder() {
        let rendered = draw(|frame, area| PackagesView.render(frame, area, "Waiting", &[], 0));
        assert!(rendered.contains("Nothing waiting at the desk"));
    }

    #[test]
    fn notices_show_unread_count() {
        let board = NoticeBoard::new(catalog().notices);
        let rendered = draw(|frame, area| NoticesView.render(frame, area, &board, None, 0));
        assert!(rendered.contains("4 unread"));
    }
}
