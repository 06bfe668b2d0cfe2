//! Administrator console views.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Row, Table};
use time::macros::format_description;

use crate::app::admin::{CollectionReport, CommunityMetrics, PlateVerdict, RosterEntry};
use crate::app::payments::format_money;
use crate::domain::model::{LogCategory, LogEntry, Tenure};

fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(title.into())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.to_vec()).style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    )
}

#[derive(Debug, Default)]
pub struct CollectionsView;

impl CollectionsView {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, report: &CollectionReport) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(area);

        let figures = vec![
            money_line("Billed", report.billed_cents, Color::White),
            money_line("Collected", report.collected_cents, Color::Green),
            money_line("Outstanding", report.outstanding_cents, Color::Yellow),
            money_line("Overdue", report.overdue_cents, Color::Red),
        ];
        frame.render_widget(Paragraph::new(figures).block(panel("Collections")), layout[0]);

        let rate = report.collection_rate();
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Collection rate"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(rate.clamp(0.0, 1.0))
            .label(format!("{:.1}%", rate * 100.0));
        frame.render_widget(gauge, layout[1]);

        let rows: Vec<Row> = report
            .delinquent_units
            .iter()
            .map(|(unit, cents)| Row::new(vec![unit.clone(), format_money(*cents)]))
            .collect();
        let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(12)])
            .header(header(&["Unit", "Overdue"]))
            .block(panel(format!("Delinquent units ({})", report.delinquent_units.len())));
        frame.render_widget(table, layout[2]);
    }
}

fn money_line(label: &'static str, cents: u64, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(Color::Gray)),
        Span::styled(format!("{:>14}", format_money(cents)), Style::default().fg(color)),
    ])
}

#[derive(Debug, Default)]
pub struct RosterView;

impl RosterView {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        query: &str,
        entries: &[RosterEntry<'_>],
    ) {
        let title = if query.is_empty() {
            format!("Community roster ({})", entries.len())
        } else {
            format!("Community roster · \"{query}\" ({})", entries.len())
        };
        let rows: Vec<Row> = entries
            .iter()
            .map(|entry| match entry {
                RosterEntry::Resident(resident) => Row::new(vec![
                    resident.name.clone(),
                    resident.unit.clone(),
                    match resident.tenure {
                        Tenure::Owner => "Owner".to_owned(),
                        Tenure::Tenant => "Tenant".to_owned(),
                    },
                    resident.phone.clone(),
                ]),
                RosterEntry::Staff(member) => Row::new(vec![
                    member.name.clone(),
                    "staff".to_owned(),
                    member.position.clone(),
                    member.shift.clone(),
                ])
                .style(Style::default().fg(Color::Yellow)),
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(14),
                Constraint::Min(12),
            ],
        )
        .header(header(&["Name", "Unit", "Role", "Contact / shift"]))
        .block(panel(title));
        frame.render_widget(table, area);
    }
}

#[derive(Debug, Default)]
pub struct LogbookView;

impl LogbookView {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        entries: &[&LogEntry],
        filter: Option<LogCategory>,
    ) {
        let title = format!(
            "Logbook · {} · f filter · / new entry",
            filter.map_or("All", |category| category.label())
        );
        let items: Vec<ListItem> = entries
            .iter()
            .map(|entry| {
                let at = entry
                    .at
                    .format(format_description!("[day] [month repr:short] [hour]:[minute]"))
                    .unwrap_or_else(|_| entry.at.to_string());
                let color = match entry.category {
                    LogCategory::Incident => Color::Red,
                    LogCategory::Entry => Color::Green,
                    LogCategory::Exit => Color::Yellow,
                    LogCategory::Round => Color::Gray,
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{at}  "), Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("{:<9}", entry.category.label()),
                        Style::default().fg(color),
                    ),
                    Span::raw(entry.description.clone()),
                    Span::styled(
                        format!("  {}", entry.author),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();
        frame.render_widget(List::new(items).block(panel(title)), area);
    }
}

#[derive(Debug, Default)]
pub struct MetricsView;

impl MetricsView {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, metrics: &CommunityMetrics) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        let figure = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<24}"), Style::default().fg(Color::Gray)),
                Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
            ])
        };
        let lines = vec![
            figure("Residents", metrics.residents.to_string()),
            figure(
                "Occupied units",
                format!("{} / {}", metrics.occupied_units, metrics.units),
            ),
            figure("Packages waiting", metrics.waiting_packages.to_string()),
            figure("Visits today", metrics.visits_today.to_string()),
            figure(
                "Bookings next 7 days",
                metrics.upcoming_reservations.to_string(),
            ),
        ];
        frame.render_widget(Paragraph::new(lines).block(panel("Community metrics")), layout[0]);

        let occupancy = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Occupancy"))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(metrics.occupancy().clamp(0.0, 1.0));
        frame.render_widget(occupancy, layout[1]);

        let collection = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Collection rate"))
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(metrics.collection_rate.clamp(0.0, 1.0));
        frame.render_widget(collection, layout[2]);
    }
}

#[derive(Debug, Default)]
pub struct PlatesView;

impl PlatesView {
    /// `checks` is newest first: the raw input and its verdict.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, checks: &[(String, PlateVerdict)]) {
        let block = panel("Plate verification · / check a plate");
        if checks.is_empty() {
            frame.render_widget(
                Paragraph::new("No plates checked yet")
                    .style(
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::ITALIC),
                    )
                    .block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = checks
            .iter()
            .map(|(raw, verdict)| {
                let (text, color) = describe_verdict(raw, verdict);
                ListItem::new(Line::styled(text, Style::default().fg(color)))
            })
            .collect();
        frame.render_widget(List::new(items).block(block), area);
    }
}

/// One-line verdict text and its color.
pub fn describe_verdict(raw: &str, verdict: &PlateVerdict) -> (String, Color) {
    match verdict {
        PlateVerdict::Resident { plate, unit, owner } => (
            format!("{plate}: resident vehicle, unit {unit} ({owner})"),
            Color::Green,
        ),
        PlateVerdict::ExpectedVisitor {
            plate,
            unit,
            visitor,
        } => (
            format!("{plate}: expected visitor {visitor} for unit {unit}"),
            Color::Cyan,
        ),
        PlateVerdict::Unknown { plate } => {
            (format!("{plate}: not registered, hold at gate"), Color::Red)
        }
        PlateVerdict::Invalid => (format!("\"{raw}\": not a valid plate"), Color::Yellow),
    }
}
