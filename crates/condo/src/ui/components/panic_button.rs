//! Panic tab: hold progress gauge and the last alert sent.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use time::macros::format_description;

use crate::app::panic::{PanicButton, PanicState};
use crate::app::ports::PanicAlert;

#[derive(Debug, Default)]
pub struct PanicPanel;

impl PanicPanel {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        button: &PanicButton,
        last_alert: Option<&PanicAlert>,
        now: Instant,
    ) {
        let border = if button.is_triggered() {
            Color::Red
        } else {
            Color::Yellow
        };
        let block = Block::default()
            .title("Panic button")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        let instructions = format!(
            "Hold p for {:.1}s to alert security. Press a to acknowledge.",
            button.hold_duration().as_secs_f64()
        );
        frame.render_widget(
            Paragraph::new(instructions)
                .style(Style::default().fg(Color::Gray))
                .wrap(Wrap { trim: true }),
            layout[0],
        );

        let (label, color) = match button.state() {
            PanicState::Idle => ("Released".to_owned(), Color::DarkGray),
            PanicState::Holding { .. } => (
                format!("Holding {:.0}%", button.progress(now) * 100.0),
                Color::Yellow,
            ),
            PanicState::Triggered { .. } => ("ALERT SENT".to_owned(), Color::Red),
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(color))
            .ratio(button.progress(now).clamp(0.0, 1.0))
            .label(label);
        frame.render_widget(gauge, layout[1]);

        let detail = match last_alert {
            Some(alert) => {
                let at = alert
                    .raised_at
                    .format(format_description!("[hour]:[minute]:[second]"))
                    .unwrap_or_else(|_| alert.raised_at.to_string());
                Line::styled(
                    format!(
                        "Alert from unit {} ({}) at {at}. Security is on the way.",
                        alert.unit, alert.raised_by
                    ),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            }
            None => Line::styled("No alerts raised", Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(
            Paragraph::new(detail).wrap(Wrap { trim: true }),
            layout[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use time::macros::datetime;

    use crate::ui::components::rendered_text;

    fn draw(button: &PanicButton, alert: Option<&PanicAlert>, now: Instant) -> String {
        let backend = TestBackend::new(70, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                PanicPanel.render(frame, area, button, alert, now);
            })
            .unwrap();
        rendered_text(terminal.backend())
    }

    #[test]
    fn shows_hold_progress() {
        let start = Instant::now();
        let mut button = PanicButton::new(Duration::from_secs(2), Duration::from_millis(500));
        button.press(start);
        let rendered = draw(&button, None, start + Duration::from_secs(1));
        assert!(rendered.contains("Holding 50%"));
        assert!(rendered.contains("No alerts raised"));
    }

    #[test]
    fn shows_sent_alert() {
        let start = Instant::now();
        let mut button = PanicButton::new(Duration::from_millis(100), Duration::from_secs(1));
        button.press(start);
        assert!(button.tick(start + Duration::from_millis(150)).is_some());
        let alert = PanicAlert {
            unit: "A-101".into(),
            raised_by: "Ana".into(),
            raised_at: datetime!(2026-03-10 22:15:07 UTC),
        };
        let rendered = draw(&button, Some(&alert), start + Duration::from_millis(200));
        assert!(rendered.contains("ALERT SENT"));
        assert!(rendered.contains("22:15:07"));
    }
}
