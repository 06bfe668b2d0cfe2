//! Facility booking view: facility tabs, day strip, and the slot grid.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use time::macros::format_description;

use crate::app::reservations::ReservationBoard;
use crate::domain::model::SlotIndex;

/// Keyboard cursor over the slot grid.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SlotPickerState {
    cursor: SlotIndex,
}

impl SlotPickerState {
    pub fn cursor(&self) -> SlotIndex {
        self.cursor
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self, slot_count: usize) {
        if self.cursor + 1 < slot_count {
            self.cursor += 1;
        }
    }

    pub fn clamp(&mut self, slot_count: usize) {
        self.cursor = self.cursor.min(slot_count.saturating_sub(1));
    }
}

#[derive(Debug, Default)]
pub struct SlotPicker;

impl SlotPicker {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        board: &ReservationBoard,
        state: &SlotPickerState,
    ) {
        let block = Block::default()
            .title("Reservations")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(inner);

        let names: Vec<String> = board
            .facilities()
            .iter()
            .map(|facility| format!("{} ({})", facility.name, facility.capacity))
            .collect();
        let facilities = Tabs::new(names)
            .select(board.facility_index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(facilities, layout[0]);

        let day = board
            .date()
            .format(format_description!(
                "[weekday repr:short] [day] [month repr:short]"
            ))
            .unwrap_or_else(|_| board.date().to_string());
        let day_line = Line::from(vec![
            Span::styled("‹ ", Style::default().fg(Color::DarkGray)),
            Span::styled(day, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(" ›", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("  day +{}", board.day_offset()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(day_line), layout[1]);

        let mut cells = Vec::new();
        for slot in board.slots() {
            let mut style = if !slot.available {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else if board.is_selected(slot.index) {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Green)
            };
            if slot.index == state.cursor() {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            cells.push(Span::styled(format!(" {} ", slot.label), style));
            cells.push(Span::raw(" "));
        }
        let grid = Paragraph::new(Line::from(cells)).wrap(Wrap { trim: false });
        frame.render_widget(grid, layout[3]);

        let selection = board.selection();
        let summary_style = if selection.is_empty() {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let mut footer = vec![Line::from(vec![
            Span::styled("Selected: ", Style::default().fg(Color::Gray)),
            Span::styled(board.summary(), summary_style),
        ])];
        if !board.confirmed().is_empty() {
            footer.push(Line::styled(
                format!("{} booked this session", board.confirmed().len()),
                Style::default().fg(Color::Green),
            ));
        }
        frame.render_widget(Paragraph::new(footer), layout[4]);
    }
}
