//! Single-line input overlay used for searches and quick forms.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// What the typed text will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    InviteVisitor,
    RosterSearch,
    PlateCheck,
    LogEntry,
    RegisterPackage,
}

impl PromptPurpose {
    pub fn title(&self) -> &'static str {
        match self {
            PromptPurpose::InviteVisitor => "Invite visitor",
            PromptPurpose::RosterSearch => "Search roster",
            PromptPurpose::PlateCheck => "Verify plate",
            PromptPurpose::LogEntry => "Logbook entry",
            PromptPurpose::RegisterPackage => "Register package",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            PromptPurpose::InviteVisitor => "visitor name, valid for 24 hours",
            PromptPurpose::RosterSearch => "name, unit or position",
            PromptPurpose::PlateCheck => "plate as read at the gate",
            PromptPurpose::LogEntry => "[entry|exit|incident|round:] description",
            PromptPurpose::RegisterPackage => "UNIT carrier",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct InputPromptState {
    purpose: Option<PromptPurpose>,
    input: String,
}

impl InputPromptState {
    /// Show the prompt with an empty buffer.
    pub fn open(&mut self, purpose: PromptPurpose) {
        self.purpose = Some(purpose);
        self.input.clear();
    }

    /// Show the prompt with `content` already typed.
    pub fn open_with<S: Into<String>>(&mut self, purpose: PromptPurpose, content: S) {
        self.purpose = Some(purpose);
        self.input = content.into();
    }

    pub fn close(&mut self) {
        self.purpose = None;
    }

    pub fn is_open(&self) -> bool {
        self.purpose.is_some()
    }

    pub fn purpose(&self) -> Option<PromptPurpose> {
        self.purpose
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Consume the buffer, leaving it empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn push_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }
}

#[derive(Debug, Default)]
pub struct InputPrompt;

impl InputPrompt {
    /// Draw the overlay near the bottom of `area` when open.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &InputPromptState) {
        let Some(purpose) = state.purpose() else {
            return;
        };

        let width = area.width.saturating_sub(10).min(72);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + area.height.saturating_sub(6),
            width,
            height: 5.min(area.height),
        };

        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(purpose.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(block.clone(), popup);

        let inner = block.inner(popup);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let prompt =
            Paragraph::new(format!("> {}", state.input())).style(Style::default().fg(Color::White));
        frame.render_widget(prompt, layout[0]);

        let hint = Paragraph::new(purpose.hint()).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, layout[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::ui::components::rendered_text;

    #[test]
    fn buffer_editing() {
        let mut state = InputPromptState::default();
        assert!(!state.is_open());

        state.open(PromptPurpose::PlateCheck);
        for ch in "abc1".chars() {
            state.push_char(ch);
        }
        state.pop_char();
        assert_eq!(state.input(), "abc");
        assert_eq!(state.take_input(), "abc");
        assert_eq!(state.input(), "");

        state.open_with(PromptPurpose::RosterSearch, "guard");
        assert_eq!(state.purpose(), Some(PromptPurpose::RosterSearch));
        assert_eq!(state.input(), "guard");
        state.close();
        assert!(!state.is_open());
    }

    #[test]
    fn renders_title_and_input() {
        let backend = TestBackend::new(60, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = InputPromptState::default();
        state.open_with(PromptPurpose::PlateCheck, "ABC-123");

        terminal
            .draw(|frame| {
                let area = frame.size();
                InputPrompt.render(frame, area, &state);
            })
            .unwrap();

        let rendered = rendered_text(terminal.backend());
        assert!(rendered.contains("Verify plate"));
        assert!(rendered.contains("> ABC-123"));
    }
}
