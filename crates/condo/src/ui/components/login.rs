//! Sign-in form: pick a role, type a name and (for residents) a unit.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::session::Session;
use crate::domain::model::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Role,
    Name,
    Unit,
}

#[derive(Debug, Clone)]
pub struct LoginState {
    role: Role,
    name: String,
    unit: String,
    field: LoginField,
}

impl LoginState {
    pub fn new(role: Role, name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            unit: unit.into(),
            field: LoginField::Role,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn field(&self) -> LoginField {
        self.field
    }

    pub fn toggle_role(&mut self) {
        self.role = match self.role {
            Role::Resident => Role::Admin,
            Role::Admin => Role::Resident,
        };
        if self.role == Role::Admin && self.field == LoginField::Unit {
            self.field = LoginField::Name;
        }
    }

    /// Move to the next field. Administrators have no unit field.
    pub fn next_field(&mut self) {
        self.field = match (self.field, self.role) {
            (LoginField::Role, _) => LoginField::Name,
            (LoginField::Name, Role::Resident) => LoginField::Unit,
            (LoginField::Name, Role::Admin) | (LoginField::Unit, _) => LoginField::Role,
        };
    }

    pub fn previous_field(&mut self) {
        self.field = match (self.field, self.role) {
            (LoginField::Role, Role::Resident) => LoginField::Unit,
            (LoginField::Role, Role::Admin) | (LoginField::Unit, _) => LoginField::Name,
            (LoginField::Name, _) => LoginField::Role,
        };
    }

    /// Type into the focused text field. On the role field, `r`/`a` pick a role.
    pub fn push_char(&mut self, ch: char) {
        match self.field {
            LoginField::Role => match ch.to_ascii_lowercase() {
                'r' => self.role = Role::Resident,
                'a' => self.role = Role::Admin,
                ' ' => self.toggle_role(),
                _ => {}
            },
            LoginField::Name => self.name.push(ch),
            LoginField::Unit => self.unit.push(ch.to_ascii_uppercase()),
        }
    }

    pub fn pop_char(&mut self) {
        match self.field {
            LoginField::Role => {}
            LoginField::Name => {
                self.name.pop();
            }
            LoginField::Unit => {
                self.unit.pop();
            }
        }
    }

    pub fn sign_in(&self, default_unit: &str) -> Session {
        Session::sign_in(self.role, &self.name, Some(&self.unit), default_unit)
    }
}

#[derive(Debug, Default)]
pub struct LoginForm;

impl LoginForm {
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &LoginState) {
        let width = area.width.min(48);
        let height = area.height.min(9);
        let form = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        let block = Block::default()
            .title("Sign in")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(block.clone(), form);
        let inner = block.inner(form);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let roles = Line::from(vec![
            role_span(Role::Resident, state.role()),
            Span::raw("  "),
            role_span(Role::Admin, state.role()),
        ]);
        frame.render_widget(
            Paragraph::new(field_line("Role", roles, state.field() == LoginField::Role)),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(field_line(
                "Name",
                Line::raw(state.name().to_owned()),
                state.field() == LoginField::Name,
            )),
            rows[1],
        );
        if state.role() == Role::Resident {
            frame.render_widget(
                Paragraph::new(field_line(
                    "Unit",
                    Line::raw(state.unit().to_owned()),
                    state.field() == LoginField::Unit,
                )),
                rows[2],
            );
        }

        let hint = Paragraph::new("tab next field · space toggle role · enter sign in")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, rows[4]);
    }
}

fn role_span(role: Role, current: Role) -> Span<'static> {
    let label = match role {
        Role::Resident => "Resident",
        Role::Admin => "Admin",
    };
    if role == current {
        Span::styled(
            format!("[{label}]"),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!(" {label} "), Style::default().fg(Color::Gray))
    }
}

fn field_line(label: &str, value: Line<'static>, focused: bool) -> Line<'static> {
    let marker = if focused { "›" } else { " " };
    let mut spans = vec![
        Span::styled(marker.to_owned(), Style::default().fg(Color::Cyan)),
        Span::styled(format!(" {label:<5} "), Style::default().fg(Color::Gray)),
    ];
    spans.extend(value.spans);
    Line::from(spans)
}
