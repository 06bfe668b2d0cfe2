//! Application loop for the TUI.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::{Frame, Terminal};
use time::OffsetDateTime;

use crate::app::access::{AccessPass, InvitationBook};
use crate::app::admin::{
    CollectionReport, CommunityMetrics, Logbook, PlateRegistry, PlateVerdict, Roster,
};
use crate::app::notices::{self, NoticeBoard};
use crate::app::packages::PackageInbox;
use crate::app::panic::{self, PanicButton};
use crate::app::payments::PaymentsLedger;
use crate::app::ports::PanicAlert;
use crate::app::receipt::ReceiptRenderer;
use crate::app::reservations::ReservationBoard;
use crate::app::session::Session;
use crate::app::visits;
use crate::domain::errors::DomainError;
use crate::domain::model::{LogCategory, NoticeCategory, VisitKind};
use crate::infra::backend::MockBackend;
use crate::infra::config::Config;
use crate::infra::mock::MockCatalog;
use crate::ui::components::admin::{
    CollectionsView, LogbookView, MetricsView, PlatesView, RosterView, describe_verdict,
};
use crate::ui::components::input_prompt::{InputPrompt, InputPromptState, PromptPurpose};
use crate::ui::components::login::{LoginForm, LoginState};
use crate::ui::components::panic_button::PanicPanel;
use crate::ui::components::resident::{
    AccessView, NoticesView, PackagesView, PaymentsView, VisitsView,
};
use crate::ui::components::slot_picker::{SlotPicker, SlotPickerState};

const TICK_RATE: Duration = Duration::from_millis(120);
const STATUS_TTL: Duration = Duration::from_secs(4);
const INVITATION_TTL: time::Duration = time::Duration::hours(24);

/// Primary entry point for running the interactive TUI.
pub struct UiApp {
    config: Config,
    backend: MockBackend,
    catalog: MockCatalog,
    /// Shared between the front desk and residents.
    packages: PackageInbox,
    receipts: ReceiptRenderer,
    login: LoginState,
    screen: Screen,
    prompt: InputPromptState,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl UiApp {
    /// Build the app over a catalog seeded at `now`, starting on the sign-in form.
    pub fn new(config: Config, backend: MockBackend, now: OffsetDateTime) -> Result<Self> {
        let catalog = MockCatalog::seeded(now);
        let login = LoginState::new(
            config.defaults.role,
            config.defaults.name.clone().unwrap_or_default(),
            config.defaults.unit.clone(),
        );
        Ok(Self {
            packages: PackageInbox::new(catalog.packages.clone()),
            receipts: ReceiptRenderer::new()?,
            config,
            backend,
            catalog,
            login,
            screen: Screen::Login,
            prompt: InputPromptState::default(),
            status: None,
            should_quit: false,
        })
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        event_loop_result
    }

    /// Skip the sign-in form.
    pub fn start_session(&mut self, session: Session, now: OffsetDateTime) {
        self.open_session(session, Instant::now(), now);
    }

    fn open_session(&mut self, session: Session, instant: Instant, now: OffsetDateTime) {
        self.set_status(
            instant,
            StatusLevel::Success,
            format!("Welcome, {}", session.name()),
        );
        self.screen = if session.is_admin() {
            Screen::Admin(Box::new(AdminWorkspace::new(session, &self.catalog)))
        } else {
            Screen::Resident(Box::new(ResidentWorkspace::new(
                session,
                &self.catalog,
                &self.config,
                now,
            )))
        };
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame, Instant::now(), OffsetDateTime::now_utc()))?;
            self.tick(Instant::now(), OffsetDateTime::now_utc());

            if self.should_quit {
                break;
            }

            if event::poll(TICK_RATE)? {
                let ev = event::read()?;
                self.handle_event(ev)?;
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => {
                self.handle_key_event(key, Instant::now(), OffsetDateTime::now_utc())
            }
            Event::Resize(..) => {}
            Event::Mouse(_) => {}
            Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
        }
        Ok(())
    }

    fn tick(&mut self, instant: Instant, now: OffsetDateTime) {
        if let Some(status) = &self.status
            && status.is_expired(instant)
        {
            self.status = None;
        }

        let Screen::Resident(workspace) = &mut self.screen else {
            return;
        };
        if !workspace.pass.is_valid(now) {
            workspace.pass =
                AccessPass::for_resident(&workspace.unit, now, self.config.access.refresh());
        }
        if workspace.panic.tick(instant).is_none() {
            return;
        }

        let outcome = match panic::dispatch_alert(
            &self.backend,
            &workspace.unit,
            workspace.session.name(),
            now,
        ) {
            Ok(alert) => {
                workspace.last_alert = Some(alert);
                Outcome::Status(
                    StatusLevel::Error,
                    "Panic alert sent. Security has been notified.".to_owned(),
                )
            }
            Err(err) => Outcome::Status(StatusLevel::Error, format!("Panic alert failed: {err}")),
        };
        self.apply(outcome, instant, now);
    }

    fn handle_key_event(&mut self, key: KeyEvent, instant: Instant, now: OffsetDateTime) {
        if key.kind == KeyEventKind::Release {
            if key.code == KeyCode::Char('p')
                && let Screen::Resident(workspace) = &mut self.screen
            {
                workspace.panic.release(instant);
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        let outcome = if self.prompt.is_open() {
            self.handle_prompt_key(key, now)
        } else {
            match self.screen {
                Screen::Login => self.handle_login_key(key),
                Screen::Resident(_) => self.handle_resident_key(key, instant, now),
                Screen::Admin(_) => self.handle_admin_key(key),
            }
        };
        self.apply(outcome, instant, now);
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Esc => Outcome::Quit,
            KeyCode::Enter => Outcome::SignIn(self.login.sign_in(&self.config.defaults.unit)),
            KeyCode::Tab | KeyCode::Down => {
                self.login.next_field();
                Outcome::Quiet
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.login.previous_field();
                Outcome::Quiet
            }
            KeyCode::Left | KeyCode::Right => {
                self.login.toggle_role();
                Outcome::Quiet
            }
            KeyCode::Backspace => {
                self.login.pop_char();
                Outcome::Quiet
            }
            KeyCode::Char(ch) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.login.push_char(ch);
                Outcome::Quiet
            }
            _ => Outcome::Quiet,
        }
    }

    fn handle_resident_key(
        &mut self,
        key: KeyEvent,
        instant: Instant,
        now: OffsetDateTime,
    ) -> Outcome {
        let Screen::Resident(workspace) = &mut self.screen else {
            return Outcome::Quiet;
        };
        let today = self.catalog.today;

        match key.code {
            KeyCode::Tab => {
                workspace.tab = cycle(&ResidentTab::ALL, workspace.tab, true);
                Outcome::Quiet
            }
            KeyCode::BackTab => {
                workspace.tab = cycle(&ResidentTab::ALL, workspace.tab, false);
                Outcome::Quiet
            }
            KeyCode::Esc => Outcome::SignOut,
            KeyCode::Char('q') => Outcome::Quit,
            code => match workspace.tab {
                ResidentTab::Access => access_key(workspace, code, now),
                ResidentTab::Panic => panic_key(workspace, code, instant),
                ResidentTab::Reservations => {
                    reservations_key(workspace, code, &self.backend, &self.receipts)
                }
                ResidentTab::Payments => {
                    payments_key(workspace, code, &self.backend, &self.receipts, today)
                }
                ResidentTab::Visits => Outcome::Quiet,
                ResidentTab::Packages => {
                    let waiting = self.packages.waiting_for(&workspace.unit);
                    list_key(&mut workspace.package_cursor, waiting.len(), code);
                    match (code, waiting.get(workspace.package_cursor)) {
                        (KeyCode::Enter, Some(package)) => Outcome::CollectPackage(package.id),
                        _ => Outcome::Quiet,
                    }
                }
                ResidentTab::Notices => notices_key(workspace, code),
            },
        }
    }

    fn handle_admin_key(&mut self, key: KeyEvent) -> Outcome {
        let Screen::Admin(workspace) = &mut self.screen else {
            return Outcome::Quiet;
        };

        match key.code {
            KeyCode::Tab => {
                workspace.tab = cycle(&AdminTab::ALL, workspace.tab, true);
                Outcome::Quiet
            }
            KeyCode::BackTab => {
                workspace.tab = cycle(&AdminTab::ALL, workspace.tab, false);
                Outcome::Quiet
            }
            KeyCode::Esc => Outcome::SignOut,
            KeyCode::Char('q') => Outcome::Quit,
            code => match (workspace.tab, code) {
                (AdminTab::Roster, KeyCode::Char('/')) => {
                    Outcome::Prompt(PromptPurpose::RosterSearch, workspace.roster_query.clone())
                }
                (AdminTab::Roster, KeyCode::Char('c')) => {
                    workspace.roster_query.clear();
                    Outcome::Quiet
                }
                (AdminTab::Logbook, KeyCode::Char('/')) => {
                    Outcome::Prompt(PromptPurpose::LogEntry, String::new())
                }
                (AdminTab::Logbook, KeyCode::Char('f')) => {
                    workspace.log_filter = next_log_filter(workspace.log_filter);
                    Outcome::Quiet
                }
                (AdminTab::Plates, KeyCode::Char('/')) => {
                    Outcome::Prompt(PromptPurpose::PlateCheck, String::new())
                }
                (AdminTab::Packages, KeyCode::Char('/')) => {
                    Outcome::Prompt(PromptPurpose::RegisterPackage, String::new())
                }
                (AdminTab::Packages, code) => {
                    let waiting = self.packages.waiting();
                    list_key(&mut workspace.package_cursor, waiting.len(), code);
                    match (code, waiting.get(workspace.package_cursor)) {
                        (KeyCode::Enter, Some(package)) => Outcome::CollectPackage(package.id),
                        _ => Outcome::Quiet,
                    }
                }
                _ => Outcome::Quiet,
            },
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, now: OffsetDateTime) -> Outcome {
        match key.code {
            KeyCode::Esc => {
                self.prompt.close();
                Outcome::Quiet
            }
            KeyCode::Enter => {
                let purpose = self.prompt.purpose();
                let input = self.prompt.take_input();
                self.prompt.close();
                match purpose {
                    Some(purpose) => self.submit_prompt(purpose, &input, now),
                    None => Outcome::Quiet,
                }
            }
            KeyCode::Backspace => {
                self.prompt.pop_char();
                Outcome::Quiet
            }
            KeyCode::Char(ch) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.prompt.push_char(ch);
                }
                Outcome::Quiet
            }
            _ => Outcome::Quiet,
        }
    }

    fn submit_prompt(&mut self, purpose: PromptPurpose, input: &str, now: OffsetDateTime) -> Outcome {
        if purpose == PromptPurpose::RegisterPackage {
            return self.register_package(input, now);
        }

        let today = self.catalog.today;
        match (&mut self.screen, purpose) {
            (Screen::Resident(workspace), PromptPurpose::InviteVisitor) => {
                match workspace
                    .invitations
                    .invite(input, VisitKind::Guest, INVITATION_TTL, now)
                {
                    Ok(invitation) => Outcome::Status(
                        StatusLevel::Success,
                        format!("Invitation {} for {}", invitation.code, invitation.visitor),
                    ),
                    Err(err) => err.into(),
                }
            }
            (Screen::Admin(workspace), PromptPurpose::RosterSearch) => {
                workspace.roster_query = input.trim().to_owned();
                Outcome::Quiet
            }
            (Screen::Admin(workspace), PromptPurpose::PlateCheck) => {
                let verdict = workspace.plates.verify(input, &self.catalog.visits, today);
                let (text, _) = describe_verdict(input, &verdict);
                let level = match verdict {
                    PlateVerdict::Resident { .. } | PlateVerdict::ExpectedVisitor { .. } => {
                        StatusLevel::Success
                    }
                    PlateVerdict::Unknown { .. } | PlateVerdict::Invalid => StatusLevel::Error,
                };
                workspace
                    .plate_checks
                    .insert(0, (input.trim().to_owned(), verdict));
                Outcome::Status(level, text)
            }
            (Screen::Admin(workspace), PromptPurpose::LogEntry) => {
                let (category, description) = parse_log_input(input);
                let author = workspace.session.name().to_owned();
                match workspace.logbook.record(category, description, &author, now) {
                    Some(entry) => Outcome::Status(
                        StatusLevel::Success,
                        format!("{} entry recorded", entry.category.label()),
                    ),
                    None => Outcome::Status(
                        StatusLevel::Error,
                        "Logbook entry needs a description".to_owned(),
                    ),
                }
            }
            _ => Outcome::Quiet,
        }
    }

    fn register_package(&mut self, input: &str, now: OffsetDateTime) -> Outcome {
        let input = input.trim();
        let (unit, carrier) = input
            .split_once(char::is_whitespace)
            .unwrap_or((input, ""));
        match self.packages.register(unit, carrier, &self.backend, now) {
            Ok(package) => {
                self.sync_packages();
                Outcome::Status(
                    StatusLevel::Success,
                    format!(
                        "Package #{} from {} registered for {}",
                        package.id, package.carrier, package.unit
                    ),
                )
            }
            Err(err) => err.into(),
        }
    }

    fn collect_package(&mut self, id: u64) -> Outcome {
        match self.packages.mark_collected(id) {
            Ok(()) => {
                self.sync_packages();
                Outcome::Status(StatusLevel::Success, format!("Package #{id} collected"))
            }
            Err(err) => err.into(),
        }
    }

    fn sync_packages(&mut self) {
        self.catalog.packages = self.packages.all().to_vec();
    }

    fn apply(&mut self, outcome: Outcome, instant: Instant, now: OffsetDateTime) {
        match outcome {
            Outcome::Quiet => {}
            Outcome::Status(level, text) => self.set_status(instant, level, text),
            Outcome::Prompt(purpose, prefill) if prefill.is_empty() => self.prompt.open(purpose),
            Outcome::Prompt(purpose, prefill) => self.prompt.open_with(purpose, prefill),
            Outcome::SignIn(session) => self.open_session(session, instant, now),
            Outcome::CollectPackage(id) => {
                let outcome = self.collect_package(id);
                self.apply(outcome, instant, now);
            }
            Outcome::SignOut => {
                tracing::info!("signed out");
                self.screen = Screen::Login;
                self.set_status(instant, StatusLevel::Info, "Signed out");
            }
            Outcome::Quit => self.should_quit = true,
        }
    }

    fn render(&self, frame: &mut Frame<'_>, instant: Instant, now: OffsetDateTime) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(2),
            ])
            .split(size);

        let today = self.catalog.today;
        let hints = match &self.screen {
            Screen::Login => {
                let title = Paragraph::new("condo · residential community")
                    .style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                    .block(Block::default().borders(Borders::BOTTOM));
                frame.render_widget(title, layout[0]);
                LoginForm.render(frame, layout[1], &self.login);
                LOGIN_HINTS
            }
            Screen::Resident(workspace) => {
                let titles: Vec<String> = ResidentTab::ALL
                    .iter()
                    .map(|tab| match tab {
                        ResidentTab::Packages => format!(
                            "Packages ({})",
                            self.packages.waiting_for(&workspace.unit).len()
                        ),
                        ResidentTab::Notices => {
                            format!("Notices ({})", workspace.notices.unread_count())
                        }
                        other => other.title().to_owned(),
                    })
                    .collect();
                let header = format!(
                    "condo · {} · unit {}",
                    workspace.session.name(),
                    workspace.unit
                );
                render_tabs(frame, layout[0], header, titles, tab_index(&ResidentTab::ALL, workspace.tab));
                self.render_resident(frame, layout[1], workspace, instant, now);
                workspace.tab.hints()
            }
            Screen::Admin(workspace) => {
                let titles = AdminTab::ALL.iter().map(|tab| tab.title().to_owned()).collect();
                let header = format!("condo · {} · administrator", workspace.session.name());
                render_tabs(frame, layout[0], header, titles, tab_index(&AdminTab::ALL, workspace.tab));
                match workspace.tab {
                    AdminTab::Collections => CollectionsView.render(
                        frame,
                        layout[1],
                        &CollectionReport::build(&self.catalog.debts, today),
                    ),
                    AdminTab::Roster => RosterView.render(
                        frame,
                        layout[1],
                        &workspace.roster_query,
                        &workspace.roster.search(&workspace.roster_query),
                    ),
                    AdminTab::Logbook => LogbookView.render(
                        frame,
                        layout[1],
                        &workspace.logbook.entries(workspace.log_filter),
                        workspace.log_filter,
                    ),
                    AdminTab::Metrics => MetricsView.render(
                        frame,
                        layout[1],
                        &CommunityMetrics::compute(&self.catalog, today),
                    ),
                    AdminTab::Plates => PlatesView.render(frame, layout[1], &workspace.plate_checks),
                    AdminTab::Packages => PackagesView.render(
                        frame,
                        layout[1],
                        "Front desk",
                        &self.packages.waiting(),
                        workspace.package_cursor,
                    ),
                }
                workspace.tab.hints()
            }
        };

        frame.render_widget(hint_line(hints), layout[2]);
        self.render_status(frame, layout[3]);
        InputPrompt.render(frame, size, &self.prompt);
    }

    fn render_resident(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        workspace: &ResidentWorkspace,
        instant: Instant,
        now: OffsetDateTime,
    ) {
        let today = self.catalog.today;
        match workspace.tab {
            ResidentTab::Access => AccessView.render(
                frame,
                area,
                &workspace.pass,
                &workspace.invitations.active(now),
                workspace.invitation_cursor,
                now,
            ),
            ResidentTab::Panic => PanicPanel.render(
                frame,
                area,
                &workspace.panic,
                workspace.last_alert.as_ref(),
                instant,
            ),
            ResidentTab::Reservations => {
                SlotPicker.render(frame, area, &workspace.board, &workspace.picker)
            }
            ResidentTab::Payments => PaymentsView.render(
                frame,
                area,
                &workspace.ledger,
                workspace.debt_cursor,
                today,
            ),
            ResidentTab::Visits => VisitsView.render(
                frame,
                area,
                &visits::history_for(&self.catalog.visits, &workspace.unit, today),
            ),
            ResidentTab::Packages => PackagesView.render(
                frame,
                area,
                "Waiting at the desk",
                &self.packages.waiting_for(&workspace.unit),
                workspace.package_cursor,
            ),
            ResidentTab::Notices => NoticesView.render(
                frame,
                area,
                &workspace.notices,
                workspace.notice_filter,
                workspace.notice_cursor,
            ),
        }
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let message = self.status.as_ref().map(|status| {
            let style = match status.level {
                StatusLevel::Info => Style::default().fg(Color::Gray),
                StatusLevel::Success => Style::default().fg(Color::Green),
                StatusLevel::Error => Style::default().fg(Color::Red),
            };
            Line::styled(status.text.clone(), style)
        });

        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let line = message.unwrap_or_else(|| {
            Line::styled(
                "Ready · tab switches sections",
                Style::default().fg(Color::DarkGray),
            )
        });
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn set_status<S: Into<String>>(&mut self, instant: Instant, level: StatusLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into(), instant));
    }
}

fn render_tabs(frame: &mut Frame<'_>, area: Rect, header: String, titles: Vec<String>, selected: usize) {
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(header))
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn hint_line(hints: &[(&'static str, &'static str)]) -> Paragraph<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (index, (key, action)) in hints.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" · "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(" {action}")));
    }
    Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray))
}

fn access_key(workspace: &mut ResidentWorkspace, code: KeyCode, now: OffsetDateTime) -> Outcome {
    let active = workspace.invitations.active(now);
    list_key(&mut workspace.invitation_cursor, active.len(), code);
    match code {
        KeyCode::Char('/') | KeyCode::Char('i') => {
            Outcome::Prompt(PromptPurpose::InviteVisitor, String::new())
        }
        KeyCode::Char('d') => {
            let Some(code) = active
                .get(workspace.invitation_cursor)
                .map(|invitation| invitation.code.clone())
            else {
                return Outcome::Quiet;
            };
            workspace.invitations.revoke(&code);
            Outcome::Status(StatusLevel::Info, format!("Invitation {code} revoked"))
        }
        _ => Outcome::Quiet,
    }
}

fn panic_key(workspace: &mut ResidentWorkspace, code: KeyCode, instant: Instant) -> Outcome {
    match code {
        KeyCode::Char('p') => {
            workspace.panic.press(instant);
            Outcome::Quiet
        }
        KeyCode::Char('a') if workspace.panic.is_triggered() => {
            workspace.panic.reset();
            Outcome::Status(StatusLevel::Info, "Alert acknowledged".to_owned())
        }
        _ => Outcome::Quiet,
    }
}

fn reservations_key(
    workspace: &mut ResidentWorkspace,
    code: KeyCode,
    backend: &MockBackend,
    receipts: &ReceiptRenderer,
) -> Outcome {
    let board = &mut workspace.board;
    match code {
        KeyCode::Left | KeyCode::Char('h') => {
            workspace.picker.move_left();
            Outcome::Quiet
        }
        KeyCode::Right | KeyCode::Char('l') => {
            workspace.picker.move_right(board.schedule().len());
            Outcome::Quiet
        }
        KeyCode::Char(' ') => {
            let cursor = workspace.picker.cursor();
            if !board.availability().contains(&cursor) {
                let label = board.schedule().labels().get(cursor).cloned().unwrap_or_default();
                Outcome::Status(StatusLevel::Info, format!("{label} is not available"))
            } else {
                match board.tap(cursor) {
                    Ok(_) => Outcome::Quiet,
                    Err(err) => err.into(),
                }
            }
        }
        KeyCode::Char('[') => {
            board.previous_facility();
            workspace.picker.clamp(board.schedule().len());
            facility_status(board)
        }
        KeyCode::Char(']') => {
            board.next_facility();
            workspace.picker.clamp(board.schedule().len());
            facility_status(board)
        }
        KeyCode::Char('<') | KeyCode::Char(',') => {
            board.previous_day();
            workspace.picker.clamp(board.schedule().len());
            Outcome::Quiet
        }
        KeyCode::Char('>') | KeyCode::Char('.') => {
            board.next_day();
            workspace.picker.clamp(board.schedule().len());
            Outcome::Quiet
        }
        KeyCode::Enter => match board.confirm(backend) {
            Ok(reservation) => {
                let facility = board
                    .facilities()
                    .iter()
                    .find(|facility| facility.id == reservation.facility_id);
                let fallback = format!("Reservation #{} confirmed", reservation.id);
                let text = match facility {
                    Some(facility) => receipt_line(
                        receipts.booking(&reservation, facility, &board.schedule()),
                        fallback,
                    ),
                    None => fallback,
                };
                Outcome::Status(StatusLevel::Success, text)
            }
            Err(err) => err.into(),
        },
        _ => Outcome::Quiet,
    }
}

fn facility_status(board: &ReservationBoard) -> Outcome {
    match board.facility() {
        Some(facility) => Outcome::Status(StatusLevel::Info, format!("Showing {}", facility.name)),
        None => Outcome::Quiet,
    }
}

fn payments_key(
    workspace: &mut ResidentWorkspace,
    code: KeyCode,
    backend: &MockBackend,
    receipts: &ReceiptRenderer,
    today: time::Date,
) -> Outcome {
    let outstanding = workspace.ledger.outstanding().len();
    list_key(&mut workspace.debt_cursor, outstanding, code);
    if code != KeyCode::Enter {
        return Outcome::Quiet;
    }

    let Some(debt_id) = workspace
        .ledger
        .outstanding()
        .get(workspace.debt_cursor)
        .map(|debt| debt.id)
    else {
        return Outcome::Status(StatusLevel::Info, "Nothing to pay".to_owned());
    };

    match workspace.ledger.pay(debt_id, backend, today) {
        Ok(payment) => {
            let remaining = workspace.ledger.outstanding().len();
            workspace.debt_cursor = workspace.debt_cursor.min(remaining.saturating_sub(1));
            let fallback = format!("Payment {} received", payment.reference);
            let text = match workspace.ledger.debt(debt_id) {
                Some(debt) => receipt_line(receipts.payment(&payment, debt), fallback),
                None => fallback,
            };
            Outcome::Status(StatusLevel::Success, text)
        }
        Err(err) => err.into(),
    }
}

fn notices_key(workspace: &mut ResidentWorkspace, code: KeyCode) -> Outcome {
    let listed: Vec<u64> = workspace
        .notices
        .list(workspace.notice_filter)
        .iter()
        .map(|notice| notice.id)
        .collect();
    list_key(&mut workspace.notice_cursor, listed.len(), code);
    match code {
        KeyCode::Enter => {
            if let Some(id) = listed.get(workspace.notice_cursor) {
                workspace.notices.mark_read(*id);
            }
            Outcome::Quiet
        }
        KeyCode::Char('f') => {
            workspace.notice_filter = notices::next_filter(workspace.notice_filter);
            workspace.notice_cursor = 0;
            let label = workspace
                .notice_filter
                .map_or("all", |category: NoticeCategory| category.label());
            Outcome::Status(StatusLevel::Info, format!("Showing {label} notices"))
        }
        _ => Outcome::Quiet,
    }
}

/// Up/down movement over a list of `len` rows.
fn list_key(cursor: &mut usize, len: usize, code: KeyCode) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => *cursor = cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => *cursor += 1,
        _ => {}
    }
    *cursor = (*cursor).min(len.saturating_sub(1));
}

/// Split an optional `category:` prefix off a logbook line. Lines without one are rounds.
fn parse_log_input(input: &str) -> (LogCategory, &str) {
    let input = input.trim();
    if let Some((prefix, rest)) = input.split_once(':') {
        let prefix = prefix.trim();
        if let Some(category) = LogCategory::all()
            .iter()
            .find(|category| category.label().eq_ignore_ascii_case(prefix))
        {
            return (*category, rest.trim());
        }
    }
    (LogCategory::Round, input)
}

fn next_log_filter(current: Option<LogCategory>) -> Option<LogCategory> {
    let all = LogCategory::all();
    match current {
        None => all.first().copied(),
        Some(category) => all
            .iter()
            .position(|candidate| *candidate == category)
            .and_then(|position| all.get(position + 1))
            .copied(),
    }
}

/// Status text for a committed operation. A receipt that fails to render falls back to
/// `fallback`; the operation itself already went through.
fn receipt_line(rendered: Result<String>, fallback: String) -> String {
    match rendered {
        Ok(receipt) => one_line(&receipt),
        Err(err) => {
            tracing::warn!(error = %err, "receipt rendering failed");
            fallback
        }
    }
}

/// Receipts are multi-line; the status bar has one.
fn one_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let index = tab_index(all, current);
    let next = if forward {
        (index + 1) % all.len()
    } else {
        (index + all.len() - 1) % all.len()
    };
    all[next]
}

fn tab_index<T: PartialEq>(all: &[T], current: T) -> usize {
    all.iter().position(|tab| *tab == current).unwrap_or(0)
}

enum Screen {
    Login,
    Resident(Box<ResidentWorkspace>),
    Admin(Box<AdminWorkspace>),
}

/// What a key press asks the app to do once the workspace borrow is released.
enum Outcome {
    Quiet,
    Status(StatusLevel, String),
    Prompt(PromptPurpose, String),
    SignIn(Session),
    CollectPackage(u64),
    SignOut,
    Quit,
}

impl From<DomainError> for Outcome {
    fn from(err: DomainError) -> Self {
        Outcome::Status(StatusLevel::Error, err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResidentTab {
    Access,
    Panic,
    Reservations,
    Payments,
    Visits,
    Packages,
    Notices,
}

impl ResidentTab {
    const ALL: [ResidentTab; 7] = [
        ResidentTab::Access,
        ResidentTab::Panic,
        ResidentTab::Reservations,
        ResidentTab::Payments,
        ResidentTab::Visits,
        ResidentTab::Packages,
        ResidentTab::Notices,
    ];

    fn title(&self) -> &'static str {
        match self {
            ResidentTab::Access => "Access",
            ResidentTab::Panic => "Panic",
            ResidentTab::Reservations => "Reservations",
            ResidentTab::Payments => "Payments",
            ResidentTab::Visits => "Visits",
            ResidentTab::Packages => "Packages",
            ResidentTab::Notices => "Notices",
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ResidentTab::Access => &[("/", "invite"), ("↑↓", "select"), ("d", "revoke"), ("esc", "sign out")],
            ResidentTab::Panic => &[("hold p", "alert security"), ("a", "acknowledge")],
            ResidentTab::Reservations => &[
                ("←→", "move"),
                ("space", "pick slot"),
                ("[ ]", "facility"),
                ("< >", "day"),
                ("↵", "confirm"),
            ],
            ResidentTab::Payments => &[("↑↓", "select"), ("↵", "pay")],
            ResidentTab::Visits => &[("tab", "next section"), ("q", "quit")],
            ResidentTab::Packages => &[("↑↓", "select"), ("↵", "mark collected")],
            ResidentTab::Notices => &[("↑↓", "select"), ("↵", "mark read"), ("f", "filter")],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminTab {
    Collections,
    Roster,
    Logbook,
    Metrics,
    Plates,
    Packages,
}

impl AdminTab {
    const ALL: [AdminTab; 6] = [
        AdminTab::Collections,
        AdminTab::Roster,
        AdminTab::Logbook,
        AdminTab::Metrics,
        AdminTab::Plates,
        AdminTab::Packages,
    ];

    fn title(&self) -> &'static str {
        match self {
            AdminTab::Collections => "Collections",
            AdminTab::Roster => "Roster",
            AdminTab::Logbook => "Logbook",
            AdminTab::Metrics => "Metrics",
            AdminTab::Plates => "Plates",
            AdminTab::Packages => "Packages",
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            AdminTab::Collections | AdminTab::Metrics => &[("tab", "next section"), ("esc", "sign out")],
            AdminTab::Roster => &[("/", "search"), ("c", "clear")],
            AdminTab::Logbook => &[("/", "new entry"), ("f", "filter")],
            AdminTab::Plates => &[("/", "verify plate")],
            AdminTab::Packages => &[("/", "register"), ("↑↓", "select"), ("↵", "handed over")],
        }
    }
}

const LOGIN_HINTS: &[(&str, &str)] = &[
    ("tab", "next field"),
    ("←→", "role"),
    ("↵", "sign in"),
    ("esc", "quit"),
];

struct ResidentWorkspace {
    session: Session,
    unit: String,
    tab: ResidentTab,
    pass: AccessPass,
    invitations: InvitationBook,
    invitation_cursor: usize,
    panic: PanicButton,
    last_alert: Option<PanicAlert>,
    board: ReservationBoard,
    picker: SlotPickerState,
    ledger: PaymentsLedger,
    debt_cursor: usize,
    package_cursor: usize,
    notices: NoticeBoard,
    notice_filter: Option<NoticeCategory>,
    notice_cursor: usize,
}

impl ResidentWorkspace {
    fn new(session: Session, catalog: &MockCatalog, config: &Config, now: OffsetDateTime) -> Self {
        let unit = session
            .unit()
            .unwrap_or(config.defaults.unit.as_str())
            .to_owned();
        Self {
            tab: ResidentTab::Access,
            pass: AccessPass::for_resident(&unit, now, config.access.refresh()),
            invitations: InvitationBook::new(unit.clone()),
            invitation_cursor: 0,
            panic: PanicButton::new(config.panic.hold(), config.panic.release_grace()),
            last_alert: None,
            board: ReservationBoard::new(
                catalog,
                unit.clone(),
                config.reservations.schedule(),
                config.reservations.booking_window_days(),
            ),
            picker: SlotPickerState::default(),
            ledger: PaymentsLedger::for_unit(&unit, &catalog.debts, &catalog.payments),
            debt_cursor: 0,
            package_cursor: 0,
            notices: NoticeBoard::new(catalog.notices.clone()),
            notice_filter: None,
            notice_cursor: 0,
            unit,
            session,
        }
    }
}

struct AdminWorkspace {
    session: Session,
    tab: AdminTab,
    roster: Roster,
    roster_query: String,
    logbook: Logbook,
    log_filter: Option<LogCategory>,
    plates: PlateRegistry,
    /// Newest first.
    plate_checks: Vec<(String, PlateVerdict)>,
    package_cursor: usize,
}

impl AdminWorkspace {
    fn new(session: Session, catalog: &MockCatalog) -> Self {
        Self {
            session,
            tab: AdminTab::Collections,
            roster: Roster::new(catalog.residents.clone(), catalog.staff.clone()),
            roster_query: String::new(),
            logbook: Logbook::new(catalog.logbook.clone()),
            log_filter: None,
            plates: PlateRegistry::new(catalog.vehicles.clone()),
            plate_checks: Vec::new(),
            package_cursor: 0,
        }
    }
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String, now: Instant) -> Self {
        Self {
            level,
            text,
            expires_at: now + STATUS_TTL,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusLevel {
    Info,
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::backend::TestBackend;
    use time::macros::datetime;

    use crate::domain::model::Role;
    use crate::ui::components::rendered_text;

    const NOW: OffsetDateTime = datetime!(2026-03-10 12:00 UTC);

    fn app() -> UiApp {
        UiApp::new(Config::default(), MockBackend::instant(), NOW).unwrap()
    }

    fn press(app: &mut UiApp, code: KeyCode, at: Instant) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), at, NOW);
    }

    fn type_text(app: &mut UiApp, text: &str, at: Instant) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch), at);
        }
    }

    fn status_text(app: &UiApp) -> &str {
        app.status.as_ref().map_or("", |status| status.text.as_str())
    }

    fn draw(app: &UiApp, at: Instant) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal
            .draw(|frame| app.render(frame, at, NOW))
            .unwrap();
        rendered_text(terminal.backend())
    }

    fn resident_tab(app: &UiApp) -> Option<ResidentTab> {
        match &app.screen {
            Screen::Resident(workspace) => Some(workspace.tab),
            _ => None,
        }
    }

    #[test]
    fn login_defaults_to_configured_resident() {
        let mut app = app();
        let at = Instant::now();
        assert!(draw(&app, at).contains("Sign in"));

        press(&mut app, KeyCode::Enter, at);
        assert_eq!(resident_tab(&app), Some(ResidentTab::Access));
        assert_eq!(status_text(&app), "Welcome, Resident");
        assert!(draw(&app, at).contains("unit A-101"));
    }

    #[test]
    fn booking_flow_confirms_and_shows_receipt() {
        let mut app = app();
        let at = Instant::now();
        press(&mut app, KeyCode::Enter, at);
        press(&mut app, KeyCode::Tab, at);
        press(&mut app, KeyCode::Tab, at);
        assert_eq!(resident_tab(&app), Some(ResidentTab::Reservations));

        // pool, today: 09:00 and 10:00 are taken
        press(&mut app, KeyCode::Char(' '), at);
        assert_eq!(status_text(&app), "09:00 is not available");

        press(&mut app, KeyCode::Right, at);
        press(&mut app, KeyCode::Right, at);
        press(&mut app, KeyCode::Char(' '), at);
        press(&mut app, KeyCode::Right, at);
        press(&mut app, KeyCode::Char(' '), at);
        assert!(draw(&app, at).contains("Selected: 11:00 - 13:00"));

        press(&mut app, KeyCode::Enter, at);
        assert_eq!(app.backend.bookings().len(), 1);
        assert!(status_text(&app).starts_with("Reservation #10001 confirmed · Swimming Pool"));
        assert!(status_text(&app).contains("11:00 - 13:00"));

        press(&mut app, KeyCode::Enter, at);
        assert_eq!(status_text(&app), "no time slot selected");
    }

    #[test]
    fn changing_facility_drops_selection() {
        let mut app = app();
        let at = Instant::now();
        press(&mut app, KeyCode::Enter, at);
        press(&mut app, KeyCode::BackTab, at);
        press(&mut app, KeyCode::BackTab, at);
        press(&mut app, KeyCode::BackTab, at);
        press(&mut app, KeyCode::BackTab, at);
        press(&mut app, KeyCode::BackTab, at);
        assert_eq!(resident_tab(&app), Some(ResidentTab::Reservations));

        for _ in 0..4 {
            press(&mut app, KeyCode::Right, at);
        }
        press(&mut app, KeyCode::Char(' '), at);
        press(&mut app, KeyCode::Char(']'), at);
        assert_eq!(status_text(&app), "Showing Gym");
        assert!(draw(&app, at).contains("No time selected"));
    }

    #[test]
    fn holding_p_raises_one_alert() {
        let mut app = app();
        let start = Instant::now();
        press(&mut app, KeyCode::Enter, start);
        press(&mut app, KeyCode::Tab, start);
        assert_eq!(resident_tab(&app), Some(ResidentTab::Panic));

        for step in 0..40 {
            let at = start + Duration::from_millis(step * 100);
            press(&mut app, KeyCode::Char('p'), at);
            app.tick(at, NOW);
        }
        let alerts = app.backend.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].unit, "A-101");
        assert!(status_text(&app).starts_with("Panic alert sent"));

        let later = start + Duration::from_secs(5);
        press(&mut app, KeyCode::Char('a'), later);
        assert_eq!(status_text(&app), "Alert acknowledged");
        assert!(draw(&app, later).contains("Alert from unit A-101"));
    }

    #[test]
    fn short_tap_on_p_does_nothing() {
        let mut app = app();
        let start = Instant::now();
        press(&mut app, KeyCode::Enter, start);
        press(&mut app, KeyCode::Tab, start);
        press(&mut app, KeyCode::Char('p'), start);
        app.tick(start + Duration::from_secs(1), NOW);
        app.tick(start + Duration::from_secs(4), NOW);
        assert!(app.backend.alerts().is_empty());
    }

    #[test]
    fn blank_invitation_is_rejected() {
        let mut app = app();
        let at = Instant::now();
        press(&mut app, KeyCode::Enter, at);
        press(&mut app, KeyCode::Char('/'), at);
        assert!(app.prompt.is_open());
        press(&mut app, KeyCode::Enter, at);
        assert_eq!(status_text(&app), "visitor name must not be blank");

        press(&mut app, KeyCode::Char('/'), at);
        type_text(&mut app, "Laura", at);
        press(&mut app, KeyCode::Enter, at);
        assert_eq!(status_text(&app), "Invitation A-101-0001 for Laura");
    }

    #[test]
    fn paying_first_debt_shows_receipt() {
        let mut app = app();
        let at = Instant::now();
        press(&mut app, KeyCode::Enter, at);
        for _ in 0..3 {
            press(&mut app, KeyCode::Tab, at);
        }
        press(&mut app, KeyCode::Enter, at);
        assert_eq!(app.backend.payments().len(), 1);
        assert!(status_text(&app).starts_with("Payment TRX-"));
        assert!(status_text(&app).contains("$1,850.00"));
    }

    #[test]
    fn admin_verifies_plates() {
        let mut app = app();
        let at = Instant::now();
        press(&mut app, KeyCode::Char('a'), at);
        assert_eq!(app.login.role(), Role::Admin);
        press(&mut app, KeyCode::Enter, at);
        assert!(matches!(app.screen, Screen::Admin(_)));

        for _ in 0..4 {
            press(&mut app, KeyCode::Tab, at);
        }
        press(&mut app, KeyCode::Char('/'), at);
        type_text(&mut app, "abc-123", at);
        press(&mut app, KeyCode::Enter, at);
        assert!(status_text(&app).contains("resident vehicle, unit A-101"));
        assert!(draw(&app, at).contains("ABC123: resident vehicle"));
    }

    #[test]
    fn registered_package_reaches_resident() {
        let mut app = app();
        let at = Instant::now();
        app.start_session(Session::sign_in(Role::Admin, "Desk", None, "A-101"), NOW);
        press(&mut app, KeyCode::BackTab, at);
        press(&mut app, KeyCode::Char('/'), at);
        type_text(&mut app, "B-202 DHL", at);
        press(&mut app, KeyCode::Enter, at);
        assert!(status_text(&app).ends_with("registered for B-202"));
        assert_eq!(app.backend.packages().len(), 1);
        assert_eq!(app.catalog.packages.len(), app.packages.all().len());

        press(&mut app, KeyCode::Esc, at);
        assert!(matches!(app.screen, Screen::Login));
        app.start_session(Session::sign_in(Role::Resident, "", Some("B-202"), "A-101"), NOW);
        assert_eq!(app.packages.waiting_for("B-202").len(), 1);
    }

    #[test]
    fn logbook_prompt_parses_category() {
        assert_eq!(
            parse_log_input("incident: gate jammed"),
            (LogCategory::Incident, "gate jammed")
        );
        assert_eq!(
            parse_log_input("ENTRY:plumber"),
            (LogCategory::Entry, "plumber")
        );
        assert_eq!(
            parse_log_input("note: all quiet"),
            (LogCategory::Round, "note: all quiet")
        );
    }

    #[test]
    fn failed_receipt_falls_back_to_plain_confirmation() {
        let text = receipt_line(
            Err(anyhow::anyhow!("template missing")),
            "Reservation #10001 confirmed".to_owned(),
        );
        assert_eq!(text, "Reservation #10001 confirmed");

        let text = receipt_line(
            Ok("Payment TRX-1 received\n\nUnit A-101\n".to_owned()),
            String::new(),
        );
        assert_eq!(text, "Payment TRX-1 received · Unit A-101");
    }

    #[test]
    fn log_filter_cycles_back_to_all() {
        let mut filter = None;
        for _ in 0..LogCategory::all().len() {
            filter = next_log_filter(filter);
            assert!(filter.is_some());
        }
        assert_eq!(next_log_filter(filter), None);
    }

    #[test]
    fn list_cursor_is_clamped() {
        let mut cursor = 0;
        list_key(&mut cursor, 3, KeyCode::Up);
        assert_eq!(cursor, 0);
        for _ in 0..5 {
            list_key(&mut cursor, 3, KeyCode::Down);
        }
        assert_eq!(cursor, 2);
        list_key(&mut cursor, 0, KeyCode::Down);
        assert_eq!(cursor, 0);
    }

    #[test]
    fn status_messages_expire() {
        let mut app = app();
        let at = Instant::now();
        press(&mut app, KeyCode::Enter, at);
        assert!(app.status.is_some());
        app.tick(at + STATUS_TTL, NOW);
        assert!(app.status.is_none());
    }

    #[test]
    fn every_tab_renders() {
        let mut app = app();
        let at = Instant::now();
        press(&mut app, KeyCode::Enter, at);
        for tab in ResidentTab::ALL {
            assert!(draw(&app, at).contains(tab.title()));
            press(&mut app, KeyCode::Tab, at);
        }

        app.start_session(Session::sign_in(Role::Admin, "", None, "A-101"), NOW);
        for tab in AdminTab::ALL {
            assert!(draw(&app, at).contains(tab.title()));
            press(&mut app, KeyCode::Tab, at);
        }
    }
}
