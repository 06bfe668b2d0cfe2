//! Command-line entry point.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;
use time::OffsetDateTime;

use crate::app::reservations::ReservationBoard;
use crate::app::session::Session;
use crate::domain::model::{Facility, Role, Slot};
use crate::infra::backend::MockBackend;
use crate::infra::config::Config;
use crate::infra::logging::{self, LogTarget};
use crate::infra::mock::MockCatalog;
use crate::ui::app::UiApp;

#[derive(Parser)]
#[command(author, version, about = "Residential community terminal app", long_about = None)]
struct Cli {
    /// Sign in directly with this role instead of showing the sign-in form
    #[arg(long, global = true)]
    role: Option<Role>,
    /// Display name for the session
    #[arg(long, global = true)]
    name: Option<String>,
    /// Unit for resident sessions
    #[arg(long, global = true)]
    unit: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the bookable slots of a facility
    Slots {
        #[arg(long)]
        facility: String,
        /// Days from today, clamped to the booking window
        #[arg(long, default_value_t = 0)]
        day: u8,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(name) = &cli.name {
        config.defaults.name = Some(name.clone());
    }
    if let Some(unit) = &cli.unit {
        config.defaults.unit = unit.clone();
    }
    if let Some(role) = cli.role {
        config.defaults.role = role;
    }

    match cli.command {
        Some(Command::Slots {
            facility,
            day,
            json,
        }) => {
            logging::init(&config.logging, LogTarget::Stderr)?;
            let listing = SlotListing::build(&config, &facility, day, OffsetDateTime::now_utc())?;
            let mut stdout = io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut stdout, &listing)
                    .context("failed to write slot listing")?;
                writeln!(stdout)?;
            } else {
                write!(stdout, "{}", listing.to_text())?;
            }
            Ok(())
        }
        Some(Command::Completions { shell }) => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "condo", &mut io::stdout());
            Ok(())
        }
        None => {
            logging::init(&config.logging, LogTarget::FileOrDiscard)?;
            let now = OffsetDateTime::now_utc();
            let session = cli.role.map(|role| {
                Session::sign_in(
                    role,
                    config.defaults.name.as_deref().unwrap_or_default(),
                    Some(&config.defaults.unit),
                    &config.defaults.unit,
                )
            });
            let backend = MockBackend::new(config.mock.latency());
            let mut app = UiApp::new(config, backend, now)?;
            if let Some(session) = session {
                app.start_session(session, now);
            }
            app.run()
        }
    }
}

#[derive(Debug, Serialize)]
struct SlotListing {
    facility: Facility,
    date: String,
    slots: Vec<Slot>,
}

impl SlotListing {
    fn build(config: &Config, facility_id: &str, day: u8, now: OffsetDateTime) -> Result<Self> {
        let catalog = MockCatalog::seeded(now);
        let mut board = ReservationBoard::new(
            &catalog,
            config.defaults.unit.clone(),
            config.reservations.schedule(),
            config.reservations.booking_window_days(),
        );
        board
            .select_facility_by_id(facility_id)
            .with_context(|| format!("cannot list slots for '{facility_id}'"))?;
        board.select_day(day);

        let facility = board
            .facility()
            .cloned()
            .with_context(|| format!("cannot list slots for '{facility_id}'"))?;
        Ok(Self {
            facility,
            date: board.date().to_string(),
            slots: board.slots(),
        })
    }

    fn to_text(&self) -> String {
        let mut out = format!("{} · {}\n", self.facility.name, self.date);
        for slot in &self.slots {
            let state = if slot.available { "free" } else { "taken" };
            out.push_str(&format!("  {}  {state}\n", slot.label));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-03-10 12:00 UTC);

    #[test]
    fn lists_pool_slots_for_today() {
        let listing = SlotListing::build(&Config::default(), "pool", 0, NOW).unwrap();
        assert_eq!(listing.facility.name, "Swimming Pool");
        assert_eq!(listing.date, "2026-03-10");
        assert_eq!(listing.slots.len(), 12);
        assert!(!listing.slots[0].available);
        assert!(listing.slots[2].available);

        let text = listing.to_text();
        assert!(text.starts_with("Swimming Pool · 2026-03-10\n"));
        assert!(text.contains("  09:00  taken\n"));
        assert!(text.contains("  11:00  free\n"));
    }

    #[test]
    fn day_is_clamped_to_window() {
        let listing = SlotListing::build(&Config::default(), "gym", 200, NOW).unwrap();
        assert_eq!(listing.date, "2026-03-16");
    }

    #[test]
    fn unknown_facility_fails() {
        let err = SlotListing::build(&Config::default(), "spa", 0, NOW).unwrap_err();
        assert!(format!("{err:#}").contains("unknown facility 'spa'"));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
