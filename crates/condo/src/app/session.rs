//! Signed-in user. There is no credential check; picking a role is enough.

use crate::domain::model::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    role: Role,
    name: String,
    unit: Option<String>,
}

impl Session {
    /// Start a session. A blank name falls back to a role default, and residents without a
    /// unit get `default_unit`. Administrators never carry a unit.
    pub fn sign_in(role: Role, name: &str, unit: Option<&str>, default_unit: &str) -> Self {
        let name = match name.trim() {
            "" => default_name(role).to_owned(),
            trimmed => trimmed.to_owned(),
        };
        let unit = match role {
            Role::Admin => None,
            Role::Resident => Some(
                unit.map(str::trim)
                    .filter(|unit| !unit.is_empty())
                    .unwrap_or(default_unit)
                    .to_owned(),
            ),
        };
        tracing::info!(role = %role, name = %name, unit = ?unit, "signed in");
        Self { role, name, unit }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn default_name(role: Role) -> &'static str {
    match role {
        Role::Resident => "Resident",
        Role::Admin => "Administrator",
    }
}
