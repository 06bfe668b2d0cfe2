//! Domain-specific errors.

use thiserror::Error;

use crate::app::ports::GatewayError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("slot {index} is outside the schedule ({count} slots)")]
    SlotOutOfRange { index: usize, count: usize },
    #[error("{0} must not be blank")]
    MissingField(&'static str),
    #[error("no time slot selected")]
    EmptySelection,
    #[error("unknown facility '{0}'")]
    UnknownFacility(String),
    #[error("unknown debt #{0}")]
    UnknownDebt(u64),
    #[error("debt #{0} is already paid")]
    AlreadyPaid(u64),
    #[error("unknown package #{0}")]
    UnknownPackage(u64),
    #[error("package #{0} was already collected")]
    AlreadyCollected(u64),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
