//! Reusable TUI components.

pub mod admin;
pub mod input_prompt;
pub mod login;
pub mod panic_button;
pub mod resident;
pub mod slot_picker;

/// Text of a test terminal, one line per row.
#[cfg(test)]
pub(crate) fn rendered_text(backend: &ratatui::backend::TestBackend) -> String {
    let buffer = backend.buffer();
    buffer
        .content()
        .chunks(buffer.area.width.max(1) as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
