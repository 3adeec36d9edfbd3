//! Menu and prompt parsing.
//!
//! Parsers are pure so rejected-input paths can be tested without a live
//! stdin; the app loop re-prompts whenever a parser returns `None`.

use redtrail_game::{Decision, Role};

/// Entries on the Playing-phase menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ShowCharacter,
    ShowResources,
    PressOn,
    Save,
    Restart,
    Quit,
}

impl MenuChoice {
    pub const ALL: [Self; 6] = [
        Self::ShowCharacter,
        Self::ShowResources,
        Self::PressOn,
        Self::Save,
        Self::Restart,
        Self::Quit,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ShowCharacter => "Show character",
            Self::ShowResources => "Show resources",
            Self::PressOn => "Press on down the trail",
            Self::Save => "Save the game",
            Self::Restart => "Restart",
            Self::Quit => "Quit",
        }
    }
}

/// Parse a Playing-phase menu pick. Numbers only, matching the printout.
#[must_use]
pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    let index: usize = input.trim().parse().ok()?;
    MenuChoice::ALL.get(index.checked_sub(1)?).copied()
}

/// Parse a decision reply against the choices the event offered.
///
/// Accepts the printed number or the word itself; anything outside the
/// offered set is rejected.
#[must_use]
pub fn parse_decision(input: &str, offered: &[Decision]) -> Option<Decision> {
    let trimmed = input.trim();
    if let Ok(index) = trimmed.parse::<usize>() {
        return offered.get(index.checked_sub(1)?).copied();
    }
    let lowered = trimmed.to_lowercase();
    offered.iter().copied().find(|d| d.as_str() == lowered)
}

/// Parse a roster pick: the printed number or the role name.
#[must_use]
pub fn parse_role_choice(input: &str) -> Option<Role> {
    let trimmed = input.trim();
    if let Ok(index) = trimmed.parse::<usize>() {
        return Role::ALL.get(index.checked_sub(1)?).copied();
    }
    trimmed.to_lowercase().parse().ok()
}

/// Value parser for the `--role` flag.
///
/// # Errors
///
/// Returns the full roster in the message when the name is unknown.
pub fn parse_role_arg(s: &str) -> Result<Role, String> {
    s.to_lowercase().parse().map_err(|()| {
        let roster = Role::ALL.map(Role::as_str).join(", ");
        format!("unknown role '{s}' (expected one of: {roster})")
    })
}

/// After a finished run: `Some(true)` to ride again, `Some(false)` to quit.
#[must_use]
pub fn parse_end_choice(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "1" | "r" | "restart" | "again" => Some(true),
        "2" | "q" | "quit" | "exit" => Some(false),
        _ => None,
    }
}
