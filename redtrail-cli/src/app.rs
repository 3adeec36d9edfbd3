//! The interactive session: one loop over the game phases.
//!
//! All reads go through the injected `BufRead` and all writes through the
//! injected `Write`, so full sessions can be scripted in tests. Decisions
//! are gathered here and handed to the core; resolution itself never
//! touches stdin.

use anyhow::Result;
use colored::Colorize;
use log::debug;
use redtrail_game::{
    DataLoader, Decision, Ending, GameEngine, GamePhase, GameState, GameStorage, Role,
    TrailSummary, TurnStart,
};
use std::io::{BufRead, Write};

use crate::menu::{self, MenuChoice};

/// Drives one terminal session over the core state machine.
pub struct App<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    engine: GameEngine<L, S>,
    state: GameState,
    slot: String,
    preset_name: Option<String>,
    preset_role: Option<Role>,
}

impl<L, S> App<L, S>
where
    L: DataLoader,
    S: GameStorage,
{
    pub fn new(
        engine: GameEngine<L, S>,
        state: GameState,
        slot: impl Into<String>,
        preset_name: Option<String>,
        preset_role: Option<Role>,
    ) -> Self {
        Self {
            engine,
            state,
            slot: slot.into(),
            preset_name,
            preset_role,
        }
    }

    /// Run until the player quits or the input stream closes.
    ///
    /// # Errors
    ///
    /// Returns an error when terminal I/O or a save operation fails.
    pub fn run(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
        loop {
            let keep_going = match self.state.phase {
                GamePhase::NotStarted => {
                    self.state.start_character_creation();
                    true
                }
                GamePhase::CharacterCreation => self.create_character(input, out)?,
                GamePhase::Playing => self.playing_menu(input, out)?,
                GamePhase::GameOver | GamePhase::Ended => self.finished(input, out)?,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    fn create_character(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
        let name = match self.preset_name.take() {
            Some(name) if !name.trim().is_empty() => name,
            _ => loop {
                let Some(line) = prompt(input, out, "Name your traveler: ")? else {
                    return Ok(false);
                };
                if !line.is_empty() {
                    break line;
                }
                writeln!(out, "A name is needed for the grave marker, at least.")?;
            },
        };

        let role = if let Some(role) = self.preset_role.take() {
            role
        } else {
            writeln!(out, "\nPick a calling:")?;
            for (index, role) in Role::ALL.iter().enumerate() {
                writeln!(
                    out,
                    "  {}) {:<12} - {}",
                    index + 1,
                    role.as_str(),
                    role.blurb()
                )?;
            }
            loop {
                let Some(line) = prompt(input, out, "> ")? else {
                    return Ok(false);
                };
                if let Some(role) = menu::parse_role_choice(&line) {
                    break role;
                }
                writeln!(out, "Pick a number from the roster or type the role name.")?;
            }
        };

        self.state.create_character(name, role);
        if let Some(character) = &self.state.character {
            writeln!(out, "\n{}", format!("{character} hits the trail.").green())?;
        }
        Ok(true)
    }

    fn playing_menu(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
        writeln!(out)?;
        if let Some(character) = &self.state.character {
            writeln!(
                out,
                "{}",
                format!(
                    "Events faced: {} | {}",
                    self.state.event_count, character.resources
                )
                .cyan()
            )?;
        }
        for (index, choice) in MenuChoice::ALL.iter().enumerate() {
            writeln!(out, "  {}) {}", index + 1, choice.label())?;
        }

        let Some(line) = prompt(input, out, "> ")? else {
            return Ok(false);
        };
        let Some(choice) = menu::parse_menu_choice(&line) else {
            writeln!(out, "Pick a number between 1 and 6.")?;
            return Ok(true);
        };

        match choice {
            MenuChoice::ShowCharacter => self.show_character(out)?,
            MenuChoice::ShowResources => {
                if let Some(character) = &self.state.character {
                    writeln!(out, "{}", character.resources)?;
                }
            }
            MenuChoice::PressOn => return self.press_on(input, out),
            MenuChoice::Save => {
                self.engine.save_game(&self.slot, &self.state)?;
                writeln!(out, "{}", format!("Saved to slot '{}'.", self.slot).green())?;
            }
            MenuChoice::Restart => {
                self.state.restart(rand::random());
                writeln!(out, "Back to the trailhead.")?;
            }
            MenuChoice::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn show_character(&self, out: &mut impl Write) -> Result<()> {
        let Some(character) = &self.state.character else {
            return Ok(());
        };
        writeln!(out, "{}", character.to_string().bold())?;
        writeln!(out, "  {}", character.role.blurb())?;
        match character.abilities.tier() {
            Some(tier) => writeln!(out, "  Ability tier: {tier}")?,
            None => writeln!(out, "  Ability tier: none yet")?,
        }
        writeln!(out, "  {}", character.resources)?;
        Ok(())
    }

    fn press_on(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
        match self.state.begin_turn() {
            // A depleted run collapses inside begin_turn; the result
            // screen comes up on the next pass through the loop.
            TurnStart::Idle { .. } => Ok(true),
            TurnStart::Drawn {
                name,
                desc,
                decisions,
                ..
            } => {
                writeln!(out, "\n{}", name.bold())?;
                writeln!(out, "{desc}")?;

                let decision = if decisions.is_empty() {
                    None
                } else {
                    match self.prompt_decision(input, out, decisions)? {
                        Some(decision) => Some(decision),
                        None => return Ok(false),
                    }
                };

                if let Some(report) = self.state.resolve_pending(decision) {
                    for line in &report.lines {
                        writeln!(out, "{line}")?;
                    }
                    if let Some(character) = &self.state.character {
                        writeln!(out, "{}", character.resources.to_string().cyan())?;
                    }
                    debug!("turn resolved: {}", report.outcome.key());
                }
                Ok(true)
            }
        }
    }

    fn prompt_decision(
        &mut self,
        input: &mut impl BufRead,
        out: &mut impl Write,
        offered: &[Decision],
    ) -> Result<Option<Decision>> {
        let choices = offered
            .iter()
            .enumerate()
            .map(|(index, decision)| format!("{}) {}", index + 1, decision.label()))
            .collect::<Vec<_>>()
            .join("  ");
        loop {
            let Some(line) = prompt(input, out, &format!("{choices} > "))? else {
                return Ok(None);
            };
            if let Some(decision) = menu::parse_decision(&line, offered) {
                return Ok(Some(decision));
            }
            writeln!(out, "That is not one of the choices.")?;
        }
    }

    fn finished(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
        if let Some(summary) = TrailSummary::from_state(&self.state) {
            let headline = match summary.ending {
                Ending::Victory => summary.headline.bright_green().bold(),
                Ending::Collapse { .. } => summary.headline.bright_red().bold(),
            };
            writeln!(out, "\n{headline}")?;
            writeln!(
                out,
                "{} the {} | events faced: {}",
                summary.name, summary.role, summary.events_resolved
            )?;
            writeln!(out, "{}", summary.resources)?;
            writeln!(out, "Score: {}", summary.score)?;
        }

        loop {
            let Some(line) = prompt(input, out, "1) Ride again  2) Quit > ")? else {
                return Ok(false);
            };
            match menu::parse_end_choice(&line) {
                Some(true) => {
                    self.engine.delete_save(&self.slot)?;
                    self.state.restart(rand::random());
                    return Ok(true);
                }
                Some(false) => return Ok(false),
                None => writeln!(out, "1 to ride again, 2 to quit.")?,
            }
        }
    }
}

/// One prompt round-trip. `None` means the input stream closed.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, text: &str) -> Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
