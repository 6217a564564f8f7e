/*
 *  pages/field.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Field protocol - the smallest focusable unit and its enter handshake
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fmt;

use crate::facility::{Facility, FacilityDatabase};

/// Outcome of offering Enter to a field or page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterResult {
    /// Event ignored by this field
    NotHandled,
    /// Consumed, cursor stays put
    HandledKeepFocus,
    /// Consumed, the cursor must advance to the next field
    HandledMoveFocus,
}

impl EnterResult {
    pub fn is_handled(self) -> bool {
        !matches!(self, EnterResult::NotHandled)
    }
}

/// Page-level actions a field or page can ask for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Copy stored flight plan `n` over the active plan (plan 0)
    ActivateFlightPlan(usize),
    /// Take the waypoint on the direct-to page as the new target
    ConfirmDirectTo,
    /// Leave the database wizard (completed or abandoned)
    FinishWizard,
}

/// Side effects requested from inside `enter()`
///
/// Fields never touch the page stacks themselves; they leave an effect
/// here and the main page applies it once the field borrow has ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Several facilities share the typed ident; open a chooser and
    /// suspend until one is picked
    Disambiguate { candidates: Vec<Facility> },
    /// A chooser row was picked - completes the pending suspension
    Resolve(Facility),
    /// Show a waypoint detail page on the other side
    ShowWaypoint(Facility),
    Command(Command),
}

/// Everything a field may consult or request while handling Enter
pub struct EnterContext<'a> {
    db: &'a dyn FacilityDatabase,
    effects: Vec<Effect>,
}

impl<'a> EnterContext<'a> {
    pub fn new(db: &'a dyn FacilityDatabase) -> Self {
        Self {
            db,
            effects: Vec::new(),
        }
    }

    pub fn db(&self) -> &dyn FacilityDatabase {
        self.db
    }

    pub fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}

/// A focusable, possibly editable unit on a page
///
/// Fields know nothing about their siblings: focus movement belongs to the
/// `CursorController`, and anything that reaches beyond the field goes out
/// as an `Effect`.
pub trait Field: fmt::Debug {
    /// Short caption
    fn label(&self) -> &str;

    /// Current value as display text
    fn text(&self) -> String;

    /// Disabled fields are filtered out of the cursor's focus ring
    fn is_enabled(&self) -> bool {
        true
    }

    fn is_readonly(&self) -> bool {
        false
    }

    fn is_focused(&self) -> bool;

    fn set_focus(&mut self, focused: bool);

    /// True while the field is mid-edit and wants the outer knob for itself
    fn is_entered(&self) -> bool {
        false
    }

    fn outer_left(&mut self) -> bool {
        false
    }

    fn outer_right(&mut self) -> bool {
        false
    }

    /// Inner knob value change, `step` is -1 or +1
    fn move_value(&mut self, step: i32) -> bool;

    fn accepts_enter(&self) -> bool {
        false
    }

    fn enter(&mut self, _ctx: &mut EnterContext<'_>) -> EnterResult {
        EnterResult::NotHandled
    }

    fn accepts_clear(&self) -> bool {
        false
    }

    fn clear(&mut self) -> bool {
        false
    }

    fn keyboard(&mut self, _key: char) -> bool {
        false
    }

    /// Completion of a suspended `enter()`
    fn resolve(&mut self, _facility: Facility) -> EnterResult {
        EnterResult::NotHandled
    }

    /// A suspended `enter()` will never complete; drop back to idle
    fn abandon(&mut self) {}

    /// Facility this field currently designates, if any
    fn facility(&self) -> Option<&Facility> {
        None
    }
}

pub type BoxedField = Box<dyn Field>;
