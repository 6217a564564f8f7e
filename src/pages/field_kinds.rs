/*
 *  pages/field_kinds.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Concrete fields - selectors, ident editor, list rows and buttons
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

use arrayvec::ArrayString;
use log::debug;

use crate::facility::{Facility, FacilityKind};
use super::field::{Command, Effect, EnterContext, EnterResult, Field};

/// Maximum ident length on the unit
pub const IDENT_LEN: usize = 5;

/// Inner knob character ring for ident entry, blank first
const IDENT_CHARS: &[char] = &[
    ' ', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q',
    'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8',
    '9',
];

pub type Ident = ArrayString<IDENT_LEN>;

fn ident_from(text: &str) -> Ident {
    let mut ident = Ident::new();
    for c in text.chars() {
        if ident.try_push(c).is_err() {
            break;
        }
    }
    ident
}

/// Selectable value drawn from a fixed list of options (wraps)
#[derive(Debug, Clone)]
pub struct ChoiceField {
    label: &'static str,
    options: Vec<&'static str>,
    index: usize,
    focused: bool,
    readonly: bool,
}

impl ChoiceField {
    pub fn new(label: &'static str, options: &[&'static str], index: usize) -> Self {
        Self {
            label,
            options: options.to_vec(),
            index: index.min(options.len().saturating_sub(1)),
            focused: false,
            readonly: false,
        }
    }

    /// Builder: display-only, still focusable
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn selected(&self) -> &str {
        self.options.get(self.index).copied().unwrap_or("")
    }
}

impl Field for ChoiceField {
    fn label(&self) -> &str {
        self.label
    }

    fn text(&self) -> String {
        self.selected().to_string()
    }

    fn is_readonly(&self) -> bool {
        self.readonly
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn move_value(&mut self, step: i32) -> bool {
        if self.options.is_empty() {
            return false;
        }
        let len = self.options.len() as i64;
        self.index = (self.index as i64 + step as i64).rem_euclid(len) as usize;
        true
    }
}

/// Numeric value clamped to a range; Clear restores the default
#[derive(Debug, Clone)]
pub struct NumberField {
    label: &'static str,
    value: i32,
    default: i32,
    min: i32,
    max: i32,
    step: i32,
    focused: bool,
}

impl NumberField {
    pub fn new(label: &'static str, default: i32, min: i32, max: i32) -> Self {
        Self {
            label,
            value: default.clamp(min, max),
            default: default.clamp(min, max),
            min,
            max,
            step: 1,
            focused: false,
        }
    }

    /// Builder: knob increment
    pub fn step(mut self, step: i32) -> Self {
        self.step = step.max(1);
        self
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Field for NumberField {
    fn label(&self) -> &str {
        self.label
    }

    fn text(&self) -> String {
        self.value.to_string()
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn move_value(&mut self, step: i32) -> bool {
        let next = (self.value + step * self.step).clamp(self.min, self.max);
        let changed = next != self.value;
        self.value = next;
        changed
    }

    fn accepts_clear(&self) -> bool {
        self.value != self.default
    }

    fn clear(&mut self) -> bool {
        self.value = self.default;
        true
    }
}

#[derive(Debug, Clone, Copy)]
struct IdentEdit {
    chars: [char; IDENT_LEN],
    pos: usize,
}

impl IdentEdit {
    fn blank() -> Self {
        Self { chars: [' '; IDENT_LEN], pos: 0 }
    }

    fn from_ident(ident: &str) -> Self {
        let mut edit = Self::blank();
        for (slot, c) in edit.chars.iter_mut().zip(ident.chars()) {
            *slot = c;
        }
        edit
    }

    /// Typed ident, cut at the first blank
    fn ident(&self) -> String {
        self.chars.iter().take_while(|c| **c != ' ').collect()
    }
}

/// Editable waypoint ident
///
/// Inner knob (or a typed character) enters edit mode; the outer knob then
/// walks the character positions. Enter looks the ident up: a single match
/// commits and moves focus on, several matches suspend the field behind a
/// chooser page until `resolve` is called.
#[derive(Debug, Clone)]
pub struct IdentField {
    label: &'static str,
    ident: Ident,
    filter: Option<FacilityKind>,
    facility: Option<Facility>,
    edit: Option<IdentEdit>,
    awaiting: bool,
    focused: bool,
}

impl IdentField {
    pub fn new(label: &'static str, filter: Option<FacilityKind>, facility: Option<Facility>) -> Self {
        let ident = facility.as_ref().map(|f| ident_from(&f.ident)).unwrap_or_default();
        Self {
            label,
            ident,
            filter,
            facility,
            edit: None,
            awaiting: false,
            focused: false,
        }
    }

    pub fn ident(&self) -> &str {
        self.ident.as_str()
    }

    /// True while a chooser page is open on this field's behalf
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    fn commit(&mut self, facility: Facility) {
        debug!("ident {} committed as {} ({:?})", self.label, facility.ident, facility.kind);
        self.ident = ident_from(&facility.ident);
        self.facility = Some(facility);
        self.edit = None;
        self.awaiting = false;
    }
}

impl Field for IdentField {
    fn label(&self) -> &str {
        self.label
    }

    fn text(&self) -> String {
        match &self.edit {
            Some(edit) => edit.chars.iter().collect(),
            None => self.ident.to_string(),
        }
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focus(&mut self, focused: bool) {
        // losing focus drops an unfinished edit, unless a chooser is open for it
        if !focused && !self.awaiting {
            self.edit = None;
        }
        self.focused = focused;
    }

    fn is_entered(&self) -> bool {
        self.edit.is_some()
    }

    fn outer_left(&mut self) -> bool {
        match self.edit.as_mut() {
            Some(edit) if !self.awaiting && edit.pos > 0 => {
                edit.pos -= 1;
                true
            }
            _ => false,
        }
    }

    fn outer_right(&mut self) -> bool {
        match self.edit.as_mut() {
            Some(edit) if !self.awaiting && edit.pos + 1 < IDENT_LEN => {
                edit.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn move_value(&mut self, step: i32) -> bool {
        if !self.focused || self.awaiting {
            return false;
        }
        let ident = self.ident;
        let edit = self.edit.get_or_insert_with(|| IdentEdit::from_ident(&ident));
        let current = IDENT_CHARS.iter().position(|c| *c == edit.chars[edit.pos]).unwrap_or(0);
        let next = (current as i64 + step as i64).rem_euclid(IDENT_CHARS.len() as i64) as usize;
        edit.chars[edit.pos] = IDENT_CHARS[next];
        true
    }

    fn accepts_enter(&self) -> bool {
        self.edit.is_some() && !self.awaiting
    }

    fn enter(&mut self, ctx: &mut EnterContext<'_>) -> EnterResult {
        let Some(edit) = self.edit else {
            return EnterResult::NotHandled;
        };
        if self.awaiting {
            return EnterResult::HandledKeepFocus;
        }

        let typed = edit.ident();
        if typed.is_empty() {
            self.edit = None;
            return EnterResult::HandledKeepFocus;
        }

        let mut matches = ctx.db().find(&typed);
        if let Some(kind) = self.filter {
            matches.retain(|f| f.kind == kind);
        }

        match matches.len() {
            0 => {
                debug!("ident {}: no facility named {}", self.label, typed);
                self.edit = None;
                EnterResult::HandledKeepFocus
            }
            1 => {
                let facility = matches.remove(0);
                self.commit(facility);
                EnterResult::HandledMoveFocus
            }
            n => {
                debug!("ident {}: {} facilities named {}, asking", self.label, n, typed);
                self.awaiting = true;
                ctx.emit(Effect::Disambiguate { candidates: matches });
                EnterResult::HandledKeepFocus
            }
        }
    }

    fn accepts_clear(&self) -> bool {
        self.edit.is_some() && !self.awaiting
    }

    fn clear(&mut self) -> bool {
        self.edit = None;
        true
    }

    fn keyboard(&mut self, key: char) -> bool {
        if !self.focused || self.awaiting {
            return false;
        }
        let key = key.to_ascii_uppercase();
        if !IDENT_CHARS.contains(&key) {
            return false;
        }
        let edit = self.edit.get_or_insert_with(IdentEdit::blank);
        edit.chars[edit.pos] = key;
        true
    }

    fn resolve(&mut self, facility: Facility) -> EnterResult {
        if !self.awaiting {
            return EnterResult::NotHandled;
        }
        self.commit(facility);
        EnterResult::HandledMoveFocus
    }

    fn abandon(&mut self) {
        self.awaiting = false;
        self.edit = None;
    }

    fn facility(&self) -> Option<&Facility> {
        self.facility.as_ref()
    }
}

/// What Enter on a list row does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    /// Open the waypoint's detail page on the other side
    ShowDetail,
    /// Pick this row to complete a pending ident lookup
    Select,
}

/// One row of a waypoint list
#[derive(Debug, Clone)]
pub struct ListRowField {
    facility: Facility,
    action: RowAction,
    focused: bool,
}

impl ListRowField {
    pub fn new(facility: Facility, action: RowAction) -> Self {
        Self {
            facility,
            action,
            focused: false,
        }
    }
}

impl Field for ListRowField {
    fn label(&self) -> &str {
        &self.facility.ident
    }

    fn text(&self) -> String {
        format!("{} {:?}", self.facility.ident, self.facility.kind)
    }

    fn is_readonly(&self) -> bool {
        true
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn move_value(&mut self, _step: i32) -> bool {
        false
    }

    fn accepts_enter(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut EnterContext<'_>) -> EnterResult {
        let effect = match self.action {
            RowAction::ShowDetail => Effect::ShowWaypoint(self.facility.clone()),
            RowAction::Select => Effect::Resolve(self.facility.clone()),
        };
        ctx.emit(effect);
        EnterResult::HandledKeepFocus
    }

    fn facility(&self) -> Option<&Facility> {
        Some(&self.facility)
    }
}

/// "PRESS ENT" style prompt that issues a command
#[derive(Debug, Clone)]
pub struct ButtonField {
    label: &'static str,
    command: Command,
    focused: bool,
}

impl ButtonField {
    pub fn new(label: &'static str, command: Command) -> Self {
        Self {
            label,
            command,
            focused: false,
        }
    }
}

impl Field for ButtonField {
    fn label(&self) -> &str {
        self.label
    }

    fn text(&self) -> String {
        self.label.to_string()
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn move_value(&mut self, _step: i32) -> bool {
        false
    }

    fn accepts_enter(&self) -> bool {
        true
    }

    fn enter(&mut self, ctx: &mut EnterContext<'_>) -> EnterResult {
        ctx.emit(Effect::Command(self.command.clone()));
        EnterResult::HandledKeepFocus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::{FacilityDatabase, StaticDatabase};

    #[test]
    fn test_choice_wraps_and_reports_readonly() {
        let mut choice = ChoiceField::new("ORIENT", &["N UP", "DTK UP", "TK UP"], 0);
        assert!(choice.move_value(-1));
        assert_eq!(choice.selected(), "TK UP");
        assert!(choice.move_value(1));
        assert_eq!(choice.selected(), "N UP");

        assert!(!choice.is_readonly());
        let fixed = ChoiceField::new("RWY", &["16L", "34R"], 0).readonly();
        assert!(fixed.is_readonly());
        assert_eq!(fixed.text(), "16L");
    }

    #[test]
    fn test_number_clamps_and_clears_to_default() {
        let mut range = NumberField::new("RNG", 10, 1, 12).step(5);
        assert!(!range.accepts_clear());
        assert!(range.move_value(1));
        assert_eq!(range.value(), 12);
        assert!(!range.move_value(1));
        assert!(range.accepts_clear());
        assert!(range.clear());
        assert_eq!(range.value(), 10);
    }

    #[test]
    fn test_ident_knob_entry_single_match_moves_focus() {
        let db = StaticDatabase::demo();
        let mut field = IdentField::new("WPT", Some(FacilityKind::Vor), None);
        field.set_focus(true);

        // S
        for _ in 0..19 {
            field.move_value(1);
        }
        assert!(field.is_entered());
        assert!(field.outer_right());
        assert!(field.keyboard('e'));
        assert!(field.outer_right());
        assert!(field.keyboard('A'));
        assert_eq!(field.text(), "SEA  ");

        let mut ctx = EnterContext::new(&db);
        assert_eq!(field.enter(&mut ctx), EnterResult::HandledMoveFocus);
        assert!(ctx.effects().is_empty());
        assert_eq!(field.ident(), "SEA");
        assert_eq!(field.facility().map(|f| f.kind), Some(FacilityKind::Vor));
        assert!(!field.is_entered());
    }

    #[test]
    fn test_ident_duplicate_suspends_until_resolved() {
        let db = StaticDatabase::demo();
        let mut field = IdentField::new("WPT", None, None);
        field.set_focus(true);
        for key in ['P', 'A', 'E'] {
            assert!(field.keyboard(key));
            field.outer_right();
        }

        let mut ctx = EnterContext::new(&db);
        assert_eq!(field.enter(&mut ctx), EnterResult::HandledKeepFocus);
        assert!(field.is_awaiting());
        assert!(!field.accepts_enter());
        assert!(!field.accepts_clear());
        let candidates = match ctx.into_effects().pop() {
            Some(Effect::Disambiguate { candidates }) => candidates,
            other => panic!("expected a chooser request, got {:?}", other),
        };
        assert_eq!(candidates.len(), 2);

        // focus loss while a chooser is open keeps the edit alive
        field.set_focus(false);
        assert!(field.is_entered());

        let ndb = candidates.into_iter().find(|f| f.kind == FacilityKind::Ndb).unwrap();
        assert_eq!(field.resolve(ndb), EnterResult::HandledMoveFocus);
        assert!(!field.is_awaiting());
        assert_eq!(field.facility().map(|f| f.kind), Some(FacilityKind::Ndb));
        assert_eq!(field.resolve(Facility::new("X", "", FacilityKind::User)), EnterResult::NotHandled);
    }

    #[test]
    fn test_ident_unknown_reverts() {
        let db = StaticDatabase::demo();
        let seed = db.first_of(FacilityKind::Airport);
        let mut field = IdentField::new("APT", Some(FacilityKind::Airport), seed);
        field.set_focus(true);
        field.keyboard('Q');
        let mut ctx = EnterContext::new(&db);
        assert_eq!(field.enter(&mut ctx), EnterResult::HandledKeepFocus);
        assert_eq!(field.ident(), "KSEA");
        assert!(!field.is_entered());
    }

    #[test]
    fn test_list_row_and_button_emit_effects() {
        let db = StaticDatabase::demo();
        let ksea = db.first_of(FacilityKind::Airport).unwrap();
        let mut ctx = EnterContext::new(&db);

        let mut row = ListRowField::new(ksea.clone(), RowAction::Select);
        assert_eq!(row.enter(&mut ctx), EnterResult::HandledKeepFocus);
        let mut button = ButtonField::new("ACTIVATE?", Command::ConfirmDirectTo);
        assert_eq!(button.enter(&mut ctx), EnterResult::HandledKeepFocus);

        assert_eq!(
            ctx.into_effects(),
            vec![Effect::Resolve(ksea), Effect::Command(Command::ConfirmDirectTo)]
        );
    }
}
