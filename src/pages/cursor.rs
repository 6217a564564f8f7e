/*
 *  pages/cursor.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Cursor controller - focus ring over the enabled fields of one half page
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

use log::debug;

use crate::facility::Facility;
use crate::input::Direction;
use super::field::{BoxedField, EnterContext, EnterResult, Field};

/// Cursor over a page's fields
///
/// Invariant: while `active`, `focused_index` indexes a field and that field
/// is the only one reporting `is_focused()`. While inactive no field is
/// focused. The index is kept across deactivation so the cursor comes back
/// where it was left.
#[derive(Debug, Default)]
pub struct CursorController {
    fields: Vec<BoxedField>,
    active: bool,
    focused_index: usize,
}

fn enabled_only(fields: Vec<BoxedField>) -> Vec<BoxedField> {
    fields.into_iter().filter(|f| f.is_enabled()).collect()
}

impl CursorController {
    pub fn new(fields: Vec<BoxedField>) -> Self {
        Self {
            fields: enabled_only(fields),
            active: false,
            focused_index: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Focused index, only meaningful while active
    pub fn focused_index(&self) -> Option<usize> {
        self.active.then_some(self.focused_index)
    }

    pub fn focused_field(&self) -> Option<&dyn Field> {
        if !self.active {
            return None;
        }
        self.field(self.focused_index)
    }

    pub fn field(&self, index: usize) -> Option<&dyn Field> {
        let field: &dyn Field = self.fields.get(index)?.as_ref();
        Some(field)
    }

    pub fn fields(&self) -> std::slice::Iter<'_, BoxedField> {
        self.fields.iter()
    }

    fn focused_mut(&mut self) -> Option<&mut BoxedField> {
        if !self.active {
            return None;
        }
        self.fields.get_mut(self.focused_index)
    }

    /// Flip the cursor on or off
    ///
    /// Returns false (and does nothing) when there is nothing to focus.
    pub fn toggle_cursor(&mut self) -> bool {
        if self.fields.is_empty() {
            return false;
        }
        if self.active {
            // focus-loss fires while still logically active
            if let Some(field) = self.fields.get_mut(self.focused_index) {
                field.set_focus(false);
            }
            self.active = false;
        } else {
            self.focused_index = self.focused_index.min(self.fields.len() - 1);
            self.active = true;
            self.fields[self.focused_index].set_focus(true);
        }
        debug!("cursor {} at {}", if self.active { "on" } else { "off" }, self.focused_index);
        true
    }

    /// Drive the cursor to a wanted state, same rules as `toggle_cursor`
    pub fn set_active(&mut self, active: bool) -> bool {
        if self.active == active {
            return true;
        }
        self.toggle_cursor()
    }

    fn move_focus(&mut self, step: i32) -> bool {
        if !self.active || self.fields.is_empty() {
            return false;
        }
        if self.fields[self.focused_index].is_entered() {
            return if step < 0 {
                self.fields[self.focused_index].outer_left()
            } else {
                self.fields[self.focused_index].outer_right()
            };
        }
        let len = self.fields.len() as i64;
        let next = (self.focused_index as i64 + step as i64).rem_euclid(len) as usize;
        self.fields[self.focused_index].set_focus(false);
        self.focused_index = next;
        self.fields[next].set_focus(true);
        true
    }

    pub fn outer_left(&mut self) -> bool {
        self.move_focus(-1)
    }

    pub fn outer_right(&mut self) -> bool {
        self.move_focus(1)
    }

    pub fn outer(&mut self, direction: Direction) -> bool {
        self.move_focus(direction.step())
    }

    pub fn inner_left(&mut self) -> bool {
        self.inner(Direction::Left)
    }

    pub fn inner_right(&mut self) -> bool {
        self.inner(Direction::Right)
    }

    /// Read-only fields take focus but ignore the inner knob
    pub fn inner(&mut self, direction: Direction) -> bool {
        match self.focused_mut() {
            Some(field) if !field.is_readonly() => field.move_value(direction.step()),
            _ => false,
        }
    }

    /// Does the focused field want Enter for itself?
    pub fn accepts_enter(&self) -> bool {
        self.focused_field().is_some_and(|f| f.accepts_enter())
    }

    /// Offer Enter to the focused field; a `HandledMoveFocus` answer moves
    /// the cursor on by one
    pub fn enter(&mut self, ctx: &mut EnterContext<'_>) -> EnterResult {
        let result = match self.focused_mut() {
            Some(field) => field.enter(ctx),
            None => EnterResult::NotHandled,
        };
        if result == EnterResult::HandledMoveFocus {
            self.outer_right();
        }
        result
    }

    pub fn clear(&mut self) -> bool {
        match self.focused_mut() {
            Some(field) if field.accepts_clear() => field.clear(),
            _ => false,
        }
    }

    /// Keyboard-to-cursor adapter: the focused field consumes the key and,
    /// on success, focus advances (within the field while it is entered)
    pub fn keyboard(&mut self, key: char) -> bool {
        let consumed = match self.focused_mut() {
            Some(field) => field.keyboard(key),
            None => false,
        };
        if consumed {
            self.outer_right();
        }
        consumed
    }

    /// Complete a suspended enter on field `index`
    pub fn resolve(&mut self, index: usize, facility: Facility) -> EnterResult {
        let result = match self.fields.get_mut(index) {
            Some(field) => field.resolve(facility),
            None => EnterResult::NotHandled,
        };
        if result == EnterResult::HandledMoveFocus && self.active && self.focused_index == index {
            self.outer_right();
        }
        result
    }

    /// Give up on a suspended enter on field `index`
    pub fn abandon(&mut self, index: usize) {
        if let Some(field) = self.fields.get_mut(index) {
            field.abandon();
        }
    }

    /// Swap in a reshaped field set (a list whose row count changed)
    pub fn refresh_fields(&mut self, fields: Vec<BoxedField>) {
        self.fields = enabled_only(fields);
        if self.fields.is_empty() {
            self.active = false;
            self.focused_index = 0;
            return;
        }
        if self.focused_index >= self.fields.len() {
            self.focused_index = self.fields.len() - 1;
        }
        if self.active {
            self.fields[self.focused_index].set_focus(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::StaticDatabase;
    use crate::pages::field_kinds::{ChoiceField, IdentField, NumberField};

    fn three_fields() -> Vec<BoxedField> {
        vec![
            Box::new(ChoiceField::new("A", &["1", "2"], 0)) as BoxedField,
            Box::new(NumberField::new("B", 5, 0, 9)) as BoxedField,
            Box::new(ChoiceField::new("C", &["x", "y", "z"], 0)) as BoxedField,
        ]
    }

    fn focused_count(cursor: &CursorController) -> usize {
        cursor.fields().filter(|f| f.is_focused()).count()
    }

    #[test]
    fn test_toggle_on_empty_fails() {
        let mut cursor = CursorController::new(Vec::new());
        assert!(!cursor.toggle_cursor());
        assert!(!cursor.is_active());
        assert!(!cursor.outer_right());
    }

    #[test]
    fn test_outer_wraps_and_remembers_position() {
        let mut cursor = CursorController::new(three_fields());
        assert!(cursor.toggle_cursor());
        assert_eq!(cursor.focused_index(), Some(0));
        assert!(cursor.outer_left());
        assert_eq!(cursor.focused_index(), Some(2));
        assert!(cursor.outer_right());
        assert_eq!(cursor.focused_index(), Some(0));
        assert!(cursor.outer_right());

        assert!(cursor.toggle_cursor());
        assert_eq!(cursor.focused_index(), None);
        assert_eq!(focused_count(&cursor), 0);

        assert!(cursor.toggle_cursor());
        assert_eq!(cursor.focused_index(), Some(1));
    }

    #[test]
    fn test_cursor_invariant_over_random_walk() {
        let mut cursor = CursorController::new(three_fields());
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            match (seed >> 16) % 3 {
                0 => {
                    cursor.toggle_cursor();
                }
                1 => {
                    cursor.outer_left();
                }
                _ => {
                    cursor.outer_right();
                }
            }
            let expected = if cursor.is_active() { 1 } else { 0 };
            assert_eq!(focused_count(&cursor), expected);
            if let Some(i) = cursor.focused_index() {
                assert!(cursor.field(i).is_some_and(|f| f.is_focused()));
            }
        }
    }

    #[test]
    fn test_inner_only_when_active() {
        let mut cursor = CursorController::new(three_fields());
        assert!(!cursor.inner_right());
        cursor.toggle_cursor();
        assert!(cursor.inner_right());
        assert_eq!(cursor.field(0).map(|f| f.text()), Some("2".to_string()));
    }

    #[test]
    fn test_inner_skips_readonly_field() {
        let fields: Vec<BoxedField> = vec![
            Box::new(ChoiceField::new("VER", &["2.04", "2.05"], 0).readonly()) as BoxedField,
            Box::new(NumberField::new("B", 5, 0, 9)) as BoxedField,
        ];
        let mut cursor = CursorController::new(fields);
        assert!(cursor.toggle_cursor());
        assert_eq!(cursor.focused_index(), Some(0));
        assert!(!cursor.inner_right());
        assert_eq!(cursor.field(0).map(|f| f.text()), Some("2.04".to_string()));

        assert!(cursor.outer_right());
        assert!(cursor.inner_right());
        assert_eq!(cursor.field(1).map(|f| f.text()), Some("6".to_string()));
    }

    #[test]
    fn test_entered_field_keeps_outer_knob() {
        let fields: Vec<BoxedField> = vec![
            Box::new(IdentField::new("WPT", None, None)) as BoxedField,
            Box::new(NumberField::new("ALT", 0, 0, 100)) as BoxedField,
        ];
        let mut cursor = CursorController::new(fields);
        cursor.toggle_cursor();
        assert!(cursor.keyboard('K'));
        // adapter advanced within the ident, not to the next field
        assert_eq!(cursor.focused_index(), Some(0));
        assert!(cursor.outer_left());
        assert_eq!(cursor.focused_index(), Some(0));

        // clear ends the edit, then the knob moves focus again
        assert!(cursor.clear());
        assert!(cursor.outer_right());
        assert_eq!(cursor.focused_index(), Some(1));
    }

    #[test]
    fn test_enter_move_focus_advances() {
        let db = StaticDatabase::demo();
        let fields: Vec<BoxedField> = vec![
            Box::new(IdentField::new("WPT", None, None)) as BoxedField,
            Box::new(NumberField::new("ALT", 0, 0, 100)) as BoxedField,
        ];
        let mut cursor = CursorController::new(fields);
        cursor.toggle_cursor();
        for key in "KSEA".chars() {
            cursor.keyboard(key);
        }
        assert!(cursor.accepts_enter());
        let mut ctx = EnterContext::new(&db);
        assert_eq!(cursor.enter(&mut ctx), EnterResult::HandledMoveFocus);
        assert_eq!(cursor.focused_index(), Some(1));
        assert_eq!(cursor.field(0).map(|f| f.text()), Some("KSEA".to_string()));
    }

    #[test]
    fn test_clear_only_when_field_accepts() {
        let mut cursor = CursorController::new(three_fields());
        cursor.toggle_cursor();
        cursor.outer_right();
        assert!(!cursor.clear());
        cursor.inner_left();
        assert!(cursor.clear());
        assert_eq!(cursor.field(1).map(|f| f.text()), Some("5".to_string()));
    }

    #[test]
    fn test_refresh_fields_reclamps_and_deactivates() {
        let mut cursor = CursorController::new(three_fields());
        cursor.toggle_cursor();
        cursor.outer_left();
        assert_eq!(cursor.focused_index(), Some(2));

        cursor.refresh_fields(vec![Box::new(ChoiceField::new("A", &["1"], 0))]);
        assert_eq!(cursor.focused_index(), Some(0));
        assert_eq!(focused_count(&cursor), 1);

        cursor.refresh_fields(Vec::new());
        assert!(!cursor.is_active());
        assert!(!cursor.toggle_cursor());
    }
}
