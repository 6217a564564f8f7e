/*
 *  pages/overlay.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Full-screen overlay pages and the rules that summon them
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

use log::debug;

use crate::input::Side;
use super::cursor::CursorController;
use super::field::{BoxedField, Command, Effect, EnterContext};
use super::field_kinds::{ChoiceField, NumberField};
use super::page::PageKind;

/// Steps the database wizard walks before it finishes on its own
pub const WIZARD_STEPS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    MessageReview,
    SuperNav1,
    SuperNav5,
    DatabaseWizard,
}

impl OverlayKind {
    pub fn name(self) -> &'static str {
        match self {
            OverlayKind::MessageReview => "MSG",
            OverlayKind::SuperNav1 => "SUPER NAV 1",
            OverlayKind::SuperNav5 => "SUPER NAV 5",
            OverlayKind::DatabaseWizard => "DB WIZARD",
        }
    }

    /// The merged nav views leave the category knobs working
    pub fn allows_tree_knob(self) -> bool {
        matches!(self, OverlayKind::SuperNav1 | OverlayKind::SuperNav5)
    }

    /// Shown and removed only through the combination rules
    pub fn is_auto(self) -> bool {
        !matches!(self, OverlayKind::MessageReview)
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A page covering both halves, with a cursor per half
#[derive(Debug)]
pub struct OverlayPage {
    kind: OverlayKind,
    left: CursorController,
    right: CursorController,
    step: usize,
    ticks: u64,
    blink: bool,
}

impl OverlayPage {
    pub fn new(kind: OverlayKind) -> Self {
        let (left, right): (Vec<BoxedField>, Vec<BoxedField>) = match kind {
            OverlayKind::SuperNav5 => (
                Vec::new(),
                vec![
                    Box::new(NumberField::new("RNG", 20, 1, 160)) as BoxedField,
                    Box::new(ChoiceField::new("ORIENT", &["N^", "DTK^", "TK^"], 1)) as BoxedField,
                ],
            ),
            OverlayKind::DatabaseWizard => (
                vec![Box::new(ChoiceField::new("REGION", &["AMERICAS", "INTL", "ATLANTIC"], 0)) as BoxedField],
                Vec::new(),
            ),
            OverlayKind::MessageReview | OverlayKind::SuperNav1 => (Vec::new(), Vec::new()),
        };
        Self {
            kind,
            left: CursorController::new(left),
            right: CursorController::new(right),
            step: 0,
            ticks: 0,
            blink: false,
        }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn cursor(&self, side: Side) -> &CursorController {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn cursor_mut(&mut self, side: Side) -> &mut CursorController {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Page-level Enter; the wizard advances and finishes after its last step
    pub fn page_enter(&mut self, ctx: &mut EnterContext<'_>) -> bool {
        if self.kind != OverlayKind::DatabaseWizard {
            return false;
        }
        self.step += 1;
        debug!("wizard step {}/{}", self.step, WIZARD_STEPS);
        if self.step >= WIZARD_STEPS {
            ctx.emit(Effect::Command(Command::FinishWizard));
        }
        true
    }

    /// Page-level Clear; abandons the wizard
    pub fn page_clear(&mut self, ctx: &mut EnterContext<'_>) -> bool {
        if self.kind != OverlayKind::DatabaseWizard {
            return false;
        }
        ctx.emit(Effect::Command(Command::FinishWizard));
        true
    }

    pub fn tick(&mut self, blink: bool) {
        self.ticks += 1;
        self.blink = blink;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// One row of the combination table: overlay shown while both predicates
/// hold for the pages on display
#[derive(Clone, Copy)]
pub struct OverlayRule {
    pub left: fn(PageKind) -> bool,
    pub right: fn(PageKind) -> bool,
    pub overlay: OverlayKind,
}

impl OverlayRule {
    pub fn holds(&self, left: PageKind, right: PageKind) -> bool {
        (self.left)(left) && (self.right)(right)
    }
}

impl fmt::Debug for OverlayRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayRule").field("overlay", &self.overlay).finish()
    }
}

pub fn default_rules() -> Vec<OverlayRule> {
    vec![
        OverlayRule {
            left: |k| k == PageKind::Nav1,
            right: |k| k == PageKind::Nav1,
            overlay: OverlayKind::SuperNav1,
        },
        OverlayRule {
            left: |k| k == PageKind::Nav5,
            right: |k| k == PageKind::Nav5,
            overlay: OverlayKind::SuperNav5,
        },
        OverlayRule {
            left: |k| k == PageKind::Set0,
            right: |_| true,
            overlay: OverlayKind::DatabaseWizard,
        },
    ]
}
