/*
 *  pages/page.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Half page - content occupying one physical half of the display
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

use crate::facility::{Facility, FacilityDatabase, FacilityKind};
use super::cursor::CursorController;
use super::field::{BoxedField, Command, Effect, EnterContext};
use super::tree::PageTreeController;

/// Runtime identity of a constructed page (never reused)
pub type PageId = u64;

/// Fixed-width page caption as shown on the status line
pub type PageName = ArrayString<8>;

/// Every kind of half page the unit knows
///
/// Identity is by kind; routing decisions match on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Ctr1,
    Ctr2,
    Ref,
    Act,
    Dt1,
    Dt2,
    Dt3,
    Dt4,
    Nav1,
    Nav2,
    Nav3,
    Nav4,
    Nav5,
    Fpl,
    Set0,
    Set1,
    Set2,
    Set3,
    Set4,
    Oth1,
    Oth2,
    Oth3,
    Oth4,
    Oth5,
    Oth6,
    Sta1,
    Sta2,
    Sta3,
    Mod,
    Apt1,
    Apt2,
    Apt3,
    Vor1,
    Vor2,
    Ndb1,
    Int1,
    Sup1,
    Cal1,
    Cal2,
    Cal3,
    Cal4,
    // temporary pages, never in a tree
    DirectTo,
    Altitude,
    Disambiguation,
}

impl PageKind {
    pub fn name(self) -> &'static str {
        match self {
            PageKind::Ctr1 => "CTR 1",
            PageKind::Ctr2 => "CTR 2",
            PageKind::Ref => "REF",
            PageKind::Act => "ACT",
            PageKind::Dt1 => "D/T 1",
            PageKind::Dt2 => "D/T 2",
            PageKind::Dt3 => "D/T 3",
            PageKind::Dt4 => "D/T 4",
            PageKind::Nav1 => "NAV 1",
            PageKind::Nav2 => "NAV 2",
            PageKind::Nav3 => "NAV 3",
            PageKind::Nav4 => "NAV 4",
            PageKind::Nav5 => "NAV 5",
            PageKind::Fpl => "FPL",
            PageKind::Set0 => "SET 0",
            PageKind::Set1 => "SET 1",
            PageKind::Set2 => "SET 2",
            PageKind::Set3 => "SET 3",
            PageKind::Set4 => "SET 4",
            PageKind::Oth1 => "OTH 1",
            PageKind::Oth2 => "OTH 2",
            PageKind::Oth3 => "OTH 3",
            PageKind::Oth4 => "OTH 4",
            PageKind::Oth5 => "OTH 5",
            PageKind::Oth6 => "OTH 6",
            PageKind::Sta1 => "STA 1",
            PageKind::Sta2 => "STA 2",
            PageKind::Sta3 => "STA 3",
            PageKind::Mod => "MOD",
            PageKind::Apt1 => "APT 1",
            PageKind::Apt2 => "APT 2",
            PageKind::Apt3 => "APT 3",
            PageKind::Vor1 => "VOR 1",
            PageKind::Vor2 => "VOR 2",
            PageKind::Ndb1 => "NDB 1",
            PageKind::Int1 => "INT 1",
            PageKind::Sup1 => "SUP 1",
            PageKind::Cal1 => "CAL 1",
            PageKind::Cal2 => "CAL 2",
            PageKind::Cal3 => "CAL 3",
            PageKind::Cal4 => "CAL 4",
            PageKind::DirectTo => "D->",
            PageKind::Altitude => "ALT",
            PageKind::Disambiguation => "DUP IDNT",
        }
    }

    /// Facility type shown by a waypoint page
    pub fn facility_kind(self) -> Option<FacilityKind> {
        match self {
            PageKind::Apt1 | PageKind::Apt2 | PageKind::Apt3 => Some(FacilityKind::Airport),
            PageKind::Vor1 | PageKind::Vor2 => Some(FacilityKind::Vor),
            PageKind::Ndb1 => Some(FacilityKind::Ndb),
            PageKind::Int1 => Some(FacilityKind::Intersection),
            PageKind::Sup1 => Some(FacilityKind::User),
            _ => None,
        }
    }
}

/// A page occupying one half of the display
#[derive(Debug)]
pub struct HalfPage {
    id: PageId,
    kind: PageKind,
    name: PageName,
    num_subpages: usize,
    current_subpage: usize,
    cursor: CursorController,
    facility: Option<Facility>,
    nested: Option<PageTreeController>,
    scanning: bool,
    ticks: u64,
    blink: bool,
}

impl HalfPage {
    pub fn new(id: PageId, kind: PageKind, fields: Vec<BoxedField>) -> Self {
        Self {
            id,
            kind,
            name: PageName::from(kind.name()).unwrap_or_default(),
            num_subpages: 1,
            current_subpage: 0,
            cursor: CursorController::new(fields),
            facility: None,
            nested: None,
            scanning: false,
            ticks: 0,
            blink: false,
        }
    }

    /// Builder: number of internal subpages (at least one)
    pub fn with_subpages(mut self, count: usize) -> Self {
        self.num_subpages = count.max(1);
        self.current_subpage = self.current_subpage.min(self.num_subpages - 1);
        self
    }

    /// Builder: the facility this page is showing
    pub fn with_facility(mut self, facility: Option<Facility>) -> Self {
        self.facility = facility;
        self
    }

    /// Builder: start with the cursor already on (chooser-style pages)
    pub fn with_cursor_active(mut self) -> Self {
        self.cursor.set_active(true);
        self
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn num_subpages(&self) -> usize {
        self.num_subpages
    }

    pub fn current_subpage(&self) -> usize {
        self.current_subpage
    }

    /// Select an internal subpage; returns false when out of range
    pub fn set_current_subpage(&mut self, index: usize) -> bool {
        if index >= self.num_subpages {
            return false;
        }
        self.current_subpage = index;
        true
    }

    pub fn cursor(&self) -> &CursorController {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut CursorController {
        &mut self.cursor
    }

    pub fn facility(&self) -> Option<&Facility> {
        self.facility.as_ref()
    }

    /// Adopt whatever facility the fields now designate
    ///
    /// Called after Enter/resolve so a waypoint page follows a newly
    /// committed ident.
    pub fn sync_facility(&mut self) {
        if self.kind.facility_kind().is_none() && self.kind != PageKind::DirectTo {
            return;
        }
        let committed = self.cursor.fields().find_map(|f| f.facility().cloned());
        if committed.is_some() && committed != self.facility {
            debug!("{} now showing {:?}", self.name, committed.as_ref().map(|f| &f.ident));
            self.facility = committed;
        }
    }

    pub fn nested(&self) -> Option<&PageTreeController> {
        self.nested.as_ref()
    }

    pub fn set_nested(&mut self, nested: PageTreeController) {
        self.nested = Some(nested);
    }

    pub fn take_nested(&mut self) -> Option<PageTreeController> {
        self.nested.take()
    }

    /// May Clear close this page when it sits above the base?
    /// A chooser always may (its cursor is never off); anything else only
    /// once its cursor is off.
    pub fn accepts_dismiss(&self) -> bool {
        self.kind == PageKind::Disambiguation || !self.cursor.is_active()
    }

    /// Enter with no field wanting it ("press ENT to ...")
    pub fn page_enter(&mut self, ctx: &mut EnterContext<'_>) -> bool {
        match self.kind {
            PageKind::Fpl if self.current_subpage > 0 => {
                ctx.emit(Effect::Command(Command::ActivateFlightPlan(self.current_subpage)));
                true
            }
            PageKind::DirectTo => {
                ctx.emit(Effect::Command(Command::ConfirmDirectTo));
                true
            }
            _ => false,
        }
    }

    /// Base waypoint pages can scan the database; detail pages cannot
    pub fn supports_scan(&self) -> bool {
        self.kind.facility_kind().is_some() && self.nested.is_none()
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn scan_toggle(&mut self) -> bool {
        if !self.supports_scan() {
            return false;
        }
        self.scanning = !self.scanning;
        debug!("{} scan {}", self.name, if self.scanning { "on" } else { "off" });
        true
    }

    /// Step to the neighbouring facility of the same type while scanning.
    /// The caller reloads the fields afterwards.
    pub fn scan_move(&mut self, step: i32, db: &dyn FacilityDatabase) -> bool {
        if !self.scanning {
            return false;
        }
        let next = match (&self.facility, self.kind.facility_kind()) {
            (Some(current), _) => db.step_from(current, step),
            (None, Some(kind)) => db.first_of(kind),
            (None, None) => None,
        };
        match next {
            Some(facility) => {
                self.facility = Some(facility);
                true
            }
            None => false,
        }
    }

    pub fn tick(&mut self, blink: bool) {
        self.ticks += 1;
        self.blink = blink;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn blink(&self) -> bool {
        self.blink
    }
}
