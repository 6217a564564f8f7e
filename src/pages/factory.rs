/*
 *  pages/factory.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Page factory - builds a HalfPage for any PageKind
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

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::facility::{Facility, FacilityDatabase, FacilityKind};
use super::error::PageError;
use super::field::{BoxedField, Command, Field};
use super::field_kinds::{ButtonField, ChoiceField, IdentField, ListRowField, NumberField, RowAction};
use super::page::{HalfPage, PageId, PageKind};
use super::tree::{PageTree, PageTreeController};

/// A flight plan as an ordered list of waypoints
pub type FlightPlan = Vec<Facility>;

/// What a page may be built from
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub db: &'a dyn FacilityDatabase,
    /// Stored plans, index 0 is the active one
    pub plans: &'a [FlightPlan],
    pub facility: Option<&'a Facility>,
}

impl<'a> PageContext<'a> {
    pub fn new(db: &'a dyn FacilityDatabase, plans: &'a [FlightPlan]) -> Self {
        Self {
            db,
            plans,
            facility: None,
        }
    }

    /// Same context, seeded with the facility a waypoint page should show
    pub fn with_facility(self, facility: Option<&'a Facility>) -> Self {
        Self { facility, ..self }
    }
}

/// Builds pages on demand and hands out their ids
#[derive(Debug)]
pub struct PageFactory {
    next_id: PageId,
    detail_trees: HashMap<FacilityKind, Arc<PageTree>>,
}

impl Default for PageFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFactory {
    pub fn new() -> Self {
        let detail_trees = [
            FacilityKind::Airport,
            FacilityKind::Vor,
            FacilityKind::Ndb,
            FacilityKind::Intersection,
            FacilityKind::User,
        ]
        .into_iter()
        .map(|kind| (kind, Arc::new(PageTree::for_facility(kind))))
        .collect();
        Self {
            next_id: 1,
            detail_trees,
        }
    }

    fn next_id(&mut self) -> PageId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn build(&mut self, kind: PageKind, ctx: &PageContext<'_>) -> HalfPage {
        let facility = match kind.facility_kind() {
            Some(wanted) => ctx
                .facility
                .filter(|f| f.kind == wanted)
                .cloned()
                .or_else(|| ctx.db.first_of(wanted)),
            None if kind == PageKind::DirectTo => ctx.facility.cloned(),
            None => None,
        };
        let subpages = match kind {
            PageKind::Fpl => ctx.plans.len(),
            _ => 1,
        };
        let fields = fields_for(kind, 0, facility.as_ref(), ctx);
        let page = HalfPage::new(self.next_id(), kind, fields)
            .with_subpages(subpages)
            .with_facility(facility);
        debug!("built {} #{}", page.name(), page.id());
        match kind {
            PageKind::DirectTo => page.with_cursor_active(),
            _ => page,
        }
    }

    /// Chooser listing every facility sharing one ident
    pub fn build_disambiguation(&mut self, candidates: Vec<Facility>) -> HalfPage {
        let rows: Vec<BoxedField> = candidates
            .into_iter()
            .map(|f| boxed(ListRowField::new(f, RowAction::Select)))
            .collect();
        HalfPage::new(self.next_id(), PageKind::Disambiguation, rows).with_cursor_active()
    }

    /// Waypoint detail page carrying its own tree for the facility's type
    pub fn build_detail(
        &mut self,
        facility: &Facility,
        ctx: &PageContext<'_>,
    ) -> Result<HalfPage, PageError> {
        let tree = self
            .detail_trees
            .get(&facility.kind)
            .cloned()
            .ok_or(PageError::EmptyCatalog)?;
        let kind = tree.kind_at(0, 0).ok_or(PageError::EmptyCatalog)?;
        let mut page = self.build(kind, &ctx.with_facility(Some(facility)));
        let nested = PageTreeController::new(tree, &page)?;
        page.set_nested(nested);
        Ok(page)
    }

    /// Rebuild the fields of a data-driven page after its data moved
    pub fn reload(&self, page: &mut HalfPage, ctx: &PageContext<'_>) {
        if !is_data_driven(page.kind()) {
            return;
        }
        let fields = fields_for(page.kind(), page.current_subpage(), page.facility(), ctx);
        page.cursor_mut().refresh_fields(fields);
    }
}

fn is_data_driven(kind: PageKind) -> bool {
    matches!(kind, PageKind::Act | PageKind::Fpl) || kind.facility_kind().is_some()
}

fn boxed<F: Field + 'static>(field: F) -> BoxedField {
    Box::new(field)
}

fn rows(plan: Option<&FlightPlan>) -> Vec<BoxedField> {
    plan.map(|p| {
        p.iter()
            .map(|f| boxed(ListRowField::new(f.clone(), RowAction::ShowDetail)))
            .collect()
    })
    .unwrap_or_default()
}

fn fields_for(
    kind: PageKind,
    subpage: usize,
    facility: Option<&Facility>,
    ctx: &PageContext<'_>,
) -> Vec<BoxedField> {
    match kind {
        PageKind::Ref => vec![boxed(ChoiceField::new("CDI", &["1.25NM", "5NM", "AUTO"], 2))],
        PageKind::Act => rows(ctx.plans.first()),
        PageKind::Fpl => rows(ctx.plans.get(subpage)),
        PageKind::Nav4 => vec![boxed(ChoiceField::new("TIME", &["UTC", "LCL"], 0))],
        PageKind::Nav5 => vec![
            boxed(NumberField::new("RNG", 20, 1, 160)),
            boxed(ChoiceField::new("ORIENT", &["N^", "DTK^", "TK^"], 1)),
        ],
        PageKind::Set1 => vec![boxed(ChoiceField::new("BARO", &["IN", "MB"], 0))],
        PageKind::Set2 => vec![boxed(ChoiceField::new("NRST", &["ANY", "HARD", "SOFT"], 0))],
        PageKind::Set3 => vec![boxed(NumberField::new("MSA", 1000, 0, 5000).step(100))],
        PageKind::Set4 => vec![
            boxed(ChoiceField::new("DIST", &["NM", "KM"], 0)),
            boxed(ChoiceField::new("ALT", &["FT", "M"], 0)),
        ],
        PageKind::Oth5 => vec![boxed(NumberField::new("FUEL", 0, 0, 9990).step(10))],
        PageKind::Sta1 => vec![boxed(ChoiceField::new("VER", &["2.04"], 0).readonly())],
        PageKind::Cal1 => vec![boxed(NumberField::new("IND", 0, -1000, 60000).step(100))],
        PageKind::Apt1 | PageKind::Vor1 | PageKind::Ndb1 | PageKind::Int1 | PageKind::Sup1 => {
            vec![boxed(IdentField::new("IDNT", kind.facility_kind(), facility.cloned()))]
        }
        PageKind::DirectTo => vec![
            boxed(IdentField::new("D->", None, facility.cloned())),
            boxed(ButtonField::new("ACTIVATE?", Command::ConfirmDirectTo)),
        ],
        PageKind::Altitude => vec![
            boxed(NumberField::new("BARO", 2992, 2800, 3100)),
            boxed(NumberField::new("ALT", 0, -1000, 60000).step(100)),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::StaticDatabase;

    #[test]
    fn test_ids_are_unique() {
        let db = StaticDatabase::demo();
        let ctx = PageContext::new(&db, &[]);
        let mut factory = PageFactory::new();
        let a = factory.build(PageKind::Nav1, &ctx);
        let b = factory.build(PageKind::Nav1, &ctx);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_waypoint_pages_seeded_from_database() {
        let db = StaticDatabase::demo();
        let ctx = PageContext::new(&db, &[]);
        let mut factory = PageFactory::new();
        let page = factory.build(PageKind::Ndb1, &ctx);
        assert_eq!(page.facility().map(|f| f.ident.as_str()), Some("PAE"));
        assert_eq!(page.cursor().len(), 1);
    }

    #[test]
    fn test_fpl_has_one_subpage_per_plan() {
        let db = StaticDatabase::demo();
        let plans = vec![db.find("KSEA"), db.find("KSEA").into_iter().chain(db.find("KBFI")).collect()];
        let ctx = PageContext::new(&db, &plans);
        let mut factory = PageFactory::new();
        let mut page = factory.build(PageKind::Fpl, &ctx);
        assert_eq!(page.num_subpages(), 2);
        assert_eq!(page.cursor().len(), 1);
        page.set_current_subpage(1);
        factory.reload(&mut page, &ctx);
        assert_eq!(page.cursor().len(), 2);
    }

    #[test]
    fn test_detail_page_gets_nested_tree() {
        let db = StaticDatabase::demo();
        let ctx = PageContext::new(&db, &[]);
        let mut factory = PageFactory::new();
        let vor = db.first_of(FacilityKind::Vor).unwrap();
        let page = factory.build_detail(&vor, &ctx).unwrap();
        assert_eq!(page.kind(), PageKind::Vor1);
        assert_eq!(page.facility(), Some(&vor));
        assert_eq!(page.nested().map(|n| n.tree().len()), Some(1));
        assert!(!page.supports_scan());
    }

    #[test]
    fn test_chooser_starts_with_cursor_on() {
        let db = StaticDatabase::demo();
        let mut factory = PageFactory::new();
        let page = factory.build_disambiguation(db.find("PAE"));
        assert_eq!(page.kind(), PageKind::Disambiguation);
        assert_eq!(page.cursor().focused_index(), Some(0));
        assert!(page.accepts_dismiss());
    }
}
