/*
 *  pages/tree.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Page catalog and the knob-driven controller walking it
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

use std::sync::Arc;

use log::{debug, error, info};

use crate::config::InterfaceConfig;
use crate::facility::FacilityKind;
use super::error::PageError;
use super::factory::{PageContext, PageFactory};
use super::page::{HalfPage, PageId, PageKind};

/// Catalog entries that only exist with the matching device interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Always,
    FuelManagement,
    AirData,
}

impl Gate {
    fn is_open(self, interface: &InterfaceConfig) -> bool {
        match self {
            Gate::Always => true,
            Gate::FuelManagement => interface.fuel_management,
            Gate::AirData => interface.air_data,
        }
    }
}

type CatalogEntry = (&'static str, &'static [(PageKind, Gate)]);

use Gate::{AirData, Always, FuelManagement};
use PageKind as K;

const LEFT_CATALOG: &[CatalogEntry] = &[
    ("CTR", &[(K::Ctr1, Always), (K::Ctr2, Always)]),
    ("REF", &[(K::Ref, Always)]),
    ("ACT", &[(K::Act, Always)]),
    ("D/T", &[(K::Dt1, Always), (K::Dt2, Always), (K::Dt3, Always), (K::Dt4, Always)]),
    ("NAV", &[(K::Nav1, Always), (K::Nav2, Always), (K::Nav3, Always), (K::Nav4, Always), (K::Nav5, Always)]),
    ("FPL", &[(K::Fpl, Always)]),
    ("SET", &[(K::Set0, Always), (K::Set1, Always), (K::Set2, Always), (K::Set3, Always), (K::Set4, Always)]),
    ("OTH", &[
        (K::Oth1, Always),
        (K::Oth2, Always),
        (K::Oth3, Always),
        (K::Oth4, Always),
        (K::Oth5, FuelManagement),
        (K::Oth6, AirData),
    ]),
    ("STA", &[(K::Sta1, Always), (K::Sta2, Always), (K::Sta3, Always)]),
    ("MOD", &[(K::Mod, Always)]),
];

const RIGHT_CATALOG: &[CatalogEntry] = &[
    ("CTR", &[(K::Ctr1, Always), (K::Ctr2, Always)]),
    ("REF", &[(K::Ref, Always)]),
    ("ACT", &[(K::Act, Always)]),
    ("D/T", &[(K::Dt1, Always), (K::Dt2, Always), (K::Dt3, Always), (K::Dt4, Always)]),
    ("NAV", &[(K::Nav1, Always), (K::Nav2, Always), (K::Nav3, Always), (K::Nav4, Always), (K::Nav5, Always)]),
    ("FPL", &[(K::Fpl, Always)]),
    ("APT", &[(K::Apt1, Always), (K::Apt2, Always), (K::Apt3, Always)]),
    ("VOR", &[(K::Vor1, Always), (K::Vor2, Always)]),
    ("NDB", &[(K::Ndb1, Always)]),
    ("INT", &[(K::Int1, Always)]),
    ("SUP", &[(K::Sup1, Always)]),
    ("OTH", &[
        (K::Oth1, Always),
        (K::Oth2, Always),
        (K::Oth3, Always),
        (K::Oth4, Always),
        (K::Oth5, FuelManagement),
    ]),
    ("CAL", &[(K::Cal1, Always), (K::Cal2, Always), (K::Cal3, Always), (K::Cal4, AirData)]),
];

/// One top-level grouping, selected by the outer knob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub pages: Vec<PageKind>,
}

/// Immutable ordered catalog of page kinds, categories x subpages
///
/// Built once at start-up (already pruned) and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTree {
    categories: Vec<Category>,
}

impl PageTree {
    /// Empty categories are dropped so every index addresses a page
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories: categories.into_iter().filter(|c| !c.pages.is_empty()).collect(),
        }
    }

    /// Anonymous tree, category names taken from the first page
    pub fn from_kinds(categories: Vec<Vec<PageKind>>) -> Self {
        Self::new(
            categories
                .into_iter()
                .map(|pages| Category {
                    name: pages
                        .first()
                        .map(|k| k.name().split(' ').next().unwrap_or_default().to_string())
                        .unwrap_or_default(),
                    pages,
                })
                .collect(),
        )
    }

    fn from_catalog(catalog: &[CatalogEntry], interface: &InterfaceConfig) -> Self {
        let tree = Self::new(
            catalog
                .iter()
                .map(|(name, entries)| Category {
                    name: name.to_string(),
                    pages: entries
                        .iter()
                        .filter(|(_, gate)| gate.is_open(interface))
                        .map(|(kind, _)| *kind)
                        .collect(),
                })
                .collect(),
        );
        debug!("catalog pruned to {} categories for {:?}", tree.len(), interface);
        tree
    }

    pub fn left(interface: &InterfaceConfig) -> Self {
        Self::from_catalog(LEFT_CATALOG, interface)
    }

    pub fn right(interface: &InterfaceConfig) -> Self {
        Self::from_catalog(RIGHT_CATALOG, interface)
    }

    /// Detail pages available for one facility type
    pub fn for_facility(kind: FacilityKind) -> Self {
        let pages = match kind {
            FacilityKind::Airport => vec![K::Apt1, K::Apt2, K::Apt3],
            FacilityKind::Vor => vec![K::Vor1, K::Vor2],
            FacilityKind::Ndb => vec![K::Ndb1],
            FacilityKind::Intersection => vec![K::Int1],
            FacilityKind::User => vec![K::Sup1],
        };
        Self::from_kinds(vec![pages])
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn kind_at(&self, category: usize, subpage: usize) -> Option<PageKind> {
        self.categories.get(category)?.pages.get(subpage).copied()
    }

    /// (category, subpage) coordinates of the first entry of `kind`
    pub fn locate(&self, kind: PageKind) -> Option<(usize, usize)> {
        self.categories.iter().enumerate().find_map(|(ci, c)| {
            c.pages.iter().position(|k| *k == kind).map(|si| (ci, si))
        })
    }

    pub fn contains(&self, kind: PageKind) -> bool {
        self.locate(kind).is_some()
    }
}

/// Maps knob movement over a `PageTree` onto the displayed page
///
/// Invariant: `tree[category_index][remembered[category_index]]` is the
/// kind of the page identified by `current`.
#[derive(Debug, Clone)]
pub struct PageTreeController {
    tree: Arc<PageTree>,
    current: PageId,
    category_index: usize,
    remembered: Vec<usize>,
}

impl PageTreeController {
    /// Anchor a controller on the page already on display
    pub fn new(tree: Arc<PageTree>, page: &HalfPage) -> Result<Self, PageError> {
        if tree.is_empty() {
            error!("page tree has no categories");
            return Err(PageError::EmptyCatalog);
        }
        let (category_index, subpage) = locate_or_fail(&tree, page.kind())?;
        let mut remembered = vec![0; tree.len()];
        remembered[category_index] = subpage;
        Ok(Self {
            tree,
            current: page.id(),
            category_index,
            remembered,
        })
    }

    pub fn tree(&self) -> &PageTree {
        &self.tree
    }

    pub fn current(&self) -> PageId {
        self.current
    }

    pub fn category_index(&self) -> usize {
        self.category_index
    }

    pub fn subpage_index(&self) -> usize {
        self.remembered[self.category_index]
    }

    pub fn current_kind(&self) -> Option<PageKind> {
        self.tree.kind_at(self.category_index, self.subpage_index())
    }

    /// Outer knob: next/previous category, landing on its remembered entry
    pub fn move_page(
        &mut self,
        step: i32,
        factory: &mut PageFactory,
        ctx: &PageContext<'_>,
    ) -> Result<HalfPage, PageError> {
        let count = self.tree.len() as i64;
        let category = (self.category_index as i64 + step as i64).rem_euclid(count) as usize;
        let subpage = self.remembered[category];
        let kind = self
            .tree
            .kind_at(category, subpage)
            .ok_or(PageError::EmptyCatalog)?;
        let page = factory.build(kind, ctx);
        self.set_page(&page)?;
        Ok(page)
    }

    /// Inner knob: internal subpage first, then the neighbouring entry
    ///
    /// Returns `None` when only the page's own counter moved, otherwise the
    /// freshly built page that must replace it.
    pub fn move_subpage(
        &mut self,
        page: &mut HalfPage,
        step: i32,
        factory: &mut PageFactory,
        ctx: &PageContext<'_>,
    ) -> Result<Option<HalfPage>, PageError> {
        let target = page.current_subpage() as i64 + step as i64;
        if page.num_subpages() > 1 && target >= 0 && (target as usize) < page.num_subpages() {
            page.set_current_subpage(target as usize);
            factory.reload(page, ctx);
            debug!("{} subpage {}", page.name(), target);
            return Ok(None);
        }

        let entries = self
            .tree
            .category(self.category_index)
            .map(|c| c.pages.len())
            .unwrap_or(0) as i64;
        if entries <= 1 && page.num_subpages() <= 1 {
            return Ok(None);
        }
        let next = (self.subpage_index() as i64 + step as i64).rem_euclid(entries.max(1)) as usize;
        let kind = self
            .tree
            .kind_at(self.category_index, next)
            .ok_or(PageError::KindNotInCatalog(page.kind()))?;

        let mut fresh = factory.build(kind, ctx);
        if step < 0 && fresh.num_subpages() > 1 {
            fresh.set_current_subpage(fresh.num_subpages() - 1);
            factory.reload(&mut fresh, ctx);
        }
        self.set_page(&fresh)?;
        Ok(Some(fresh))
    }

    /// Record a page change; false when `page` is already the current one
    pub fn set_page(&mut self, page: &HalfPage) -> Result<bool, PageError> {
        if page.id() == self.current {
            return Ok(false);
        }
        let (category, subpage) = locate_or_fail(&self.tree, page.kind())?;
        self.category_index = category;
        self.remembered[category] = subpage;
        self.current = page.id();
        info!("page -> {}", page.name());
        Ok(true)
    }
}

fn locate_or_fail(tree: &PageTree, kind: PageKind) -> Result<(usize, usize), PageError> {
    tree.locate(kind).ok_or_else(|| {
        error!("{} is not in the page catalog", kind.name());
        PageError::KindNotInCatalog(kind)
    })
}
