/*
 *  pages/stack.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Per-side page stack and the shared overlay stack
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

use log::{debug, error};

use crate::input::Side;
use super::error::PageError;
use super::overlay::{OverlayKind, OverlayPage};
use super::page::{HalfPage, PageId, PageKind};

/// A temporary page and the page it was opened for
#[derive(Debug)]
pub struct PageStackEntry {
    pub page: HalfPage,
    pub parent: Option<PageId>,
}

/// Base category page plus any temporary pages pushed over it
///
/// The base entry lives outside the vector so the stack can never be
/// emptied; `len() >= 1` holds by construction.
#[derive(Debug)]
pub struct PageStack {
    side: Side,
    base: HalfPage,
    pushed: Vec<PageStackEntry>,
}

impl PageStack {
    pub fn new(side: Side, base: HalfPage) -> Self {
        Self {
            side,
            base,
            pushed: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn len(&self) -> usize {
        1 + self.pushed.len()
    }

    pub fn is_base_shown(&self) -> bool {
        self.pushed.is_empty()
    }

    pub fn base(&self) -> &HalfPage {
        &self.base
    }

    pub fn top(&self) -> &HalfPage {
        self.pushed.last().map(|e| &e.page).unwrap_or(&self.base)
    }

    pub fn top_mut(&mut self) -> &mut HalfPage {
        match self.pushed.last_mut() {
            Some(entry) => &mut entry.page,
            None => &mut self.base,
        }
    }

    /// Parent of the top page, `None` for the base
    pub fn top_parent(&self) -> Option<PageId> {
        self.pushed.last().and_then(|e| e.parent)
    }

    pub fn push(&mut self, page: HalfPage, parent: Option<PageId>) {
        debug!("{} push {} (parent {:?})", self.side, page.name(), parent);
        self.pushed.push(PageStackEntry { page, parent });
    }

    /// Remove the top temporary page; the base entry is never popped
    pub fn pop(&mut self) -> Result<HalfPage, PageError> {
        debug_assert!(!self.pushed.is_empty(), "{} stack: pop of the base page", self.side);
        match self.pushed.pop() {
            Some(entry) => {
                debug!("{} pop {}", self.side, entry.page.name());
                Ok(entry.page)
            }
            None => {
                error!("{} stack: pop with only the base page left", self.side);
                Err(PageError::BaseEntryPop(self.side))
            }
        }
    }

    /// Swap the top page, dropping its parent link
    pub fn set_current(&mut self, page: HalfPage) -> HalfPage {
        match self.pushed.last_mut() {
            Some(entry) => {
                entry.parent = None;
                std::mem::replace(&mut entry.page, page)
            }
            None => std::mem::replace(&mut self.base, page),
        }
    }

    /// Swap the top page but keep it tied to the same parent
    pub fn replace_top(&mut self, page: HalfPage) -> HalfPage {
        std::mem::replace(self.top_mut(), page)
    }

    /// Drop every entry opened for `removed`; true if anything went
    pub fn parent_removed(&mut self, removed: PageId) -> bool {
        !self.remove_children(removed).is_empty()
    }

    /// As `parent_removed`, handing back what was dropped so the caller can
    /// keep cascading
    pub fn remove_children(&mut self, removed: PageId) -> Vec<HalfPage> {
        let mut gone = Vec::new();
        let mut kept = Vec::with_capacity(self.pushed.len());
        for entry in self.pushed.drain(..) {
            if entry.parent == Some(removed) {
                gone.push(entry.page);
            } else {
                kept.push(entry);
            }
        }
        self.pushed = kept;
        for page in &gone {
            debug!("{} cascade removed {}", self.side, page.name());
        }
        gone
    }

    /// Drop every temporary page, leaving the base on display
    pub fn clear_to_base(&mut self) -> Vec<HalfPage> {
        self.pushed.drain(..).map(|e| e.page).collect()
    }

    pub fn contains(&self, id: PageId) -> bool {
        self.base.id() == id || self.pushed.iter().any(|e| e.page.id() == id)
    }

    pub fn get(&self, id: PageId) -> Option<&HalfPage> {
        if self.base.id() == id {
            return Some(&self.base);
        }
        self.pushed.iter().map(|e| &e.page).find(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: PageId) -> Option<&mut HalfPage> {
        if self.base.id() == id {
            return Some(&mut self.base);
        }
        self.pushed.iter_mut().map(|e| &mut e.page).find(|p| p.id() == id)
    }

    /// Every page on the stack, base first
    pub fn pages(&self) -> impl Iterator<Item = &HalfPage> {
        std::iter::once(&self.base).chain(self.pushed.iter().map(|e| &e.page))
    }

    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut HalfPage> {
        std::iter::once(&mut self.base).chain(self.pushed.iter_mut().map(|e| &mut e.page))
    }

    pub fn contains_kind(&self, kind: PageKind) -> bool {
        self.pages().any(|p| p.kind() == kind)
    }
}

/// Full-screen pages masking both halves while non-empty
#[derive(Debug, Default)]
pub struct OverlayStack {
    entries: Vec<OverlayPage>,
}

impl OverlayStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, page: OverlayPage) {
        debug!("overlay push {}", page.kind().name());
        self.entries.push(page);
    }

    pub fn pop(&mut self) -> Result<OverlayPage, PageError> {
        debug_assert!(!self.entries.is_empty(), "overlay pop on an empty stack");
        self.entries.pop().ok_or_else(|| {
            error!("overlay pop on an empty stack");
            PageError::OverlayStackEmpty
        })
    }

    pub fn contains(&self, kind: OverlayKind) -> bool {
        self.entries.iter().any(|o| o.kind() == kind)
    }

    /// Take out the overlay of `kind` wherever it sits in the stack
    pub fn remove(&mut self, kind: OverlayKind) -> Option<OverlayPage> {
        let index = self.entries.iter().position(|o| o.kind() == kind)?;
        debug!("overlay remove {}", kind.name());
        Some(self.entries.remove(index))
    }

    pub fn top(&self) -> Option<&OverlayPage> {
        self.entries.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut OverlayPage> {
        self.entries.last_mut()
    }

    pub fn kinds(&self) -> impl Iterator<Item = OverlayKind> + '_ {
        self.entries.iter().map(|o| o.kind())
    }
}
