/*
 *  pages/main_page.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Main page - owns both sides and the overlays, routes every input event
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

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::config::Config;
use crate::facility::{Facility, FacilityDatabase};
use crate::input::{InputEvent, Side};
use super::error::PageError;
use super::factory::{FlightPlan, PageContext, PageFactory};
use super::field::{Command, Effect, EnterContext};
use super::layout::{Region, ScreenSplit};
use super::overlay::{default_rules, OverlayKind, OverlayPage, OverlayRule};
use super::page::{HalfPage, PageId, PageKind};
use super::stack::{OverlayStack, PageStack};
use super::tree::{PageTree, PageTreeController};

pub const LEFT_START_PAGE: PageKind = PageKind::Nav1;
pub const RIGHT_START_PAGE: PageKind = PageKind::Nav2;

/// A left/right pair
#[derive(Debug, Clone, Default)]
pub struct Sides<T> {
    pub left: T,
    pub right: T,
}

impl<T> Sides<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    pub received: DateTime<Local>,
    pub read: bool,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            received: Local::now(),
            read: false,
        }
    }
}

/// Unit state the pages read and the commands write
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    /// Stored plans, plan 0 is the active one (always present)
    pub plans: Vec<FlightPlan>,
    pub appr_armed: bool,
    pub direct_to: Option<Facility>,
    pub messages: Vec<Message>,
}

impl DeviceState {
    pub fn new(mut plans: Vec<FlightPlan>) -> Self {
        if plans.is_empty() {
            plans.push(FlightPlan::new());
        }
        Self {
            plans,
            ..Self::default()
        }
    }

    pub fn push_message(&mut self, text: impl Into<String>) {
        let message = Message::new(text);
        info!("message at {}: {}", message.received.format("%H:%M:%S"), message.text);
        self.messages.push(message);
    }

    pub fn unread(&self) -> usize {
        self.messages.iter().filter(|m| !m.read).count()
    }
}

/// A field's enter suspended on a chooser page
///
/// Completes exactly once with a `T`, or is abandoned when the chooser
/// disappears without a pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver<T> {
    pub side: Side,
    /// Page holding the suspended field
    pub page: PageId,
    pub field: usize,
    /// The chooser whose selection completes the enter
    pub chooser: PageId,
    resolves: PhantomData<fn(T)>,
}

impl<T> Resolver<T> {
    pub fn new(side: Side, page: PageId, field: usize, chooser: PageId) -> Self {
        Self {
            side,
            page,
            field,
            chooser,
            resolves: PhantomData,
        }
    }

    /// Would removing page `id` leave this resolution hanging?
    pub fn depends_on(&self, id: PageId) -> bool {
        self.page == id || self.chooser == id
    }
}

/// Where a batch of effects came from
#[derive(Debug, Clone, Copy)]
struct Origin {
    side: Option<Side>,
    page: Option<PageId>,
    field: Option<usize>,
}

impl Origin {
    fn overlay() -> Self {
        Self { side: None, page: None, field: None }
    }

    fn page(side: Side, page: PageId) -> Self {
        Self { side: Some(side), page: Some(page), field: None }
    }

    fn field(side: Side, page: PageId, field: Option<usize>) -> Self {
        Self { side: Some(side), page: Some(page), field }
    }
}

fn page_ctx<'a>(db: &'a dyn FacilityDatabase, state: &'a DeviceState) -> PageContext<'a> {
    PageContext::new(db, &state.plans)
}

/// Top-level coordinator
pub struct MainPage {
    stacks: Sides<PageStack>,
    overlays: OverlayStack,
    trees: Sides<PageTreeController>,
    factory: PageFactory,
    rules: Vec<OverlayRule>,
    pending: Option<Resolver<Facility>>,
    db: Box<dyn FacilityDatabase>,
    state: DeviceState,
    split: ScreenSplit,
    redraw: bool,
}

impl MainPage {
    pub fn new(
        left_tree: PageTree,
        right_tree: PageTree,
        db: Box<dyn FacilityDatabase>,
        state: DeviceState,
        split: ScreenSplit,
    ) -> Result<Self, PageError> {
        let mut factory = PageFactory::new();
        let left_tree = Arc::new(left_tree);
        let right_tree = Arc::new(right_tree);

        let ctx = page_ctx(db.as_ref(), &state);
        let left_page = factory.build(start_kind(&left_tree, LEFT_START_PAGE)?, &ctx);
        let right_page = factory.build(start_kind(&right_tree, RIGHT_START_PAGE)?, &ctx);

        let trees = Sides::new(
            PageTreeController::new(left_tree, &left_page)?,
            PageTreeController::new(right_tree, &right_page)?,
        );
        info!("start pages {} | {}", left_page.name(), right_page.name());
        let stacks = Sides::new(
            PageStack::new(Side::Left, left_page),
            PageStack::new(Side::Right, right_page),
        );

        let mut main = Self {
            stacks,
            overlays: OverlayStack::new(),
            trees,
            factory,
            rules: default_rules(),
            pending: None,
            db,
            state,
            split,
            redraw: true,
        };
        main.check_if_overlay_is_shown();
        Ok(main)
    }

    /// Catalog, database, plans and messages from the merged configuration
    pub fn from_config(config: &Config) -> Result<Self, PageError> {
        let interface = config.interface();
        let db = config.database();
        let plans: Vec<FlightPlan> = config
            .flight_plans()
            .iter()
            .map(|idents| {
                idents
                    .iter()
                    .filter_map(|ident| {
                        let hit = db.find(ident).into_iter().next();
                        if hit.is_none() {
                            warn!("flight plan waypoint {ident} not in database, skipped");
                        }
                        hit
                    })
                    .collect()
            })
            .collect();
        let mut state = DeviceState::new(plans);
        for text in config.messages() {
            state.push_message(text.as_str());
        }
        info!("{} facilities, {} flight plans", db.len(), state.plans.len());

        Self::new(
            PageTree::left(&interface),
            PageTree::right(&interface),
            Box::new(db),
            state,
            config.split(),
        )
    }

    /// Replace the overlay combination table
    pub fn with_rules(mut self, mut rules: Vec<OverlayRule>) -> Self {
        rules.retain(|rule| {
            if !rule.overlay.is_auto() {
                warn!("{} is opened explicitly, rule ignored", rule.overlay);
            }
            rule.overlay.is_auto()
        });
        self.rules = rules;
        self.check_if_overlay_is_shown();
        self
    }

    // ---- queries ----

    /// Page currently displayed on `side` (below any overlay)
    pub fn page(&self, side: Side) -> &HalfPage {
        self.stacks.get(side).top()
    }

    pub fn left_page_name(&self) -> &str {
        self.page(Side::Left).name()
    }

    pub fn right_page_name(&self) -> &str {
        self.page(Side::Right).name()
    }

    pub fn is_message_page_shown(&self) -> bool {
        self.overlay_kind() == Some(OverlayKind::MessageReview)
    }

    pub fn overlay_kind(&self) -> Option<OverlayKind> {
        self.overlays.top().map(|o| o.kind())
    }

    pub fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }

    pub fn stack(&self, side: Side) -> &PageStack {
        self.stacks.get(side)
    }

    pub fn tree(&self, side: Side) -> &PageTreeController {
        self.trees.get(side)
    }

    pub fn pending(&self) -> Option<&Resolver<Facility>> {
        self.pending.as_ref()
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut DeviceState {
        &mut self.state
    }

    /// Consume the redraw request
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    /// Which page occupies which part of the screen
    pub fn visible_regions(&self) -> Vec<Region> {
        match self.overlays.top() {
            Some(overlay) => vec![Region {
                area: self.split.full(),
                page: overlay.kind().name().to_string(),
            }],
            None => Side::BOTH
                .iter()
                .map(|side| Region {
                    area: self.split.half(*side),
                    page: self.page(*side).name().to_string(),
                })
                .collect(),
        }
    }

    // ---- page plumbing ----

    /// Build any page kind against the current unit state
    pub fn build_page(&mut self, kind: PageKind) -> HalfPage {
        let ctx = page_ctx(self.db.as_ref(), &self.state);
        self.factory.build(kind, &ctx)
    }

    /// Push a temporary page on `side`, tied to `parent` when given
    pub fn push_page(&mut self, side: Side, page: HalfPage, parent: Option<PageId>) {
        info!("{} shows {}", side, page.name());
        self.stacks.get_mut(side).push(page, parent);
        self.check_if_overlay_is_shown();
        self.redraw = true;
    }

    /// Pop the top temporary page of `side` and everything depending on it
    pub fn pop_page(&mut self, side: Side) -> Result<HalfPage, PageError> {
        let page = self.stacks.get_mut(side).pop()?;
        info!("{} closed {}", side, page.name());
        self.cascade(page.id());
        self.check_if_overlay_is_shown();
        self.redraw = true;
        Ok(page)
    }

    /// Jump the base of `side` straight to `kind`
    pub fn show_base_kind(&mut self, side: Side, kind: PageKind) -> Result<(), PageError> {
        let ctx = page_ctx(self.db.as_ref(), &self.state);
        let page = self.factory.build(kind, &ctx);
        self.trees.get_mut(side).set_page(&page)?;
        self.install_base_page(side, page);
        Ok(())
    }

    fn install_base_page(&mut self, side: Side, page: HalfPage) {
        let stack = self.stacks.get_mut(side);
        let mut removed: Vec<PageId> = Vec::new();
        if !stack.is_base_shown() {
            warn!("{side} base replaced under temporary pages, closing them");
            removed.extend(stack.clear_to_base().iter().map(|p| p.id()));
        }
        removed.push(stack.set_current(page).id());
        for id in removed {
            self.cascade(id);
        }
        self.check_if_overlay_is_shown();
        self.redraw = true;
    }

    /// Remove everything opened for `removed`, on both sides, transitively
    fn cascade(&mut self, removed: PageId) {
        let mut work = vec![removed];
        while let Some(id) = work.pop() {
            if self.pending.as_ref().is_some_and(|p| p.depends_on(id)) {
                self.abandon_pending();
            }
            for side in Side::BOTH {
                for page in self.stacks.get_mut(side).remove_children(id) {
                    info!("{} closed {} with its parent", side, page.name());
                    work.push(page.id());
                }
            }
        }
    }

    fn abandon_pending(&mut self) {
        let Some(resolver) = self.pending.take() else {
            return;
        };
        warn!("pending lookup on {} page {} abandoned", resolver.side, resolver.page);
        if let Some(page) = self.stacks.get_mut(resolver.side).get_mut(resolver.page) {
            page.cursor_mut().abandon(resolver.field);
        }
    }

    /// Show or hide auto-derived overlays for the pages now on display.
    /// Idempotent: a second call without a page change does nothing.
    pub fn check_if_overlay_is_shown(&mut self) {
        let left = self.stacks.left.top().kind();
        let right = self.stacks.right.top().kind();

        let mut kinds: Vec<OverlayKind> = Vec::new();
        for rule in &self.rules {
            if !kinds.contains(&rule.overlay) {
                kinds.push(rule.overlay);
            }
        }
        for kind in kinds {
            let wanted = self.rules.iter().any(|r| r.overlay == kind && r.holds(left, right));
            let present = self.overlays.contains(kind);
            if wanted && !present {
                info!("overlay {kind} shown for {} | {}", left.name(), right.name());
                self.overlays.push(OverlayPage::new(kind));
                self.redraw = true;
            } else if !wanted && present {
                info!("overlay {kind} removed");
                self.overlays.remove(kind);
                self.redraw = true;
            }
        }
    }

    // ---- per-tick ----

    /// Advance whatever is visible: the overlay alone, or both halves
    pub fn tick(&mut self, blink: bool) {
        match self.overlays.top_mut() {
            Some(overlay) => overlay.tick(blink),
            None => {
                for side in Side::BOTH {
                    self.stacks.get_mut(side).top_mut().tick(blink);
                }
            }
        }
    }

    // ---- input ----

    /// Route one input event; true when something consumed it
    pub fn handle_event(&mut self, event: InputEvent) -> Result<bool, PageError> {
        debug!("event {event}");
        let handled = match event {
            InputEvent::Message => self.toggle_message_review(),
            InputEvent::ApprArm => {
                self.state.appr_armed = !self.state.appr_armed;
                info!("approach {}", if self.state.appr_armed { "armed" } else { "disarmed" });
                true
            }
            InputEvent::ScanToggle => self.stacks.right.top_mut().scan_toggle(),
            InputEvent::ScanKnob(direction) => self.scan_move(direction.step()),
            other if self.overlays.shown() => self.route_overlay(other)?,
            other => self.route_base(other)?,
        };
        if handled {
            self.redraw = true;
        } else {
            debug!("{event} not handled");
        }
        Ok(handled)
    }

    fn toggle_message_review(&mut self) -> bool {
        if self.overlays.remove(OverlayKind::MessageReview).is_some() {
            info!("message review closed");
            return true;
        }
        for message in self.state.messages.iter_mut() {
            message.read = true;
        }
        info!("message review, {} messages", self.state.messages.len());
        self.overlays.push(OverlayPage::new(OverlayKind::MessageReview));
        true
    }

    fn scan_move(&mut self, step: i32) -> bool {
        let db = self.db.as_ref();
        let page = self.stacks.right.top_mut();
        if !page.scan_move(step, db) {
            return false;
        }
        let ctx = page_ctx(db, &self.state);
        self.factory.reload(page, &ctx);
        true
    }

    fn route_overlay(&mut self, event: InputEvent) -> Result<bool, PageError> {
        let Some(overlay) = self.overlays.top_mut() else {
            return Ok(false);
        };
        let allows_tree = overlay.kind().allows_tree_knob();
        match event {
            InputEvent::CursorToggle(side) => Ok(overlay.cursor_mut(side).toggle_cursor()),
            InputEvent::OuterKnob(side, direction) => {
                if overlay.cursor(side).is_active() {
                    Ok(overlay.cursor_mut(side).outer(direction))
                } else if allows_tree {
                    self.tree_move_page(side, direction.step())
                } else {
                    Ok(false)
                }
            }
            InputEvent::InnerKnob(side, direction) => {
                if overlay.cursor(side).is_active() {
                    Ok(overlay.cursor_mut(side).inner(direction))
                } else if allows_tree {
                    self.tree_move_subpage(side, direction.step())
                } else {
                    Ok(false)
                }
            }
            InputEvent::Keyboard(side, key) => Ok(overlay.cursor_mut(side).keyboard(key)),
            InputEvent::Enter => self.overlay_enter(),
            InputEvent::Clear => self.overlay_clear(),
            InputEvent::DirectTo | InputEvent::Alt if allows_tree => self.route_base(event),
            _ => {
                warn!("{event} swallowed by overlay {}", overlay.kind());
                Ok(false)
            }
        }
    }

    fn overlay_enter(&mut self) -> Result<bool, PageError> {
        let Some(overlay) = self.overlays.top_mut() else {
            return Ok(false);
        };
        let mut ctx = EnterContext::new(self.db.as_ref());
        let mut handled = false;
        for side in Side::BOTH {
            if overlay.cursor(side).accepts_enter() {
                handled = overlay.cursor_mut(side).enter(&mut ctx).is_handled();
                break;
            }
        }
        if !handled {
            handled = overlay.page_enter(&mut ctx);
        }
        let effects = ctx.into_effects();
        self.apply_effects(Origin::overlay(), effects)?;
        Ok(handled)
    }

    fn overlay_clear(&mut self) -> Result<bool, PageError> {
        let Some(overlay) = self.overlays.top_mut() else {
            return Ok(false);
        };
        if overlay.cursor_mut(Side::Left).clear() || overlay.cursor_mut(Side::Right).clear() {
            return Ok(true);
        }
        let reviewing = overlay.kind() == OverlayKind::MessageReview;
        let mut ctx = EnterContext::new(self.db.as_ref());
        let handled = overlay.page_clear(&mut ctx);
        let effects = ctx.into_effects();
        if !handled && reviewing {
            return Ok(self.toggle_message_review());
        }
        self.apply_effects(Origin::overlay(), effects)?;
        Ok(handled)
    }

    fn route_base(&mut self, event: InputEvent) -> Result<bool, PageError> {
        match event {
            InputEvent::CursorToggle(side) => {
                let toggled = self.stacks.get_mut(side).top_mut().cursor_mut().toggle_cursor();
                if !toggled {
                    debug!("{side} page has no fields for the cursor");
                }
                Ok(toggled)
            }
            InputEvent::OuterKnob(side, direction) => {
                let page = self.stacks.get_mut(side).top_mut();
                if page.cursor().is_active() {
                    return Ok(page.cursor_mut().outer(direction));
                }
                self.tree_move_page(side, direction.step())
            }
            InputEvent::InnerKnob(side, direction) => {
                let page = self.stacks.get_mut(side).top_mut();
                if page.cursor().is_active() {
                    return Ok(page.cursor_mut().inner(direction));
                }
                self.tree_move_subpage(side, direction.step())
            }
            InputEvent::Keyboard(side, key) => {
                Ok(self.stacks.get_mut(side).top_mut().cursor_mut().keyboard(key))
            }
            InputEvent::Enter => self.base_enter(),
            InputEvent::Clear => self.base_clear(),
            InputEvent::DirectTo => self.toggle_temporary(Side::Right, PageKind::DirectTo),
            InputEvent::Alt => self.toggle_temporary(Side::Left, PageKind::Altitude),
            _ => Ok(false),
        }
    }

    fn tree_move_page(&mut self, side: Side, step: i32) -> Result<bool, PageError> {
        if !self.stacks.get(side).is_base_shown() {
            debug!("{side} knob swallowed, temporary page shown");
            return Ok(false);
        }
        let ctx = page_ctx(self.db.as_ref(), &self.state);
        let page = self.trees.get_mut(side).move_page(step, &mut self.factory, &ctx)?;
        self.install_base_page(side, page);
        Ok(true)
    }

    fn tree_move_subpage(&mut self, side: Side, step: i32) -> Result<bool, PageError> {
        if self.stacks.get(side).top().nested().is_some() {
            return self.nested_move_subpage(side, step);
        }
        if !self.stacks.get(side).is_base_shown() {
            debug!("{side} knob swallowed, temporary page shown");
            return Ok(false);
        }
        let ctx = page_ctx(self.db.as_ref(), &self.state);
        let tree = self.trees.get_mut(side);
        let page = self.stacks.get_mut(side).top_mut();
        let before = page.current_subpage();
        match tree.move_subpage(page, step, &mut self.factory, &ctx)? {
            Some(fresh) => {
                self.install_base_page(side, fresh);
                Ok(true)
            }
            None => Ok(page.current_subpage() != before),
        }
    }

    /// Inner knob on a page carrying its own tree (waypoint detail pages)
    fn nested_move_subpage(&mut self, side: Side, step: i32) -> Result<bool, PageError> {
        let db = self.db.as_ref();
        let stack = self.stacks.get_mut(side);
        let top = stack.top_mut();
        let Some(mut nested) = top.take_nested() else {
            return Ok(false);
        };
        let facility = top.facility().cloned();
        let ctx = page_ctx(db, &self.state).with_facility(facility.as_ref());
        let before = top.current_subpage();

        let replaced = match nested.move_subpage(top, step, &mut self.factory, &ctx) {
            Ok(Some(mut fresh)) => {
                fresh.set_nested(nested);
                stack.replace_top(fresh)
            }
            Ok(None) => {
                let moved = top.current_subpage() != before;
                top.set_nested(nested);
                return Ok(moved);
            }
            Err(e) => {
                top.set_nested(nested);
                return Err(e);
            }
        };
        info!("{} detail -> {}", side, self.stacks.get(side).top().name());
        self.cascade(replaced.id());
        self.check_if_overlay_is_shown();
        Ok(true)
    }

    fn base_enter(&mut self) -> Result<bool, PageError> {
        for side in Side::BOTH {
            if self.stacks.get(side).top().cursor().accepts_enter() {
                return self.field_enter(side);
            }
        }
        for side in Side::BOTH {
            let page = self.stacks.get_mut(side).top_mut();
            let mut ctx = EnterContext::new(self.db.as_ref());
            if page.page_enter(&mut ctx) {
                let origin = Origin::page(side, page.id());
                let effects = ctx.into_effects();
                self.apply_effects(origin, effects)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn field_enter(&mut self, side: Side) -> Result<bool, PageError> {
        let page = self.stacks.get_mut(side).top_mut();
        let origin = Origin::field(side, page.id(), page.cursor().focused_index());
        let mut ctx = EnterContext::new(self.db.as_ref());
        let result = page.cursor_mut().enter(&mut ctx);
        page.sync_facility();
        let effects = ctx.into_effects();
        debug!("{side} enter -> {result:?}, {} effects", effects.len());
        self.apply_effects(origin, effects)?;
        Ok(result.is_handled())
    }

    fn base_clear(&mut self) -> Result<bool, PageError> {
        for side in Side::BOTH {
            if self.stacks.get_mut(side).top_mut().cursor_mut().clear() {
                return Ok(true);
            }
        }
        for side in Side::BOTH {
            let stack = self.stacks.get(side);
            if !stack.is_base_shown() && stack.top().accepts_dismiss() {
                self.pop_page(side)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// D-> and ALT open their page, or close it when it is on top
    fn toggle_temporary(&mut self, side: Side, kind: PageKind) -> Result<bool, PageError> {
        let stack = self.stacks.get(side);
        if stack.top().kind() == kind {
            self.pop_page(side)?;
            return Ok(true);
        }
        if stack.contains_kind(kind) {
            warn!("{} already open under another page", kind.name());
            return Ok(false);
        }
        let seed = self
            .stacks
            .right
            .top()
            .facility()
            .or_else(|| self.stacks.left.top().facility())
            .or(self.state.direct_to.as_ref())
            .cloned();
        let ctx = page_ctx(self.db.as_ref(), &self.state).with_facility(seed.as_ref());
        let page = self.factory.build(kind, &ctx);
        self.push_page(side, page, None);
        Ok(true)
    }

    // ---- effects ----

    fn apply_effects(&mut self, origin: Origin, effects: Vec<Effect>) -> Result<(), PageError> {
        for effect in effects {
            match effect {
                Effect::Disambiguate { candidates } => self.open_disambiguation(origin, candidates),
                Effect::Resolve(facility) => self.resolve_pending(origin, facility)?,
                Effect::ShowWaypoint(facility) => self.show_waypoint(origin, &facility)?,
                Effect::Command(command) => self.run_command(origin, command)?,
            }
        }
        Ok(())
    }

    fn open_disambiguation(&mut self, origin: Origin, candidates: Vec<Facility>) {
        let (Some(side), Some(page), Some(field)) = (origin.side, origin.page, origin.field) else {
            warn!("ident lookup without an originating field, ignored");
            return;
        };
        if let Some(pending) = self.pending.as_ref() {
            warn!(
                "lookup already pending on {} page {}, second lookup refused",
                pending.side, pending.page
            );
            if let Some(page) = self.stacks.get_mut(side).get_mut(page) {
                page.cursor_mut().abandon(field);
            }
            return;
        }
        let chooser = self.factory.build_disambiguation(candidates);
        debug!("{} candidates for {side} page {page} field {field}", chooser.cursor().len());
        self.pending = Some(Resolver::new(side, page, field, chooser.id()));
        self.push_page(side, chooser, Some(page));
    }

    fn resolve_pending(&mut self, origin: Origin, facility: Facility) -> Result<(), PageError> {
        let Some(resolver) = self.pending.take() else {
            warn!("{} picked with no lookup pending", facility.ident);
            return Ok(());
        };
        if origin.page != Some(resolver.chooser) {
            warn!("{} picked outside the chooser, ignored", facility.ident);
            self.pending = Some(resolver);
            return Ok(());
        }
        if self.stacks.get(resolver.side).top().id() != resolver.chooser {
            return Err(PageError::UnknownPage(resolver.chooser, resolver.side));
        }
        self.pop_page(resolver.side)?;

        info!("{} resolved to {} ({:?})", resolver.side, facility.ident, facility.kind);
        if let Some(page) = self.stacks.get_mut(resolver.side).get_mut(resolver.page) {
            page.cursor_mut().resolve(resolver.field, facility);
            page.sync_facility();
        }
        Ok(())
    }

    fn show_waypoint(&mut self, origin: Origin, facility: &Facility) -> Result<(), PageError> {
        let side = origin.side.map(Side::other).unwrap_or(Side::Right);
        let ctx = page_ctx(self.db.as_ref(), &self.state);
        let page = self.factory.build_detail(facility, &ctx)?;

        let stack = self.stacks.get_mut(side);
        let same_parent = !stack.is_base_shown() && stack.top_parent() == origin.page;
        if same_parent && stack.top().nested().is_some() {
            info!("{} detail -> {} {}", side, page.name(), facility.ident);
            let old = stack.replace_top(page);
            self.cascade(old.id());
            self.check_if_overlay_is_shown();
            self.redraw = true;
        } else {
            self.push_page(side, page, origin.page);
        }
        Ok(())
    }

    fn run_command(&mut self, origin: Origin, command: Command) -> Result<(), PageError> {
        match command {
            Command::ActivateFlightPlan(index) => {
                let Some(plan) = self.state.plans.get(index).cloned() else {
                    warn!("no flight plan {index}");
                    return Ok(());
                };
                info!("flight plan {index} activated, {} waypoints", plan.len());
                self.state.plans[0] = plan;
                let ctx = page_ctx(self.db.as_ref(), &self.state);
                for side in Side::BOTH {
                    for page in self.stacks.get_mut(side).pages_mut() {
                        if matches!(page.kind(), PageKind::Act | PageKind::Fpl) {
                            self.factory.reload(page, &ctx);
                        }
                    }
                }
                self.redraw = true;
            }
            Command::ConfirmDirectTo => {
                let (Some(side), Some(id)) = (origin.side, origin.page) else {
                    return Ok(());
                };
                let target = self.stacks.get(side).get(id).and_then(|p| p.facility()).cloned();
                match target {
                    Some(facility) => {
                        info!("direct to {}", facility.ident);
                        self.state.direct_to = Some(facility);
                        let stack = self.stacks.get(side);
                        if !stack.is_base_shown() && stack.top().id() == id {
                            self.pop_page(side)?;
                        }
                    }
                    None => warn!("direct-to with no waypoint entered"),
                }
            }
            Command::FinishWizard => {
                info!("database wizard finished");
                self.show_base_kind(Side::Left, PageKind::Set1)?;
            }
        }
        Ok(())
    }
}

fn start_kind(tree: &PageTree, wanted: PageKind) -> Result<PageKind, PageError> {
    if tree.contains(wanted) {
        return Ok(wanted);
    }
    tree.kind_at(0, 0).ok_or(PageError::EmptyCatalog)
}
