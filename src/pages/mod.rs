/*
 *  pages/mod.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Page subsystem - fields, cursors, page trees, stacks and overlays
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

// Field protocol and the concrete fields
pub mod field;
pub mod field_kinds;
pub mod cursor;

// Pages and how they are found
pub mod page;
pub mod factory;
pub mod tree;

// Stacking and coordination
pub mod stack;
pub mod overlay;
pub mod layout;
pub mod main_page;

pub mod error;

// Re-export commonly used types
pub use error::PageError;
pub use field::{BoxedField, Command, Effect, EnterContext, EnterResult, Field};
pub use field_kinds::{ButtonField, ChoiceField, IdentField, ListRowField, NumberField, RowAction};
pub use cursor::CursorController;
pub use page::{HalfPage, PageId, PageKind, PageName};
pub use factory::{FlightPlan, PageContext, PageFactory};
pub use tree::{Category, PageTree, PageTreeController};
pub use stack::{OverlayStack, PageStack, PageStackEntry};
pub use overlay::{default_rules, OverlayKind, OverlayPage, OverlayRule, WIZARD_STEPS};
pub use layout::{Region, ScreenSplit};
pub use main_page::{DeviceState, MainPage, Message, Resolver, Sides};
