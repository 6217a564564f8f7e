/*
 *  pages/error.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the page core
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

use thiserror::Error;

use crate::input::Side;
use super::page::{PageId, PageKind};

/// Precondition violations - the catalog and the displayed state have
/// drifted apart, or a caller skipped the check it was meant to make.
///
/// None of these are recovered from inside the core; the operation is
/// rejected and the error handed back to whoever drives the event loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    /// Pop attempted with only the base entry left
    #[error("cannot pop the base page of the {0} stack")]
    BaseEntryPop(Side),

    /// Pop attempted on an empty overlay stack
    #[error("overlay stack is empty")]
    OverlayStackEmpty,

    /// A page kind was looked up in a tree that does not list it
    #[error("page kind {0:?} is not in the catalog")]
    KindNotInCatalog(PageKind),

    /// A tree with no categories was handed to a controller
    #[error("page catalog has no entries")]
    EmptyCatalog,

    /// A page id was not found where it was expected
    #[error("page {0} is not on the {1} stack")]
    UnknownPage(PageId, Side),
}
