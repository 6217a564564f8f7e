/*
 *  pages/layout.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed left/right screen split
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

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::input::Side;

/// Display geometry, split down the middle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSplit {
    /// Display width in pixels (even)
    pub width: u32,

    /// Display height in pixels
    pub height: u32,
}

impl Default for ScreenSplit {
    fn default() -> Self {
        Self {
            width: 256,
            height: 64,
        }
    }
}

impl ScreenSplit {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn full(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(self.width, self.height))
    }

    pub fn half(&self, side: Side) -> Rectangle {
        let half = self.width / 2;
        let x = match side {
            Side::Left => 0,
            Side::Right => half as i32,
        };
        Rectangle::new(Point::new(x, 0), Size::new(half, self.height))
    }
}

/// Who is drawn where, for the external renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub area: Rectangle,
    pub page: String,
}
