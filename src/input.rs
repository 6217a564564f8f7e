/*
 *  input.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Input vocabulary - knob clicks, button presses and keyboard characters
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
use std::str::FromStr;
use thiserror::Error;

/// Physical half of the display (and the knob set beneath it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first - the order enter/clear are offered in
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "L"),
            Side::Right => write!(f, "R"),
        }
    }
}

/// Knob rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Signed step used by the index arithmetic (-1 / +1)
    pub fn step(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "Left"),
            Direction::Right => write!(f, "Right"),
        }
    }
}

/// One discrete input event, delivered strictly one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    CursorToggle(Side),
    OuterKnob(Side, Direction),
    InnerKnob(Side, Direction),
    Enter,
    Clear,
    Message,
    DirectTo,
    Alt,
    ScanToggle,
    ScanKnob(Direction),
    ApprArm,
    /// Free text entry, routed through the keyboard-to-cursor adapter
    Keyboard(Side, char),
}

/// Errors raised while parsing textual events (scripts, stdin)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputParseError {
    #[error("empty input event")]
    Empty,
    #[error("unknown input event: {0}")]
    Unknown(String),
    #[error("missing or bad side in '{0}' (expected L or R)")]
    BadSide(String),
    #[error("missing or bad knob direction in '{0}' (expected Left or Right)")]
    BadDirection(String),
    #[error("keyboard event needs exactly one character: '{0}'")]
    BadKey(String),
}

fn parse_side(text: &str, event: &str) -> Result<Side, InputParseError> {
    match text.trim() {
        "L" | "l" => Ok(Side::Left),
        "R" | "r" => Ok(Side::Right),
        _ => Err(InputParseError::BadSide(event.to_string())),
    }
}

fn parse_direction(text: Option<&str>, event: &str) -> Result<Direction, InputParseError> {
    match text.map(str::trim) {
        Some("Left") | Some("left") | Some("-") => Ok(Direction::Left),
        Some("Right") | Some("right") | Some("+") => Ok(Direction::Right),
        _ => Err(InputParseError::BadDirection(event.to_string())),
    }
}

impl FromStr for InputEvent {
    type Err = InputParseError;

    /// Parses the textual form used by event scripts, e.g. `OuterKnobL:Right`,
    /// `CursorToggleR`, `ScanKnob:Left` or `KeyboardL:K`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InputParseError::Empty);
        }

        // keyboard first, the key itself may be a ':'
        if let Some(rest) = s.strip_prefix("Keyboard") {
            let (side, key) = rest
                .split_once(':')
                .ok_or_else(|| InputParseError::BadKey(s.to_string()))?;
            let side = parse_side(side, s)?;
            let mut chars = key.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(InputEvent::Keyboard(side, c)),
                _ => Err(InputParseError::BadKey(s.to_string())),
            };
        }

        let (head, arg) = match s.split_once(':') {
            Some((head, arg)) => (head.trim(), Some(arg)),
            None => (s, None),
        };

        let event = match head {
            "Enter" => InputEvent::Enter,
            "Clear" => InputEvent::Clear,
            "Message" => InputEvent::Message,
            "DirectTo" => InputEvent::DirectTo,
            "Alt" => InputEvent::Alt,
            "ScanToggle" => InputEvent::ScanToggle,
            "ApprArm" => InputEvent::ApprArm,
            "ScanKnob" => InputEvent::ScanKnob(parse_direction(arg, s)?),
            _ => {
                if let Some(side) = head.strip_prefix("CursorToggle") {
                    InputEvent::CursorToggle(parse_side(side, s)?)
                } else if let Some(side) = head.strip_prefix("OuterKnob") {
                    InputEvent::OuterKnob(parse_side(side, s)?, parse_direction(arg, s)?)
                } else if let Some(side) = head.strip_prefix("InnerKnob") {
                    InputEvent::InnerKnob(parse_side(side, s)?, parse_direction(arg, s)?)
                } else {
                    return Err(InputParseError::Unknown(s.to_string()));
                }
            }
        };
        Ok(event)
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEvent::CursorToggle(side) => write!(f, "CursorToggle{}", side),
            InputEvent::OuterKnob(side, dir) => write!(f, "OuterKnob{}:{}", side, dir),
            InputEvent::InnerKnob(side, dir) => write!(f, "InnerKnob{}:{}", side, dir),
            InputEvent::Enter => write!(f, "Enter"),
            InputEvent::Clear => write!(f, "Clear"),
            InputEvent::Message => write!(f, "Message"),
            InputEvent::DirectTo => write!(f, "DirectTo"),
            InputEvent::Alt => write!(f, "Alt"),
            InputEvent::ScanToggle => write!(f, "ScanToggle"),
            InputEvent::ScanKnob(dir) => write!(f, "ScanKnob:{}", dir),
            InputEvent::ApprArm => write!(f, "ApprArm"),
            InputEvent::Keyboard(side, key) => write!(f, "Keyboard{}:{}", side, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_side_qualified_events() {
        assert_eq!("CursorToggleL".parse(), Ok(InputEvent::CursorToggle(Side::Left)));
        assert_eq!(
            "OuterKnobR:Left".parse(),
            Ok(InputEvent::OuterKnob(Side::Right, Direction::Left))
        );
        assert_eq!(
            "InnerKnobL:+".parse(),
            Ok(InputEvent::InnerKnob(Side::Left, Direction::Right))
        );
        assert_eq!("ScanKnob:Right".parse(), Ok(InputEvent::ScanKnob(Direction::Right)));
    }

    #[test]
    fn test_parse_keyboard_accepts_colon_key() {
        assert_eq!("KeyboardR:K".parse(), Ok(InputEvent::Keyboard(Side::Right, 'K')));
        assert_eq!("KeyboardL::".parse(), Ok(InputEvent::Keyboard(Side::Left, ':')));
        assert_eq!(
            "KeyboardL:AB".parse::<InputEvent>(),
            Err(InputParseError::BadKey("KeyboardL:AB".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<InputEvent>(), Err(InputParseError::Empty));
        assert!(matches!("Bogus".parse::<InputEvent>(), Err(InputParseError::Unknown(_))));
        assert!(matches!("OuterKnobX:Left".parse::<InputEvent>(), Err(InputParseError::BadSide(_))));
        assert!(matches!("OuterKnobL".parse::<InputEvent>(), Err(InputParseError::BadDirection(_))));
    }

    #[test]
    fn test_display_matches_parse_form() {
        let events = [
            InputEvent::OuterKnob(Side::Left, Direction::Right),
            InputEvent::Keyboard(Side::Right, 'Z'),
            InputEvent::ScanKnob(Direction::Left),
            InputEvent::ApprArm,
        ];
        for event in events {
            assert_eq!(event.to_string().parse::<InputEvent>(), Ok(event));
        }
    }
}
