/*
 *  facility.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Facility (waypoint) records and the navigation database seam
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

use serde::{Deserialize, Serialize};

/// Facility type - decides which waypoint pages can show it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacilityKind {
    Airport,
    Vor,
    Ndb,
    Intersection,
    User,
}

/// A navigation database record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub ident: String,
    #[serde(default)]
    pub name: String,
    pub kind: FacilityKind,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl Facility {
    pub fn new(ident: impl Into<String>, name: impl Into<String>, kind: FacilityKind) -> Self {
        Self {
            ident: ident.into(),
            name: name.into(),
            kind,
            lat: 0.0,
            lon: 0.0,
        }
    }

    /// Builder: set position
    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.lat = lat;
        self.lon = lon;
        self
    }
}

/// Narrow view of the navigation engine's database
///
/// The page core only ever asks two questions: "what matches this ident"
/// and "what facilities of this type exist" (for scanning).
pub trait FacilityDatabase {
    /// All facilities whose ident matches exactly (case-insensitive)
    fn find(&self, ident: &str) -> Vec<Facility>;

    /// All facilities of a type, in database order
    fn all_of(&self, kind: FacilityKind) -> Vec<Facility>;

    /// First facility of a type, used to seed waypoint pages
    fn first_of(&self, kind: FacilityKind) -> Option<Facility> {
        self.all_of(kind).into_iter().next()
    }

    /// Facility `step` positions away from `current` among those of the same
    /// type, wrapping at either end
    fn step_from(&self, current: &Facility, step: i32) -> Option<Facility> {
        let all = self.all_of(current.kind);
        if all.is_empty() {
            return None;
        }
        let here = all.iter().position(|f| f.ident == current.ident).unwrap_or(0);
        let next = (here as i64 + step as i64).rem_euclid(all.len() as i64) as usize;
        all.into_iter().nth(next)
    }
}

/// In-memory database loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticDatabase {
    facilities: Vec<Facility>,
}

impl StaticDatabase {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    /// Small built-in set, used when nothing is configured.
    /// PAE and OLM are deliberately duplicated across types.
    pub fn demo() -> Self {
        Self::new(vec![
            Facility::new("KSEA", "SEATTLE-TACOMA INTL", FacilityKind::Airport).at(47.449, -122.309),
            Facility::new("KBFI", "BOEING FIELD", FacilityKind::Airport).at(47.530, -122.302),
            Facility::new("KPAE", "SNOHOMISH CO", FacilityKind::Airport).at(47.906, -122.282),
            Facility::new("KOLM", "OLYMPIA", FacilityKind::Airport).at(46.969, -122.903),
            Facility::new("SEA", "SEATTLE", FacilityKind::Vor).at(47.435, -122.310),
            Facility::new("PAE", "PAINE", FacilityKind::Vor).at(47.920, -122.278),
            Facility::new("OLM", "OLYMPIA", FacilityKind::Vor).at(46.971, -122.902),
            Facility::new("PAE", "PAINE", FacilityKind::Ndb).at(47.911, -122.281),
            Facility::new("BF", "NOLLA", FacilityKind::Ndb).at(47.590, -122.320),
            Facility::new("JAWBN", "", FacilityKind::Intersection).at(47.650, -122.400),
            Facility::new("OLM", "USER OLM", FacilityKind::User).at(46.980, -122.880),
            Facility::new("HOME", "USER HOME", FacilityKind::User).at(47.600, -122.330),
        ])
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }
}

impl FacilityDatabase for StaticDatabase {
    fn find(&self, ident: &str) -> Vec<Facility> {
        let wanted = ident.trim();
        self.facilities
            .iter()
            .filter(|f| f.ident.eq_ignore_ascii_case(wanted))
            .cloned()
            .collect()
    }

    fn all_of(&self, kind: FacilityKind) -> Vec<Facility> {
        self.facilities.iter().filter(|f| f.kind == kind).cloned().collect()
    }
}
