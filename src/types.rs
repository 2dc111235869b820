use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("unknown borough identifier: {0:?}")]
    UnknownBorough(String),
    #[error("unknown category identifier: {0:?}")]
    UnknownCategory(String),
}

/// The three boroughs covered by the sample. Declaration order is the
/// generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Borough {
    Brooklyn,
    Queens,
    Manhattan,
}

impl Borough {
    pub const ALL: [Borough; 3] = [Borough::Brooklyn, Borough::Queens, Borough::Manhattan];

    pub const fn as_str(self) -> &'static str {
        match self {
            Borough::Brooklyn => "Brooklyn",
            Borough::Queens => "Queens",
            Borough::Manhattan => "Manhattan",
        }
    }

    /// Position in `Borough::ALL`, used to index fixed-size tables.
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Borough {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Borough::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| IdentifierError::UnknownBorough(s.to_string()))
    }
}

/// Facility types. Identifiers are lowercase and matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Schools,
    Supermarkets,
    Police,
    Parks,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Schools,
        Category::Supermarkets,
        Category::Police,
        Category::Parks,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Schools => "schools",
            Category::Supermarkets => "supermarkets",
            Category::Police => "police",
            Category::Parks => "parks",
        }
    }

    /// Identifier with its first letter upper-cased ("police" -> "Police").
    /// Point names are built from this, not from the descriptor's display name.
    pub fn capitalized(self) -> String {
        let id = self.as_str();
        let mut chars = id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| IdentifierError::UnknownCategory(s.to_string()))
    }
}

/// One generated amenity. `point` holds x = longitude, y = latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledPoint {
    pub point: Point<f64>,
    pub borough: Borough,
    pub category: Category,
    pub name: String,
    pub sample_id: String,
}

impl SampledPoint {
    pub fn longitude(&self) -> f64 {
        self.point.x()
    }

    pub fn latitude(&self) -> f64 {
        self.point.y()
    }
}

/// An immutable snapshot of one generation run, in generation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleCollection {
    points: Vec<SampledPoint>,
}

impl SampleCollection {
    pub fn new(points: Vec<SampledPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[SampledPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SampledPoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points of a single (borough, category) stratum.
    pub fn stratum(
        &self,
        borough: Borough,
        category: Category,
    ) -> impl Iterator<Item = &SampledPoint> + '_ {
        self.points
            .iter()
            .filter(move |p| p.borough == borough && p.category == category)
    }
}

impl<'a> IntoIterator for &'a SampleCollection {
    type Item = &'a SampledPoint;
    type IntoIter = std::slice::Iter<'a, SampledPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
