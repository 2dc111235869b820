//! Fixed reference data shared by the sampler, the statistics and the
//! renderers.

use crate::types::{Borough, Category};
use geo::{Coord, Point, Rect};

/// Fraction of each baseline that is drawn into the sample.
pub const SAMPLE_RATE: f64 = 0.025;

/// Initial map view: longitude, latitude.
pub const MAP_CENTER: (f64, f64) = (-73.935242, 40.730610);
pub const MAP_DEFAULT_ZOOM: u8 = 10;

/// Assumed real-world facility counts for one borough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoroughBaseline {
    pub schools: u32,
    pub supermarkets: u32,
    pub police: u32,
    pub parks: u32,
}

impl BoroughBaseline {
    pub const fn count(&self, category: Category) -> u32 {
        match category {
            Category::Schools => self.schools,
            Category::Supermarkets => self.supermarkets,
            Category::Police => self.police,
            Category::Parks => self.parks,
        }
    }

    pub const fn total(&self) -> u32 {
        self.schools + self.supermarkets + self.police + self.parks
    }
}

/// Centre of a borough and the side of the square its points are jittered in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoAnchor {
    pub lat: f64,
    pub lng: f64,
    pub spread: f64,
}

impl GeoAnchor {
    pub fn center(&self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }

    /// The square every generated point for this anchor falls in.
    pub fn bounds(&self) -> Rect<f64> {
        let half = self.spread / 2.0;
        Rect::new(
            Coord { x: self.lng - half, y: self.lat - half },
            Coord { x: self.lng + half, y: self.lat + half },
        )
    }
}

impl Borough {
    pub const fn baseline(self) -> BoroughBaseline {
        match self {
            Borough::Brooklyn => BoroughBaseline { schools: 685, supermarkets: 1240, police: 23, parks: 532 },
            Borough::Queens => BoroughBaseline { schools: 456, supermarkets: 890, police: 16, parks: 378 },
            Borough::Manhattan => BoroughBaseline { schools: 287, supermarkets: 645, police: 22, parks: 156 },
        }
    }

    pub const fn anchor(self) -> GeoAnchor {
        match self {
            Borough::Brooklyn => GeoAnchor { lat: 40.6782, lng: -73.9442, spread: 0.08 },
            Borough::Queens => GeoAnchor { lat: 40.7282, lng: -73.8648, spread: 0.12 },
            Borough::Manhattan => GeoAnchor { lat: 40.7831, lng: -73.9665, spread: 0.04 },
        }
    }
}

/// Sum of every baseline across all boroughs and categories.
pub fn total_baseline() -> u32 {
    Borough::ALL.iter().map(|b| b.baseline().total()).sum()
}

/// Styling and labelling for one category, shared by map layers and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDescriptor {
    pub category: Category,
    pub name: &'static str,
    pub color: &'static str, // Hex code
    pub description: &'static str,
}

pub static CATEGORY_DESCRIPTORS: [CategoryDescriptor; 4] = [
    CategoryDescriptor {
        category: Category::Schools,
        name: "Schools",
        color: "#3B82F6",
        description: "Educational institutions including elementary, middle, and high schools",
    },
    CategoryDescriptor {
        category: Category::Supermarkets,
        name: "Supermarkets",
        color: "#10B981",
        description: "Grocery stores and food markets",
    },
    CategoryDescriptor {
        category: Category::Police,
        name: "Police Stations",
        color: "#EF4444",
        description: "Police precincts and law enforcement facilities",
    },
    CategoryDescriptor {
        category: Category::Parks,
        name: "Parks",
        color: "#22C55E",
        description: "Public parks and recreational areas",
    },
];

impl Category {
    pub fn descriptor(self) -> &'static CategoryDescriptor {
        &CATEGORY_DESCRIPTORS[self.index()]
    }
}
