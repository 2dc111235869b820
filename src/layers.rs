use crate::types::{Category, SampleCollection, SampledPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Show/hide state per category layer. Starts with every layer visible.
///
/// The sample itself is never filtered in place; renderers ask
/// [`visible_points`] for what to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerVisibility {
    layers: BTreeMap<Category, bool>,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            layers: Category::ALL.iter().map(|c| (*c, true)).collect(),
        }
    }
}

impl LayerVisibility {
    pub fn from_hidden(hidden: &[Category]) -> Self {
        let mut visibility = Self::default();
        for category in hidden {
            visibility.set(*category, false);
        }
        visibility
    }

    pub fn is_visible(&self, category: Category) -> bool {
        self.layers.get(&category).copied().unwrap_or(true)
    }

    pub fn set(&mut self, category: Category, visible: bool) {
        self.layers.insert(category, visible);
    }

    /// Flips one layer and returns its new state.
    pub fn toggle(&mut self, category: Category) -> bool {
        let visible = !self.is_visible(category);
        self.set(category, visible);
        visible
    }

    pub fn visible_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.is_visible(*c))
            .collect()
    }
}

pub fn visible_points<'a>(
    collection: &'a SampleCollection,
    visibility: &'a LayerVisibility,
) -> impl Iterator<Item = &'a SampledPoint> + 'a {
    collection
        .iter()
        .filter(move |p| visibility.is_visible(p.category))
}
