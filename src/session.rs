use crate::catalog::{CategoryDescriptor, CATEGORY_DESCRIPTORS, MAP_CENTER, MAP_DEFAULT_ZOOM};
use crate::layers::{visible_points, LayerVisibility};
use crate::sampling::{generate, generate_with, UniformSource};
use crate::statistics::{aggregate, StatisticsTable};
use crate::types::{SampleCollection, SampledPoint};
use std::sync::Arc;
use tracing::info;

/// One application session: the sample is generated once and every view
/// (map, charts, tables) reads that same instance.
#[derive(Debug, Clone)]
pub struct Session {
    samples: Arc<SampleCollection>,
    statistics: StatisticsTable,
    layers: LayerVisibility,
}

/// What a map widget needs to draw the session's sample.
#[derive(Debug, Clone)]
pub struct MapScene<'a> {
    pub samples: Arc<SampleCollection>,
    pub descriptors: &'static [CategoryDescriptor],
    pub layers: &'a LayerVisibility,
    pub center: (f64, f64),
    pub zoom: u8,
}

impl MapScene<'_> {
    pub fn visible(&self) -> impl Iterator<Item = &SampledPoint> + '_ {
        visible_points(&self.samples, self.layers)
    }
}

impl Session {
    pub fn new() -> Self {
        Self::from_collection(generate())
    }

    pub fn with_source<S: UniformSource + ?Sized>(source: &mut S) -> Self {
        Self::from_collection(generate_with(source))
    }

    /// Wraps an existing sample, e.g. one read back from an export.
    pub fn from_collection(samples: SampleCollection) -> Self {
        let statistics = aggregate(&samples);
        info!(
            "Session sample ready: {} points ({:.3}% of baseline)",
            samples.len(),
            statistics.sample_fraction_percent()
        );
        Self {
            samples: Arc::new(samples),
            statistics,
            layers: LayerVisibility::default(),
        }
    }

    pub fn with_layers(mut self, layers: LayerVisibility) -> Self {
        self.layers = layers;
        self
    }

    pub fn samples(&self) -> Arc<SampleCollection> {
        Arc::clone(&self.samples)
    }

    pub fn statistics(&self) -> &StatisticsTable {
        &self.statistics
    }

    pub fn layers(&self) -> &LayerVisibility {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut LayerVisibility {
        &mut self.layers
    }

    pub fn map_scene(&self) -> MapScene<'_> {
        MapScene {
            samples: self.samples(),
            descriptors: &CATEGORY_DESCRIPTORS,
            layers: &self.layers,
            center: MAP_CENTER,
            zoom: MAP_DEFAULT_ZOOM,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
