use crate::catalog::{GeoAnchor, SAMPLE_RATE};
use crate::types::{Borough, Category, SampleCollection, SampledPoint};
use geo::Point;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

/// A source of uniform draws in `[0, 1)`.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;
}

/// Adapts any `rand` generator into a [`UniformSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        RngSource(rand::thread_rng())
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SequenceError {
    #[error("a replay sequence needs at least one value")]
    Empty,
    #[error("replay value {value} at position {position} is outside [0, 1)")]
    OutOfRange { position: usize, value: f64 },
}

/// Replays a fixed list of draws, starting over when it runs out.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Result<Self, SequenceError> {
        if values.is_empty() {
            return Err(SequenceError::Empty);
        }
        if let Some((position, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..1.0).contains(*v))
        {
            return Err(SequenceError::OutOfRange { position, value });
        }
        Ok(Self { values, cursor: 0 })
    }
}

impl UniformSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

/// Points drawn for a stratum: `max(1, round(baseline * rate))`.
pub fn sample_size(baseline: u32, rate: f64) -> usize {
    ((f64::from(baseline) * rate).round() as usize).max(1)
}

/// Total points one generation run produces with the fixed baselines.
pub fn expected_total() -> usize {
    Borough::ALL
        .iter()
        .flat_map(|b| Category::ALL.iter().map(move |c| (*b, *c)))
        .map(|(b, c)| sample_size(b.baseline().count(c), SAMPLE_RATE))
        .sum()
}

/// Generates a stratified sample using the thread-local RNG.
pub fn generate() -> SampleCollection {
    generate_with(&mut RngSource::thread())
}

/// Generates a stratified sample drawing every coordinate from `source`.
///
/// The shape (which strata exist and how many points each holds) depends only
/// on the fixed baselines; `source` decides positions.
pub fn generate_with<S: UniformSource + ?Sized>(source: &mut S) -> SampleCollection {
    let mut points = Vec::with_capacity(expected_total());

    for borough in Borough::ALL {
        let baseline = borough.baseline();
        let anchor = borough.anchor();

        for category in Category::ALL {
            let size = sample_size(baseline.count(category), SAMPLE_RATE);
            generate_stratum(source, borough, category, &anchor, size, &mut points);
        }
    }

    debug!("Generated {} sample points", points.len());
    SampleCollection::new(points)
}

fn generate_stratum<S: UniformSource + ?Sized>(
    source: &mut S,
    borough: Borough,
    category: Category,
    anchor: &GeoAnchor,
    size: usize,
    out: &mut Vec<SampledPoint>,
) {
    let label = category.capitalized();

    for i in 0..size {
        out.push(SampledPoint {
            point: jitter_around(source, anchor),
            borough,
            category,
            name: format!("{} {}", label, i + 1),
            sample_id: format!("{}-{}-{}", borough, category, i),
        });
    }
}

// Latitude is drawn before longitude.
fn jitter_around<S: UniformSource + ?Sized>(source: &mut S, anchor: &GeoAnchor) -> Point<f64> {
    let lat = anchor.lat + (source.next_unit() - 0.5) * anchor.spread;
    let lng = anchor.lng + (source.next_unit() - 0.5) * anchor.spread;
    Point::new(lng, lat)
}
