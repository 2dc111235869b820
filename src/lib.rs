//! Stratified synthetic amenity samples (schools, supermarkets, police
//! stations, parks) for Brooklyn, Queens and Manhattan, plus the summaries,
//! GeoJSON and map tiles built from them.

pub mod catalog;
pub mod config;
pub mod export;
pub mod layers;
pub mod render;
pub mod report;
pub mod sampling;
pub mod session;
pub mod statistics;
pub mod types;

pub use catalog::SAMPLE_RATE;
pub use sampling::{generate, generate_with, UniformSource};
pub use session::Session;
pub use statistics::{aggregate, StatisticsTable};
pub use types::{Borough, Category, SampleCollection, SampledPoint};
