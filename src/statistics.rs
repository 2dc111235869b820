use crate::catalog::total_baseline;
use crate::types::{Borough, Category, SampleCollection};
use serde::Serialize;

const CATEGORIES: usize = Category::ALL.len();
const BOROUGHS: usize = Borough::ALL.len();

/// Per-category counts for one borough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoroughCounts {
    counts: [usize; CATEGORIES],
}

impl BoroughCounts {
    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Percentage share of each category, in category order. Zero totals
    /// give zero shares.
    pub fn proportions(&self) -> Vec<(Category, f64)> {
        shares(Category::ALL.map(|c| self.count(c)))
    }
}

/// Counts derived from a [`SampleCollection`]. Recompute it from the
/// collection; it is never edited independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsTable {
    boroughs: [BoroughCounts; BOROUGHS],
}

/// One line of the "real data vs sample" comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub borough: Borough,
    pub category: Category,
    pub baseline: u32,
    pub sampled: usize,
    pub sample_rate_percent: f64,
}

/// Counts every point into its (borough, category) cell.
pub fn aggregate(collection: &SampleCollection) -> StatisticsTable {
    let mut table = StatisticsTable::default();
    for point in collection {
        table.boroughs[point.borough.index()].counts[point.category.index()] += 1;
    }
    table
}

impl StatisticsTable {
    pub fn borough(&self, borough: Borough) -> &BoroughCounts {
        &self.boroughs[borough.index()]
    }

    pub fn count(&self, borough: Borough, category: Category) -> usize {
        self.borough(borough).count(category)
    }

    pub fn total(&self, borough: Borough) -> usize {
        self.borough(borough).total()
    }

    /// Count for a category summed over all boroughs.
    pub fn category_total(&self, category: Category) -> usize {
        self.boroughs.iter().map(|b| b.count(category)).sum()
    }

    pub fn grand_total(&self) -> usize {
        self.boroughs.iter().map(BoroughCounts::total).sum()
    }

    pub fn proportions(&self, borough: Borough) -> Vec<(Category, f64)> {
        self.borough(borough).proportions()
    }

    pub fn overall_proportions(&self) -> Vec<(Category, f64)> {
        shares(Category::ALL.map(|c| self.category_total(c)))
    }

    pub fn comparison(&self) -> Vec<ComparisonRow> {
        let mut rows = Vec::with_capacity(BOROUGHS * CATEGORIES);
        for borough in Borough::ALL {
            let baselines = borough.baseline();
            for category in Category::ALL {
                let baseline = baselines.count(category);
                let sampled = self.count(borough, category);
                rows.push(ComparisonRow {
                    borough,
                    category,
                    baseline,
                    sampled,
                    sample_rate_percent: percent(sampled, baseline as usize),
                });
            }
        }
        rows
    }

    /// Share of the summed baselines that made it into the sample, in percent.
    pub fn sample_fraction_percent(&self) -> f64 {
        percent(self.grand_total(), total_baseline() as usize)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn shares(values: [usize; CATEGORIES]) -> Vec<(Category, f64)> {
    let total: usize = values.iter().sum();
    Category::ALL
        .iter()
        .zip(values)
        .map(|(c, v)| (*c, percent(v, total)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SAMPLE_RATE;
    use crate::sampling::{generate, sample_size};

    #[test]
    fn empty_collection_is_all_zero() {
        let table = aggregate(&SampleCollection::default());
        for borough in Borough::ALL {
            for category in Category::ALL {
                assert_eq!(table.count(borough, category), 0);
            }
            assert_eq!(table.total(borough), 0);
            assert!(table.proportions(borough).iter().all(|(_, share)| *share == 0.0));
        }
        assert_eq!(table.grand_total(), 0);
        assert_eq!(table.sample_fraction_percent(), 0.0);
    }

    #[test]
    fn aggregate_matches_generation_formula() {
        let table = aggregate(&generate());
        for borough in Borough::ALL {
            let mut expected_total = 0;
            for category in Category::ALL {
                let expected = sample_size(borough.baseline().count(category), SAMPLE_RATE);
                assert_eq!(table.count(borough, category), expected);
                expected_total += expected;
            }
            assert_eq!(table.total(borough), expected_total);
        }
        assert_eq!(table.total(Borough::Brooklyn), 62);
        assert_eq!(table.total(Borough::Queens), 43);
        assert_eq!(table.total(Borough::Manhattan), 28);
    }

    #[test]
    fn category_totals_span_boroughs() {
        let table = aggregate(&generate());
        assert_eq!(table.category_total(Category::Schools), 17 + 11 + 7);
        assert_eq!(table.category_total(Category::Police), 3);
        assert_eq!(table.grand_total(), 133);
    }

    #[test]
    fn proportions_sum_to_one_hundred() {
        let table = aggregate(&generate());
        let sum: f64 = table.proportions(Borough::Queens).iter().map(|(_, s)| s).sum();
        assert!((sum - 100.0).abs() < 1e-9);

        let overall = table.overall_proportions();
        assert_eq!(overall[0].0, Category::Schools);
        assert!((overall[0].1 - 35.0 / 133.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn comparison_reports_effective_rate() {
        let rows = aggregate(&generate()).comparison();
        assert_eq!(rows.len(), 12);

        let first = &rows[0];
        assert_eq!((first.borough, first.category), (Borough::Brooklyn, Category::Schools));
        assert_eq!(first.baseline, 685);
        assert_eq!(first.sampled, 17);
        assert!((first.sample_rate_percent - 17.0 / 685.0 * 100.0).abs() < 1e-9);

        let police = rows
            .iter()
            .find(|r| r.borough == Borough::Queens && r.category == Category::Police)
            .unwrap();
        assert_eq!(police.sampled, 1);
        assert!((police.sample_rate_percent - 6.25).abs() < 1e-9);
    }

    #[test]
    fn sample_fraction_against_all_baselines() {
        let table = aggregate(&generate());
        assert!((table.sample_fraction_percent() - 133.0 / 5330.0 * 100.0).abs() < 1e-9);
    }
}
