use borough_sampler::catalog::SAMPLE_RATE;
use borough_sampler::export::{read_geojson, write_geojson};
use borough_sampler::sampling::{expected_total, sample_size, SequenceSource};
use borough_sampler::{aggregate, generate, Borough, Category, Session};
use std::collections::HashSet;

#[test]
fn aggregate_of_generate_matches_stratum_formula() {
    let table = aggregate(&generate());
    for borough in Borough::ALL {
        for category in Category::ALL {
            let expected = sample_size(borough.baseline().count(category), SAMPLE_RATE);
            assert_eq!(table.count(borough, category), expected, "{borough} {category}");
        }
    }
    assert_eq!(table.count(Borough::Brooklyn, Category::Schools), 17);
    assert_eq!(table.count(Borough::Manhattan, Category::Police), 1);
    assert_eq!(table.grand_total(), expected_total());
}

#[test]
fn two_runs_differ_only_in_position() {
    let a = generate();
    let b = generate();
    assert_eq!(aggregate(&a), aggregate(&b));

    let ids: HashSet<_> = a.iter().map(|p| p.sample_id.clone()).collect();
    assert_eq!(ids.len(), a.len());
}

#[test]
fn fixed_draws_give_exact_coordinates() {
    let mut source = SequenceSource::new(vec![0.25, 0.75]).unwrap();
    let samples = borough_sampler::generate_with(&mut source);

    let queens = samples
        .stratum(Borough::Queens, Category::Schools)
        .next()
        .unwrap();
    let anchor = Borough::Queens.anchor();
    assert!((queens.latitude() - (anchor.lat - 0.25 * anchor.spread)).abs() < 1e-12);
    assert!((queens.longitude() - (anchor.lng + 0.25 * anchor.spread)).abs() < 1e-12);
}

#[test]
fn exported_sample_reopens_as_the_same_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.geojson");

    let session = Session::new();
    write_geojson(&path, &session.samples()).unwrap();

    let reopened = Session::from_collection(read_geojson(&path).unwrap());
    assert_eq!(reopened.statistics(), session.statistics());
    assert_eq!(reopened.samples().len(), session.samples().len());
}
