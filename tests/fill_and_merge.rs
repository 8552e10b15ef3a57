use std::sync::Arc;

use anaquery::{BinSpec, Dataflow, Error, Hist1D, Hist2D, Histogram1D, Observable, Query};
use proptest::prelude::*;

/// One event: a scalar, a variable-length array, and a weight
struct Event {
    pt: f32,
    jets: Vec<f32>,
    weight: f64,
}

fn events() -> Vec<Event> {
    (0..200)
        .map(|i| Event {
            pt: (i % 13) as f32 * 0.9 - 1.0,
            jets: (0..i % 4).map(|j| (i * j % 11) as f32).collect(),
            weight: 0.5 + (i % 3) as f64,
        })
        .collect()
}

fn sequential<F>(make: impl Fn() -> Hist1D<f32>, fill: F) -> Arc<Histogram1D>
where
    F: Fn(&mut Hist1D<f32>, &Event),
{
    let mut query = make();
    for event in &events() {
        fill(&mut query, event);
    }
    query.result()
}

#[test]
fn partitioned_scalar_fill_matches_sequential() {
    let make = || Hist1D::<f32>::fixed("pt", 10, 0.0, 10.0);
    let fill = |q: &mut Hist1D<f32>, e: &Event| q.fill((Observable::Value(e.pt),), e.weight);
    let expected = sequential(|| make().unwrap(), |q, e| fill(q, e).unwrap());
    for partitions in [1, 2, 5, 64] {
        let got = Dataflow::new().with_partitions(partitions).run(&events(), make, fill).unwrap();
        for (a, b) in got.contents().zip(expected.contents()) {
            assert!((a.sumw() - b.sumw()).abs() < 1e-9);
            assert_eq!(a.entries(), b.entries());
        }
        assert!(got.underflow().sumw() > 0.0);
    }
}

#[test]
fn partitioned_array_fill_matches_sequential() {
    let make = || Hist1D::<f32>::variable("jets", &[0.0, 1.0, 2.0, 4.0, 8.0, 16.0]);
    let fill = |q: &mut Hist1D<f32>, e: &Event| q.fill((Observable::from(&e.jets),), e.weight);
    let expected = sequential(|| make().unwrap(), |q, e| fill(q, e).unwrap());
    let got = Dataflow::new().with_partitions(7).run(&events(), make, fill).unwrap();
    assert_eq!(got.export().entries, expected.export().entries);
    let total_jets: usize = events().iter().map(|e| e.jets.len()).sum();
    assert_eq!(got.entries(), total_jets as u64);
}

#[test]
fn shape_mismatch_aborts_the_run() {
    let events: Vec<(Vec<f64>, Vec<f64>)> =
        vec![(vec![1.0, 2.0], vec![1.0, 2.0]), (vec![1.0, 2.0, 3.0], vec![1.0])];
    let result = Dataflow::new().with_partitions(2).run(
        &events,
        || Hist2D::<f64>::new("xy", &BinSpec::Edges(vec![0.0, 5.0]), &BinSpec::Edges(vec![0.0, 5.0])),
        |q: &mut Hist2D, (xs, ys): &(Vec<f64>, Vec<f64>)| q.fill((Observable::from(xs), Observable::from(ys)), 1.0),
    );
    assert!(matches!(result, Err(Error::ShapeMismatch { first_len: 3, second_len: 1, .. })));
}

#[test]
fn invalid_booking_aborts_the_run() {
    let result = Dataflow::new().run(
        &events(),
        || Hist1D::<f32>::fixed("bad", 0, 0.0, 1.0),
        |q: &mut Hist1D<f32>, e: &Event| q.fill((Observable::Value(e.pt),), e.weight),
    );
    assert!(matches!(result, Err(Error::Binning(_))));
}

proptest! {
    #[test]
    fn partition_count_does_not_change_result(
        values in prop::collection::vec((-2.0 .. 12.0_f64, 0.0 .. 3.0_f64), 0..100),
        partitions in 1_usize..16,
    ) {
        let make = || Hist1D::<f64>::fixed("h", 6, 0.0, 10.0);
        let fill = |q: &mut Hist1D<f64>, &(x, w): &(f64, f64)| q.fill((Observable::Value(x),), w);
        let one  = Dataflow::new().with_partitions(1).run(&values, make, fill).unwrap();
        let many = Dataflow::new().with_partitions(partitions).run(&values, make, fill).unwrap();
        prop_assert_eq!(one.entries(), many.entries());
        for (a, b) in one.contents().zip(many.contents()) {
            prop_assert!((a.sumw() - b.sumw()).abs() <= 1e-9 * (1.0 + a.sumw().abs()));
        }
    }
}
