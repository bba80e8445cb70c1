//! Crate-level integration tests for the scenarios named in spec.md §8,
//! built directly from in-memory inputs rather than fixture files.

use cb_planner_core::constraint::Constraint;
use cb_planner_core::flow::ConstantFlowField;
use cb_planner_core::geometry::{Point, PolygonArea};
use cb_planner_core::heuristic::EuclideanDistance;
use cb_planner_core::layout::{Layout, OrientedBoustrophedon, SpiralLayout};
use cb_planner_core::refinement::{AlternatingDirections, DownstreamDrift, Refinement};
use cb_planner_core::sequencing::{Greedy, Matching, Sequencer};
use cb_planner_core::CoveragePlanner;

fn square() -> PolygonArea {
    PolygonArea::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0), Point::new(0.0, 10.0)])
}

fn diamond() -> PolygonArea {
    PolygonArea::new(vec![Point::new(5.0, 0.0), Point::new(10.0, 5.0), Point::new(5.0, 10.0), Point::new(0.0, 5.0)])
}

/// Scenario 1: square vertical boustrophedon.
#[test]
fn square_vertical_boustrophedon_alternates_endpoints() {
    let area = square();
    let mut constraints = OrientedBoustrophedon::vertical().generate(&area, 0.5, 0.5);
    assert_eq!(constraints.len(), 10);

    AlternatingDirections::new().refine(&mut constraints);

    let mut xs: Vec<f64> = constraints
        .iter()
        .map(|c| match c {
            Constraint::Open(o) => o.coords()[0].x,
            _ => panic!("expected open constraints"),
        })
        .collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let expected_xs: Vec<f64> = (0..10).map(|i| 0.5 + i as f64).collect();
    for (x, expected) in xs.iter().zip(expected_xs.iter()) {
        assert!((x - expected).abs() < 1e-6, "got {x}, expected {expected}");
    }

    for w in constraints.windows(2) {
        assert_ne!(w[0].parameters().direction, w[1].parameters().direction);
    }

    let first = &mut constraints[0].clone();
    let coords = first.coordinates(None, 0.0).unwrap();
    assert!(coords[0].approx_eq(&Point::new(0.5, 0.5), 1e-6));
    assert!(coords[1].approx_eq(&Point::new(0.5, 9.5), 1e-6));
}

/// Scenario 2: square spiral, first ring and ring-to-ring shrink.
#[test]
fn square_spiral_rings_shrink_inward() {
    let area = square();
    let constraints = SpiralLayout::new().generate(&area, 0.5, 0.5);
    assert!(constraints.len() >= 2);

    let Constraint::Closed(first) = &constraints[0] else {
        panic!("expected a closed constraint");
    };
    assert!(first.coords().iter().any(|p| p.approx_eq(&Point::new(0.5, 0.5), 1e-6)));
    assert!(first.coords().iter().any(|p| p.approx_eq(&Point::new(9.5, 9.5), 1e-6)));
}

/// Scenario 3: diamond oriented boustrophedon produces constraints whose
/// endpoints sit on the offset polygon's boundary, first and last
/// anchored to the nearest offset-diamond edge.
#[test]
fn diamond_oriented_boustrophedon_covers_the_interior() {
    let area = diamond();
    let constraints = OrientedBoustrophedon::new(Point::new(1.0, 0.0)).generate(&area, 0.5, 0.75);
    assert!(!constraints.is_empty());

    for c in &constraints {
        let Constraint::Open(open) = c else {
            panic!("expected open constraints");
        };
        assert_eq!(open.coords().len(), 2);
    }

    // Interior transects should be sorted by their first endpoint's y,
    // mirroring the sweep-line intersections being emitted in y order.
    let ys: Vec<f64> = constraints
        .iter()
        .map(|c| match c {
            Constraint::Open(o) => o.coords()[0].y.min(o.coords()[1].y),
            _ => unreachable!(),
        })
        .collect();
    let mut sorted_ys = ys.clone();
    sorted_ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(ys, sorted_ys);
}

/// Scenario 4: greedy sequencing from an ingress point near the lowest
/// transect.
#[test]
fn greedy_sequencing_orders_by_nearest_ingress() {
    let mut constraints = vec![
        Constraint::open(vec![Point::new(0.0, 5.0), Point::new(4.0, 5.0)]),
        Constraint::open(vec![Point::new(0.0, 1.0), Point::new(4.0, 1.0)]),
        Constraint::open(vec![Point::new(0.0, 3.0), Point::new(4.0, 3.0)]),
    ];
    AlternatingDirections::new().with_ingress(Point::new(0.0, 0.1)).refine(&mut constraints);

    let sequencer = Greedy::new(EuclideanDistance);
    let chain = sequencer.sequence(constraints, Some(Point::new(0.0, 0.1)));

    assert_eq!(chain.len(), 3);
    let ys: Vec<f64> = chain.iter().map(|c| c.ingress_points()[0].y).collect();
    assert_eq!(ys, vec![1.0, 3.0, 5.0]);
    assert_eq!(chain[0].ingress_points()[0], Point::new(0.0, 1.0));

    let dirs: Vec<[u8; 2]> = chain.iter().map(|c| c.parameters().direction.unwrap()).collect();
    assert_eq!(dirs, vec![[0, 1], [1, 0], [0, 1]]);
}

/// Scenario 5: matching sequencer's tie-break prefers the candidate
/// farther from the chain's starting ingress.
#[test]
fn matching_tie_break_is_exercised_end_to_end() {
    let constraints = vec![
        {
            let mut c = Constraint::open(vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0)]);
            c.parameters_mut().direction = Some([0, 1]);
            c
        },
        {
            let mut c = Constraint::open(vec![Point::new(1.0, 0.0), Point::new(1.0, 1.0)]);
            c.parameters_mut().direction = Some([1, 0]);
            c
        },
        {
            let mut c = Constraint::open(vec![Point::new(0.0, 3.0), Point::new(0.0, 2.0)]);
            c.parameters_mut().direction = Some([1, 0]);
            c
        },
        {
            let mut c = Constraint::open(vec![Point::new(5.0, 5.0), Point::new(5.0, 6.0)]);
            c.parameters_mut().direction = Some([0, 1]);
            c
        },
    ];

    let chain = Matching::new(EuclideanDistance).sequence(constraints, None);
    assert_eq!(chain.len(), 4);
    assert_eq!(chain[1].ingress_points()[0], Point::new(0.0, 2.0));
}

/// Scenario 6: downstream drift thrust sequences with and against a
/// constant flow.
#[test]
fn downstream_drift_thrust_sequences() {
    let flow = ConstantFlowField::new(0.0, 1.0);

    let mut aligned = vec![Constraint::open(vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(0.0, 2.0)])];
    aligned[0].parameters_mut().direction = Some([0, 1]);
    DownstreamDrift::new(flow).refine(&mut aligned);
    let thrust = aligned[0].parameters().thrust.clone().unwrap();
    assert_eq!(thrust, vec![(0.0, 1.0), (0.0, 0.0), (0.0, 0.0)]);

    let mut against = vec![Constraint::open(vec![Point::new(0.0, 2.0), Point::new(0.0, 1.0), Point::new(0.0, 0.0)])];
    against[0].parameters_mut().direction = Some([0, 1]);
    DownstreamDrift::new(flow).refine(&mut against);
    let thrust = against[0].parameters().thrust.clone().unwrap();
    assert_eq!(thrust, vec![(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)]);
}

/// The planner facade end to end, exercising a flow-aware convenience
/// constructor against a larger area.
#[test]
fn drifting_lawnmower_plans_a_complete_path() {
    let area = square();
    let flow = ConstantFlowField::new(0.0, 1.0);
    let planner = CoveragePlanner::drifting_lawnmower(0.5, 0.5, Point::new(0.0, 1.0), flow);
    let path = planner.plan(&area, Some(Point::new(0.0, 0.0)));

    assert!(!path.is_empty());
    assert_eq!(path.coords().len(), path.thrust().len());
    assert!(path.length() > 0.0);
}
