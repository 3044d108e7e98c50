use super::*;
use crate::AilsError;

fn square() -> Instance {
    Instance::builder("square")
        .depot(Point::new(0.0, 0.0))
        .customer(Point::new(1.0, 0.0), 4)
        .customer(Point::new(0.0, 2.0), 4)
        .customer(Point::new(-3.0, 0.0), 4)
        .capacity(10)
        .build()
        .unwrap()
}

#[test]
fn test_distances_are_symmetric() {
    let instance = square();
    for i in 0..instance.node_count() {
        assert_eq!(instance.distance(i, i), 0.0);
        for j in 0..instance.node_count() {
            assert_eq!(instance.distance(i, j), instance.distance(j, i));
        }
    }
    assert_eq!(instance.distance(DEPOT, 2), 2.0);
}

#[test]
fn test_min_number_routes_from_demand() {
    let instance = square();
    assert_eq!(instance.total_demand(), 12);
    assert_eq!(instance.min_number_routes(), 2);
}

#[test]
fn test_min_number_routes_override_never_below_bound() {
    let instance = Instance::builder("override")
        .customer(Point::new(1.0, 1.0), 6)
        .customer(Point::new(2.0, 2.0), 6)
        .capacity(10)
        .min_number_routes(1)
        .build()
        .unwrap();
    assert_eq!(instance.min_number_routes(), 2);
}

#[test]
fn test_neighbors_sorted_and_exclude_depot() {
    let instance = square();
    assert_eq!(instance.neighbors(DEPOT), &[1, 2, 3]);
    assert_eq!(instance.neighbors(1), &[2, 3]);
    assert_eq!(instance.nearest(3, 1), &[2]);
    assert_eq!(instance.nearest(3, 10).len(), 2);
}

#[test]
fn test_rounded_metric() {
    let d = DistanceMetric::RoundedEuclidean.measure(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
    assert_eq!(d, 1.0);
    let d = DistanceMetric::RoundedEuclidean.measure(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
    assert_eq!(d, 3.0);
}

#[test]
fn test_rejects_demand_above_capacity() {
    let err = Instance::builder("bad")
        .customer(Point::new(1.0, 1.0), 11)
        .capacity(10)
        .build()
        .unwrap_err();
    assert!(matches!(err, AilsError::Instance(_)));
}

#[test]
fn test_rejects_missing_capacity_and_customers() {
    assert!(Instance::builder("no-cap")
        .customer(Point::new(1.0, 1.0), 1)
        .build()
        .is_err());
    assert!(Instance::builder("empty").capacity(5).build().is_err());
}
