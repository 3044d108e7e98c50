use super::*;
use crate::{Instance, Point};

// Customers on the axes at distance 1..=4 from the depot.
fn cross() -> Instance {
    Instance::builder("cross")
        .customer(Point::new(1.0, 0.0), 3)
        .customer(Point::new(0.0, 2.0), 3)
        .customer(Point::new(-3.0, 0.0), 3)
        .customer(Point::new(0.0, -4.0), 3)
        .capacity(6)
        .build()
        .unwrap()
}

fn assert_fresh(solution: &Solution, instance: &Instance) {
    let mut copy = solution.clone();
    copy.recompute(instance);
    assert!((copy.f() - solution.f()).abs() < 1e-9);
}

#[test]
fn test_with_routes_cost() {
    let instance = cross();
    let solution = Solution::with_routes(&instance, vec![vec![1], vec![2, 3, 4]]);
    assert_eq!(solution.route(0).cost(), 2.0);
    assert_eq!(solution.route(0).load(), 3);
    assert_eq!(solution.route(1).load(), 9);
    assert_fresh(&solution, &instance);
    assert!(!solution.is_feasible(&instance));
    assert_eq!(solution.excess_load(&instance), 3);
}

#[test]
fn test_mutations_keep_cost_fresh() {
    let instance = cross();
    let mut solution = Solution::with_routes(&instance, vec![vec![1, 2], vec![3, 4]]);

    solution.insert(&instance, 0, 1, 4);
    assert_fresh(&solution, &instance);
    let removed = solution.remove(&instance, 1, 1);
    assert_eq!(removed, 4);
    assert_fresh(&solution, &instance);
    solution.swap_between(&instance, (0, 0), (1, 0));
    assert_eq!(solution.route(0).visits(), &[3, 4, 2]);
    assert_eq!(solution.route(1).visits(), &[1]);
    assert_fresh(&solution, &instance);
    solution.reverse_segment(&instance, 0, 0, 2);
    assert_eq!(solution.route(0).visits(), &[2, 4, 3]);
    assert_fresh(&solution, &instance);
}

#[test]
fn test_clone_is_independent() {
    let instance = cross();
    let mut a = Solution::with_routes(&instance, vec![vec![1, 2], vec![3, 4]]);
    let b = a.clone();
    let f_before = b.f();

    a.remove(&instance, 0, 0);
    a.insert(&instance, 1, 0, 1);

    assert_eq!(b.f(), f_before);
    assert_eq!(b.route(0).visits(), &[1, 2]);
    assert_eq!(b.route(1).visits(), &[3, 4]);
    assert_ne!(a, b);
}

#[test]
fn test_clone_from_reuses_slot_without_aliasing() {
    let instance = cross();
    let source = Solution::with_routes(&instance, vec![vec![1], vec![2], vec![3, 4]]);
    let mut target = Solution::with_routes(&instance, vec![vec![4, 3, 2, 1]]);

    target.clone_from(&source);
    assert_eq!(target, source);
    assert_eq!(target.f(), source.f());

    target.remove(&instance, 2, 0);
    assert_eq!(source.route(2).visits(), &[3, 4]);
}

#[test]
fn test_reset_and_empty_routes() {
    let instance = cross();
    let mut solution = Solution::with_routes(&instance, vec![vec![1, 2], vec![3, 4]]);
    solution.reset(3);
    assert_eq!(solution.num_routes(), 3);
    assert_eq!(solution.customer_count(), 0);
    assert_eq!(solution.f(), 0.0);

    solution.insert(&instance, 1, 0, 2);
    solution.remove_empty_routes();
    assert_eq!(solution.num_routes(), 1);
    assert_eq!(solution.f(), 4.0);
}

#[test]
fn test_completeness_and_location() {
    let instance = cross();
    let complete = Solution::with_routes(&instance, vec![vec![1, 2], vec![3, 4]]);
    assert!(complete.is_complete(&instance));
    assert_eq!(complete.locate(4), Some((1, 1)));
    assert_eq!(complete.locate(0), None);

    let missing = Solution::with_routes(&instance, vec![vec![1, 2], vec![3]]);
    assert!(!missing.is_complete(&instance));

    let duplicated = Solution::with_routes(&instance, vec![vec![1, 2], vec![3, 4, 1]]);
    assert!(!duplicated.is_complete(&instance));

    let with_depot = Solution::with_routes(&instance, vec![vec![1, 0, 2], vec![3, 4]]);
    assert!(!with_depot.is_complete(&instance));
}

#[test]
fn test_record_skips_empty_routes() {
    let instance = cross();
    let mut solution = Solution::with_routes(&instance, vec![vec![], vec![2, 1], vec![3, 4]]);
    solution.recompute(&instance);
    let text = solution.record(0.25).to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Route #1: 2 1");
    assert_eq!(lines[1], "Route #2: 3 4");
    assert!(lines[2].starts_with("Cost "));
    assert_eq!(lines[3], "Time 0.2500");
}

#[test]
fn test_insertion_and_removal_deltas() {
    let instance = cross();
    let solution = Solution::with_routes(&instance, vec![vec![1, 3]]);
    let route = solution.route(0);
    // depot -> 1 -> 3 -> depot = 1 + 4 + 3
    assert_eq!(route.cost(), 8.0);
    assert_eq!(route.removal_delta(&instance, 0), 3.0 - 1.0 - 4.0);
    let delta = route.insertion_delta(&instance, 2, 2);
    let expected = instance.distance(3, 2) + instance.distance(2, 0) - instance.distance(3, 0);
    assert!((delta - expected).abs() < 1e-12);
}
