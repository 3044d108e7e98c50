//! Synthetic CVRP instances.

use ails_core::{Instance, Point};

/// `n` customers evenly spaced on a circle of `radius` around the depot.
///
/// Every customer has demand `demand`.
pub fn ring(n: usize, radius: f64, demand: u32, capacity: u32) -> Instance {
    let mut builder = Instance::builder(format!("ring-{n}"))
        .depot(Point::new(0.0, 0.0))
        .capacity(capacity);
    for i in 0..n {
        let angle = std::f64::consts::TAU * i as f64 / n as f64;
        builder = builder.customer(
            Point::new(radius * angle.cos(), radius * angle.sin()),
            demand,
        );
    }
    builder.build().expect("ring instance is valid")
}

/// `side × side` customers on a unit-spaced grid, depot at the center.
pub fn grid(side: usize, demand: u32, capacity: u32) -> Instance {
    let center = (side as f64 - 1.0) / 2.0;
    let mut builder = Instance::builder(format!("grid-{side}"))
        .depot(Point::new(center, center))
        .capacity(capacity);
    for row in 0..side {
        for col in 0..side {
            builder = builder.customer(Point::new(col as f64, row as f64), demand);
        }
    }
    builder.build().expect("grid instance is valid")
}

/// Ten customers with demand 10, capacity 100 and two routes minimum.
///
/// Depot at the origin, Euclidean distances. Customers form two loose
/// clusters on either side of the depot.
pub fn ten_customer_scenario() -> Instance {
    const COORDS: [(f64, f64); 10] = [
        (10.0, 4.0),
        (12.0, 9.0),
        (7.0, 11.0),
        (15.0, 2.0),
        (9.0, -3.0),
        (-8.0, 5.0),
        (-13.0, 1.0),
        (-6.0, -9.0),
        (-11.0, -6.0),
        (-3.0, 12.0),
    ];
    let mut builder = Instance::builder("ten-customers")
        .depot(Point::new(0.0, 0.0))
        .capacity(100)
        .min_number_routes(2);
    for (x, y) in COORDS {
        builder = builder.customer(Point::new(x, y), 10);
    }
    builder.build().expect("scenario instance is valid")
}

/// A ring where capacity only fits `per_route` customers.
pub fn tight(n: usize, per_route: u32) -> Instance {
    ring(n, 10.0, 10, 10 * per_route)
}
