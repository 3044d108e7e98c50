//! Hand-built solutions.

use ails_core::{Instance, Solution};

/// All customers in one route, in id order.
pub fn single_route(instance: &Instance) -> Solution {
    Solution::with_routes(instance, vec![instance.customers().collect()])
}

/// One route per customer.
pub fn one_route_per_customer(instance: &Instance) -> Solution {
    Solution::with_routes(instance, instance.customers().map(|c| vec![c]).collect())
}
