// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator: the inner loop of every render.
use num::Complex;

/// Counts how many times `z ← z² + c` can be applied before `z` leaves
/// the radius-2 disc, giving up at `max`.  The first step from `z = 0`
/// is folded in by starting at `z = c`, so a point that already lies
/// outside the disc escapes after zero iterations.
///
/// Pure and allocation-free; safe to call from any number of threads
/// at once.
#[inline]
pub fn iterations_at_point(c: Complex<f64>, max: u32) -> u32 {
    let mut z = c;
    let mut iter = 0;
    while z.norm_sqr() <= 4.0 && iter < max {
        z = z * z + c;
        iter += 1;
    }
    iter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_outside_the_disc_escape_immediately() {
        assert_eq!(iterations_at_point(Complex::new(3.0, 0.0), 100), 0);
        assert_eq!(iterations_at_point(Complex::new(-1.5, 1.5), 100), 0);
        assert_eq!(iterations_at_point(Complex::new(0.0, -2.01), 100), 0);
    }

    #[test]
    fn interior_points_reach_the_cap() {
        assert_eq!(iterations_at_point(Complex::new(0.0, 0.0), 250), 250);
        assert_eq!(iterations_at_point(Complex::new(-1.0, 0.0), 250), 250);
        assert_eq!(iterations_at_point(Complex::new(-0.1, 0.1), 250), 250);
    }

    #[test]
    fn zero_cap_counts_nothing() {
        assert_eq!(iterations_at_point(Complex::new(0.0, 0.0), 0), 0);
    }

    #[test]
    fn boundary_points_escape_partway() {
        // 0.5 escapes after a handful of steps: 0.5, 0.75, 1.0625, 1.6289, 3.153
        assert_eq!(iterations_at_point(Complex::new(0.5, 0.0), 1000), 4);
    }

    #[test]
    fn repeated_calls_agree() {
        let points = [
            Complex::new(-0.75, 0.1),
            Complex::new(0.286932, 0.014287),
            Complex::new(-0.38, -0.665),
        ];
        for p in points.iter() {
            let first = iterations_at_point(*p, 1000);
            for _ in 0..5 {
                assert_eq!(iterations_at_point(*p, 1000), first);
            }
        }
    }
}
