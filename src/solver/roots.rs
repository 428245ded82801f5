//! Real roots of a polynomial inside an interval.
//!
//! Roots are isolated recursively through the derivative: between two
//! consecutive critical points the polynomial is monotone, so a sign change
//! brackets exactly one root, refined with safeguarded Newton steps.
//! Critical points and interval ends where the value vanishes up to round-off
//! are reported too, which catches double roots.

use heapless::Vec;

use super::algebra::{Poly, CAPACITY};

/// Roots in ascending order.
pub(crate) type Roots = Vec<f64, CAPACITY>;

const MAX_ITERATIONS: usize = 200;

/// Relative size of a value treated as zero at a critical point.
const NEAR_ZERO: f64 = 1e-10;

/// All real roots of `poly` in `[lo, hi]`.
///
/// Infinite ends are clamped to the Cauchy bound. The zero polynomial
/// reports `lo` as its only root.
pub(crate) fn real_roots(poly: &Poly, lo: f64, hi: f64) -> Roots {
    let mut roots = Roots::new();
    if lo.is_nan() || hi.is_nan() {
        return roots;
    }
    if poly.is_zero() {
        if lo.is_finite() {
            let _ = roots.push(lo);
        }
        return roots;
    }

    let bound = cauchy_bound(poly);
    let lo = lo.max(-bound);
    let hi = hi.min(bound);
    if lo > hi {
        return roots;
    }

    match poly.degree() {
        0 => {}
        1 => {
            let c = poly.coeffs();
            let x = -c[0] / c[1];
            if x >= lo && x <= hi {
                let _ = roots.push(x);
            }
        }
        _ => isolate(poly, lo, hi, &mut roots),
    }

    roots
}

fn isolate(poly: &Poly, lo: f64, hi: f64, roots: &mut Roots) {
    let derivative = poly.derivative();

    let mut points: Vec<f64, { CAPACITY + 2 }> = Vec::new();
    let _ = points.push(lo);
    for c in real_roots(&derivative, lo, hi) {
        if c > lo && c < hi {
            let _ = points.push(c);
        }
    }
    let _ = points.push(hi);

    for w in points.windows(2) {
        let (l, r) = (w[0], w[1]);
        let (fl, fr) = (poly.eval(l), poly.eval(r));
        if (fl < 0.0 && fr > 0.0) || (fl > 0.0 && fr < 0.0) {
            insert(roots, bracketed(poly, &derivative, l, r, fl));
        }
    }

    for &x in &points {
        if libm::fabs(poly.eval(x)) <= NEAR_ZERO * poly.magnitude(x) {
            insert(roots, x);
        }
    }
}

fn insert(roots: &mut Roots, x: f64) {
    let close = |r: &f64| libm::fabs(r - x) <= 1e-12 * libm::fabs(x).max(1.0);
    if roots.iter().any(close) {
        return;
    }
    // Capacity exceeds the number of distinct roots of any polynomial we store.
    if roots.push(x).is_ok() {
        roots.sort_unstable_by(f64::total_cmp);
    }
}

// Safeguarded Newton on a bracket with a sign change.
fn bracketed(poly: &Poly, derivative: &Poly, lo: f64, hi: f64, f_lo: f64) -> f64 {
    let (mut a, mut b) = (lo, hi);
    let mut x = 0.5 * (a + b);

    for _ in 0..MAX_ITERATIONS {
        let fx = poly.eval(x);
        if fx == 0.0 {
            return x;
        }
        if (fx < 0.0) == (f_lo < 0.0) {
            a = x;
        } else {
            b = x;
        }

        let dfx = derivative.eval(x);
        let newton = if dfx != 0.0 { x - fx / dfx } else { f64::NAN };
        let next = if newton > a && newton < b {
            newton
        } else {
            0.5 * (a + b)
        };

        if libm::fabs(next - x) <= 2.0 * f64::EPSILON * libm::fabs(next) || b - a <= f64::MIN_POSITIVE {
            return next;
        }
        x = next;
    }

    x
}

fn cauchy_bound(poly: &Poly) -> f64 {
    let c = poly.coeffs();
    let lead = libm::fabs(c[c.len() - 1]);
    let max = c[..c.len() - 1]
        .iter()
        .fold(0.0_f64, |m, v| m.max(libm::fabs(*v) / lead));
    1.0 + max
}
