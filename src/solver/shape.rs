//! Symbolic seven-phase shape with one unknown.
//!
//! A branch describes its phase durations and phase-end accelerations as
//! expressions in the unknown `x` (and `y = ±sqrt(D(x))`). Velocity and
//! acceleration targets are met by construction; the remaining position
//! equation is solved here and every root is handed to the caller for exact
//! validation.

use core::ops::ControlFlow;

use super::algebra::{Expr, Poly};
use super::roots::real_roots;
use crate::motion::State;

/// Which square roots `y = ±sqrt(D(x))` a shape accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RootSign {
    Negative,
    Positive,
    Both,
}

impl RootSign {
    pub(crate) fn from_sign(sign: f64) -> Self {
        if sign < 0.0 {
            RootSign::Negative
        } else {
            RootSign::Positive
        }
    }

    fn signs(self) -> &'static [f64] {
        match self {
            RootSign::Negative => &[-1.0],
            RootSign::Positive => &[1.0],
            RootSign::Both => &[1.0, -1.0],
        }
    }
}

/// Numeric phase durations and phase-end accelerations at one root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) t: [f64; 7],
    pub(crate) a: [f64; 7],
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Shape {
    /// Phase durations.
    pub(crate) t: [Expr; 7],
    /// Acceleration at the end of each phase.
    pub(crate) a: [Expr; 7],
    /// `D(x)` and the admissible signs of `y`, if the shape uses `y`.
    pub(crate) radical: Option<(Poly, RootSign)>,
    pub(crate) lo: f64,
    pub(crate) hi: f64,
}

impl Shape {
    pub(crate) fn new(t: [Expr; 7], a: [Expr; 7], lo: f64, hi: f64) -> Self {
        Shape {
            t,
            a,
            radical: None,
            lo,
            hi,
        }
    }

    pub(crate) fn with_radical(mut self, radicand: Poly, sign: RootSign) -> Self {
        self.radical = Some((radicand, sign));
        self
    }

    fn radicand(&self) -> Poly {
        self.radical.map(|(d, _)| d).unwrap_or(Poly::ZERO)
    }

    /// Final position minus `pf`, integrated phase by phase from `start`.
    pub(crate) fn residual(&self, start: State, pf: f64) -> Expr {
        let d = self.radicand();
        let mut p = Expr::constant(start.p);
        let mut v = Expr::constant(start.v);
        let mut a = Expr::constant(start.a);

        for (t, a_end) in self.t.iter().zip(&self.a) {
            if *t == Expr::ZERO {
                a = *a_end;
                continue;
            }
            let t2 = t.mul(*t, &d);
            p = p + v.mul(*t, &d) + (a * 2.0 + *a_end).mul(t2, &d) / 6.0;
            v = v + (a + *a_end).mul(*t, &d) / 2.0;
            a = *a_end;
        }

        p - pf
    }

    /// Solve the position equation and visit every candidate in ascending `x`.
    pub(crate) fn solve<B>(
        &self,
        start: State,
        pf: f64,
        mut visit: impl FnMut(Candidate) -> ControlFlow<B>,
    ) -> ControlFlow<B> {
        if self.lo.is_nan() || self.hi.is_nan() || self.lo > self.hi {
            return ControlFlow::Continue(());
        }

        let residual = self.residual(start, pf);
        let Some((d, sign)) = self.radical else {
            for x in real_roots(&residual.p, self.lo, self.hi) {
                if let ControlFlow::Break(b) = visit(self.evaluate(x, 0.0)) {
                    return ControlFlow::Break(b);
                }
            }
            return ControlFlow::Continue(());
        };

        for x in real_roots(&residual.norm(&d), self.lo, self.hi) {
            let dx = d.eval(x);
            if dx < -1e-9 * d.magnitude(x).max(1.0) {
                continue;
            }
            for &s in sign.signs() {
                let x = self.polish(&residual, &d, s, x);
                let y = s * libm::sqrt(d.eval(x).max(0.0));
                if let ControlFlow::Break(b) = visit(self.evaluate(x, y)) {
                    return ControlFlow::Break(b);
                }
            }
        }

        ControlFlow::Continue(())
    }

    fn evaluate(&self, x: f64, y: f64) -> Candidate {
        Candidate {
            t: self.t.map(|t| t.eval(x, y)),
            a: self.a.map(|a| a.eval(x, y)),
        }
    }

    // Newton on P(x) + s·sqrt(D(x))·Q(x); squaring may have lost precision.
    fn polish(&self, residual: &Expr, d: &Poly, s: f64, x0: f64) -> f64 {
        let (dp, dq, dd) = (residual.p.derivative(), residual.q.derivative(), d.derivative());
        let eval = |x: f64| {
            let dx = d.eval(x);
            if dx <= 0.0 {
                return None;
            }
            let y = s * libm::sqrt(dx);
            let q = residual.q.eval(x);
            let g = residual.p.eval(x) + y * q;
            let dg = dp.eval(x) + y * dq.eval(x) + s * dd.eval(x) / (2.0 * libm::sqrt(dx)) * q;
            Some((g, dg))
        };

        let Some((mut g, _)) = eval(x0) else {
            return x0;
        };
        let mut x = x0;
        for _ in 0..8 {
            let Some((gx, dgx)) = eval(x) else { break };
            if gx == 0.0 || dgx == 0.0 || !dgx.is_finite() {
                break;
            }
            let next = x - gx / dgx;
            if !(next >= self.lo && next <= self.hi) {
                break;
            }
            match eval(next) {
                Some((gn, _)) if libm::fabs(gn) < libm::fabs(g) => {
                    x = next;
                    g = gn;
                }
                _ => break,
            }
        }
        x
    }
}
