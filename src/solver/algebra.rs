//! Polynomial arithmetic in one unknown, extended by one square root.
//!
//! Every branch of the solvers reduces to a single unknown `x`, sometimes
//! together with `y = ±sqrt(D(x))`. Phase durations and accelerations are
//! then elements `P(x) + y·Q(x)` of the ring `R[x][y] / (y² - D(x))`, and the
//! position residual built from them becomes a polynomial after squaring.

use core::ops::{Add, Div, Mul, Neg, Sub};

/// Maximum number of coefficients (degree 15).
pub(crate) const CAPACITY: usize = 16;

/// Dense polynomial with real coefficients, lowest degree first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Poly {
    coeffs: [f64; CAPACITY],
    len: usize,
}

impl Poly {
    pub(crate) const ZERO: Poly = Poly {
        coeffs: [0.0; CAPACITY],
        len: 0,
    };

    pub(crate) fn constant(c: f64) -> Self {
        Self::from_coeffs(&[c])
    }

    /// `c0 + c1·x`
    pub(crate) fn linear(c0: f64, c1: f64) -> Self {
        Self::from_coeffs(&[c0, c1])
    }

    /// `c0 + c1·x + c2·x²`
    pub(crate) fn quadratic(c0: f64, c1: f64, c2: f64) -> Self {
        Self::from_coeffs(&[c0, c1, c2])
    }

    pub(crate) fn from_coeffs(coeffs: &[f64]) -> Self {
        let mut poly = Self::ZERO;
        let n = coeffs.len().min(CAPACITY);
        poly.coeffs[..n].copy_from_slice(&coeffs[..n]);
        poly.len = n;
        poly.trimmed()
    }

    // Coefficients at and beyond `len` are always zero.
    fn trimmed(mut self) -> Self {
        while self.len > 0 && self.coeffs[self.len - 1] == 0.0 {
            self.len -= 1;
        }
        self
    }

    pub(crate) fn coeffs(&self) -> &[f64] {
        &self.coeffs[..self.len]
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.len == 0
    }

    /// Degree, with the zero polynomial reported as degree 0.
    pub(crate) fn degree(&self) -> usize {
        self.len.saturating_sub(1)
    }

    pub(crate) fn eval(&self, x: f64) -> f64 {
        self.coeffs().iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// Sum of the absolute values of the terms at `x`, used as a round-off scale.
    pub(crate) fn magnitude(&self, x: f64) -> f64 {
        let ax = libm::fabs(x);
        self.coeffs()
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * ax + libm::fabs(*c))
    }

    pub(crate) fn derivative(&self) -> Self {
        let mut d = Self::ZERO;
        for i in 1..self.len {
            d.coeffs[i - 1] = self.coeffs[i] * i as f64;
        }
        d.len = self.len.saturating_sub(1);
        d.trimmed()
    }
}

impl Add for Poly {
    type Output = Poly;

    fn add(self, rhs: Poly) -> Poly {
        let mut out = Poly::ZERO;
        out.len = self.len.max(rhs.len);
        for i in 0..out.len {
            out.coeffs[i] = self.coeffs[i] + rhs.coeffs[i];
        }
        out.trimmed()
    }
}

impl Neg for Poly {
    type Output = Poly;

    fn neg(mut self) -> Poly {
        for c in &mut self.coeffs[..self.len] {
            *c = -*c;
        }
        self
    }
}

impl Sub for Poly {
    type Output = Poly;

    fn sub(self, rhs: Poly) -> Poly {
        self + (-rhs)
    }
}

impl Mul for Poly {
    type Output = Poly;

    fn mul(self, rhs: Poly) -> Poly {
        if self.is_zero() || rhs.is_zero() {
            return Poly::ZERO;
        }
        let mut out = Poly::ZERO;
        out.len = (self.len + rhs.len - 1).min(CAPACITY);
        debug_assert!(self.len + rhs.len - 1 <= CAPACITY, "polynomial degree overflow");
        for (i, a) in self.coeffs().iter().enumerate() {
            for (j, b) in rhs.coeffs().iter().enumerate() {
                if i + j < CAPACITY {
                    out.coeffs[i + j] += a * b;
                }
            }
        }
        out.trimmed()
    }
}

impl Mul<f64> for Poly {
    type Output = Poly;

    fn mul(mut self, k: f64) -> Poly {
        for c in &mut self.coeffs[..self.len] {
            *c *= k;
        }
        self.trimmed()
    }
}

/// Element `P(x) + y·Q(x)` of the extension ring.
///
/// Products need the radicand `D(x) = y²`, so they go through
/// [`Expr::mul`] instead of the `Mul` operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Expr {
    pub(crate) p: Poly,
    pub(crate) q: Poly,
}

impl Expr {
    pub(crate) const ZERO: Expr = Expr {
        p: Poly::ZERO,
        q: Poly::ZERO,
    };

    pub(crate) fn constant(c: f64) -> Self {
        Self::poly(Poly::constant(c))
    }

    /// The unknown `x`.
    pub(crate) fn x() -> Self {
        Self::poly(Poly::linear(0.0, 1.0))
    }

    /// The square root `y`.
    pub(crate) fn y() -> Self {
        Expr {
            p: Poly::ZERO,
            q: Poly::constant(1.0),
        }
    }

    pub(crate) fn poly(p: Poly) -> Self {
        Expr { p, q: Poly::ZERO }
    }

    /// Product in the ring, reducing `y²` to `radicand`.
    pub(crate) fn mul(self, rhs: Expr, radicand: &Poly) -> Expr {
        let p = self.p * rhs.p + *radicand * self.q * rhs.q;
        let q = self.p * rhs.q + self.q * rhs.p;
        Expr { p, q }
    }

    pub(crate) fn eval(&self, x: f64, y: f64) -> f64 {
        self.p.eval(x) + y * self.q.eval(x)
    }

    /// Polynomial whose roots contain every `x` where `self` vanishes for
    /// some `y = ±sqrt(radicand(x))`.
    pub(crate) fn norm(&self, radicand: &Poly) -> Poly {
        if self.q.is_zero() {
            self.p
        } else {
            self.p * self.p - *radicand * self.q * self.q
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr {
            p: self.p + rhs.p,
            q: self.q + rhs.q,
        }
    }
}

impl Add<f64> for Expr {
    type Output = Expr;

    fn add(self, rhs: f64) -> Expr {
        self + Expr::constant(rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self + (-rhs)
    }
}

impl Sub<f64> for Expr {
    type Output = Expr;

    fn sub(self, rhs: f64) -> Expr {
        self + Expr::constant(-rhs)
    }
}

impl Sub<Expr> for f64 {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::constant(self) - rhs
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr {
            p: -self.p,
            q: -self.q,
        }
    }
}

impl Mul<f64> for Expr {
    type Output = Expr;

    fn mul(self, k: f64) -> Expr {
        Expr {
            p: self.p * k,
            q: self.q * k,
        }
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        rhs * self
    }
}

impl Div<f64> for Expr {
    type Output = Expr;

    fn div(self, k: f64) -> Expr {
        self * (1.0 / k)
    }
}
