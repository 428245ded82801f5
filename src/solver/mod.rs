//! Profile solvers for jerk-sync.
//!
//! [`Step1`] computes the minimum-time profile of one degree of freedom and
//! the duration intervals no profile can reach. [`Step2`] fits a profile to
//! an imposed duration. Both reduce every branch to one unknown and solve
//! the position equation as a polynomial.

mod algebra;
mod frame;
mod roots;
mod shape;
mod step1;
mod step2;

pub use step1::Step1;
pub use step2::{Step2, STEP2_ORDER};
