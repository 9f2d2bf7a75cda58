//! Scalar root finding for manifold crossings.
//!
//! Crossing points are located by solving `S(p0 + t * (p1 - p0)) = 0`
//! for `t`. [`solve_scalar`] runs a Newton iteration with a central
//! difference derivative and a hard step cap; it never returns an
//! estimate it has not accepted as converged.

use serde::{Deserialize, Serialize};

/// Newton iteration settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewtonSettings {
    /// Hard cap on Newton steps.
    pub max_steps: usize,
    /// Accept when `|f(t)|` or the relative step size falls below this.
    pub tolerance: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            max_steps: 50,
            tolerance: 1e-12,
        }
    }
}

/// The iteration stopped without an accepted root.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("no root after {steps} Newton steps (last estimate {estimate}, residual {residual})")]
pub struct NonConvergence {
    /// Steps taken before giving up.
    pub steps: usize,
    /// Last parameter value reached.
    pub estimate: f64,
    /// Function value at `estimate`.
    pub residual: f64,
}

/// Relative step for the central difference derivative.
const DERIVATIVE_STEP: f64 = 1.490_116_119_384_765_6e-8; // sqrt(f64::EPSILON)

/// Find `t` with `f(t) = 0`, starting from `initial_guess`.
///
/// # Errors
///
/// Returns [`NonConvergence`] if the step cap is reached, the derivative
/// vanishes, or `f` produces a non-finite value.
pub fn solve_scalar<F>(
    f: F,
    initial_guess: f64,
    settings: NewtonSettings,
) -> Result<f64, NonConvergence>
where
    F: Fn(f64) -> f64,
{
    let mut t = initial_guess;
    let mut value = f(t);

    for step in 0..settings.max_steps {
        if !value.is_finite() {
            return Err(NonConvergence {
                steps: step,
                estimate: t,
                residual: value,
            });
        }
        if value.abs() <= settings.tolerance {
            return Ok(t);
        }

        let h = DERIVATIVE_STEP * t.abs().max(1.0);
        let slope = (f(t + h) - f(t - h)) / (2.0 * h);
        if !slope.is_finite() || slope == 0.0 {
            return Err(NonConvergence {
                steps: step,
                estimate: t,
                residual: value,
            });
        }

        let next = t - value / slope;
        let moved = (next - t).abs();
        t = next;
        value = f(t);

        // Rounding in `f` can keep the residual above an absolute
        // tolerance even at the closest representable root.
        if value.is_finite() && moved <= settings.tolerance * t.abs().max(1.0) {
            return Ok(t);
        }
    }

    if value.is_finite() && value.abs() <= settings.tolerance {
        return Ok(t);
    }
    Err(NonConvergence {
        steps: settings.max_steps,
        estimate: t,
        residual: value,
    })
}
