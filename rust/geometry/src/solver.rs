// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Levenberg–Marquardt nonlinear least squares
//!
//! Minimizes `½ Σ rᵢ(x)²` for a residual vector supplied through
//! [`LeastSquaresProblem`]. Each iteration solves the damped normal
//! equations
//!
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = -Jᵀr
//! ```
//!
//! with a Cholesky factorization, accepting the step when the cost drops
//! and raising `λ` otherwise. Convergence tolerances follow the MINPACK
//! conventions (`ftol`, `xtol`, `gtol`).

use nalgebra::{DMatrix, DVector};

/// A residual function with an optional analytic Jacobian
pub trait LeastSquaresProblem {
    /// Residual vector at `params`
    fn residuals(&self, params: &DVector<f64>) -> DVector<f64>;

    /// Jacobian `∂rᵢ/∂xⱼ` at `params`.
    ///
    /// The default uses forward differences; implementors with a closed
    /// form should override it.
    fn jacobian(&self, params: &DVector<f64>) -> DMatrix<f64> {
        let base = self.residuals(params);
        let mut jac = DMatrix::zeros(base.len(), params.len());
        let mut shifted = params.clone();

        for j in 0..params.len() {
            let h = f64::EPSILON.sqrt() * params[j].abs().max(1.0);
            shifted[j] = params[j] + h;
            let col = (self.residuals(&shifted) - &base) / h;
            jac.set_column(j, &col);
            shifted[j] = params[j];
        }
        jac
    }
}

/// Solver tolerances and limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LmOptions {
    /// Maximum number of Jacobian evaluations
    pub max_iterations: usize,
    /// Stop when an accepted step reduces the cost by less than this fraction
    pub ftol: f64,
    /// Stop when the step is smaller than this fraction of the parameter norm
    pub xtol: f64,
    /// Stop when the largest gradient component is at most this value
    pub gtol: f64,
    /// Initial damping factor
    pub initial_lambda: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            gtol: 0.0,
            initial_lambda: 1e-3,
        }
    }
}

/// Why the solver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Relative cost reduction fell below `ftol`
    CostTolerance,
    /// Relative step size fell below `xtol`
    StepTolerance,
    /// Gradient fell to `gtol` (includes exact fits)
    GradientTolerance,
    /// No damped step reduced the cost any further
    NoImprovement,
    /// `max_iterations` reached
    MaxIterations,
    /// Residuals became NaN or infinite
    NonFinite,
}

impl Termination {
    /// Whether the returned parameters sit at a local minimum
    pub fn converged(&self) -> bool {
        !matches!(self, Termination::MaxIterations | Termination::NonFinite)
    }
}

/// Outcome of a solve
#[derive(Debug, Clone, PartialEq)]
pub struct LmReport {
    /// Final parameters (the last accepted iterate)
    pub params: DVector<f64>,
    /// Final cost `½ Σ rᵢ²`
    pub cost: f64,
    /// Number of outer iterations performed
    pub iterations: usize,
    /// Reason the solver stopped
    pub termination: Termination,
}

const MIN_LAMBDA: f64 = 1e-12;
const MAX_LAMBDA: f64 = 1e16;
/// Floor for diagonal scaling so flat directions still get damped
const MIN_DIAGONAL: f64 = 1e-12;

/// Levenberg–Marquardt minimizer
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    options: LmOptions,
}

impl LevenbergMarquardt {
    pub fn new(options: LmOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LmOptions {
        &self.options
    }

    /// Minimize the problem's squared residuals starting from `initial`.
    ///
    /// Never fails: non-convergence is reported through
    /// [`LmReport::termination`] and the last accepted iterate is returned.
    pub fn minimize<P: LeastSquaresProblem + ?Sized>(
        &self,
        problem: &P,
        initial: DVector<f64>,
    ) -> LmReport {
        let opts = &self.options;
        let n_params = initial.len();

        let mut x = initial;
        let mut r = problem.residuals(&x);
        let mut cost = 0.5 * r.norm_squared();

        if !cost.is_finite() {
            return LmReport {
                params: x,
                cost,
                iterations: 0,
                termination: Termination::NonFinite,
            };
        }

        // Zero or negative damping could never be raised by the retry loop
        let mut lambda = opts.initial_lambda.max(MIN_LAMBDA);
        let mut termination = Termination::MaxIterations;
        let mut iterations = 0;

        'outer: while iterations < opts.max_iterations {
            iterations += 1;

            let jac = problem.jacobian(&x);
            let jt = jac.transpose();
            let jtj = &jt * &jac;
            let grad = &jt * &r;

            if grad.amax() <= opts.gtol {
                termination = Termination::GradientTolerance;
                break;
            }

            let neg_grad = -&grad;

            loop {
                let mut damped = jtj.clone();
                for k in 0..n_params {
                    damped[(k, k)] += lambda * jtj[(k, k)].max(MIN_DIAGONAL);
                }

                let step = match damped.cholesky() {
                    Some(chol) => chol.solve(&neg_grad),
                    None => {
                        lambda *= 10.0;
                        if lambda > MAX_LAMBDA {
                            termination = Termination::NoImprovement;
                            break 'outer;
                        }
                        continue;
                    }
                };

                let x_new = &x + &step;
                let r_new = problem.residuals(&x_new);
                let cost_new = 0.5 * r_new.norm_squared();

                if cost_new.is_finite() && cost_new < cost {
                    let reduction = (cost - cost_new) / cost;
                    let step_norm = step.norm();

                    x = x_new;
                    r = r_new;
                    cost = cost_new;
                    lambda = (lambda / 10.0).max(MIN_LAMBDA);

                    if reduction < opts.ftol {
                        termination = Termination::CostTolerance;
                        break 'outer;
                    }
                    if step_norm <= opts.xtol * (x.norm() + opts.xtol) {
                        termination = Termination::StepTolerance;
                        break 'outer;
                    }
                    break;
                }

                lambda *= 10.0;
                if lambda > MAX_LAMBDA {
                    termination = Termination::NoImprovement;
                    break 'outer;
                }
            }
        }

        tracing::trace!(
            iterations,
            cost,
            termination = ?termination,
            "Levenberg–Marquardt finished"
        );

        LmReport {
            params: x,
            cost,
            iterations,
            termination,
        }
    }
}
