//! The Confidence-Sequence Method (CSM) tail-bound primitive.
//!
//! spec.md keeps `csm`'s internals opaque and only requires that it be
//! "monotone in `trials` for fixed fractions" — the property the
//! decision loop (C4) relies on to eventually stop. No reference
//! implementation of `csm` was available to port (`original_source/`
//! only contains `exact_test.py` and the sampler files, not the `csm`
//! module they import from); this is a from-scratch always-valid bound,
//! recorded as an Open Question decision in DESIGN.md.
//!
//! The bound: given `successes` out of `trials` Bernoulli draws, a
//! Hoeffding-style anytime-valid confidence half-width around the
//! observed rate is
//!
//! ```text
//! half_width(trials) = sqrt(-log_inner_eps / (2 * trials))
//! ```
//!
//! which shrinks monotonically as `trials` grows for a fixed observed
//! rate. `csm` reports `significant = true` once the resulting interval
//! no longer straddles `eps` — i.e. once it can tell, at the confidence
//! `log_inner_eps` implies, which side of `eps` the true rate sits on.
//! `level` is the half-width actually achieved, for diagnostics only.

/// Tests whether `successes` out of `trials` Bernoulli observations pins
/// the true rate to one side of `eps`, at the confidence implied by
/// `log_inner_eps` (more negative is stricter). Returns
/// `(significant, level)`.
pub fn csm(trials: u64, eps: f64, successes: u64, log_inner_eps: f64) -> (bool, f64) {
    if trials == 0 {
        return (false, f64::INFINITY);
    }
    let p_hat = successes as f64 / trials as f64;
    let half_width = (-log_inner_eps / (2.0 * trials as f64)).sqrt();
    let lower = (p_hat - half_width).max(0.0);
    let upper = (p_hat + half_width).min(1.0);
    let significant = upper < eps || lower > eps;
    (significant, half_width)
}
