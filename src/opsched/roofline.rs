//! Equation 1: `base_cycles = max(ceil(n_op/Θ_hw)*s_comp, ceil(v_off/B_hw)*r_bytes)`,
//! `duration = max(1, round(base_cycles))`.

/// The result of evaluating the roofline equation for one operator.
pub struct RooflineOutcome {
    pub duration: u64,
    pub is_compute_bound: bool,
    pub compute_cycles: u64,
    pub memory_cycles: u64,
}

/// Evaluates the roofline equation.
///
/// `theta_hw`/`b_hw` are assumed already validated as `> 0` by the caller
/// (see `SchedulerError::ZeroThroughput`).
pub fn compute_duration(
    n_op: u64,
    v_off: u64,
    theta_hw: f64,
    b_hw: f64,
    s_comp: f64,
    r_bytes: f64,
) -> RooflineOutcome {
    let compute_cycles = (n_op as f64 / theta_hw).ceil() * s_comp;
    let memory_cycles = (v_off as f64 / b_hw).ceil() * r_bytes;
    let duration = compute_cycles.max(memory_cycles).round().max(1.0);

    RooflineOutcome {
        duration: duration as u64,
        is_compute_bound: compute_cycles >= memory_cycles,
        compute_cycles: compute_cycles as u64,
        memory_cycles: memory_cycles as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_bound_when_compute_cycles_dominate() {
        let out = compute_duration(1000, 10, 10.0, 1000.0, 1.0, 1.0);
        assert!(out.is_compute_bound);
        assert_eq!(out.duration, 100);
    }

    #[test]
    fn memory_bound_when_memory_cycles_dominate() {
        let out = compute_duration(10, 100_000, 1000.0, 500.0, 1.0, 1.0);
        assert!(!out.is_compute_bound);
        assert_eq!(out.duration, 200);
    }

    #[test]
    fn optimization_factors_scale_each_term_independently() {
        let baseline = compute_duration(1000, 10, 10.0, 1000.0, 1.0, 1.0);
        let optimized = compute_duration(1000, 10, 10.0, 1000.0, 0.5, 1.0);
        assert!(optimized.duration < baseline.duration);
    }

    #[test]
    fn ceiling_applied_to_fractional_cycles() {
        let out = compute_duration(1, 1, 3.0, 1000.0, 1.0, 1.0);
        assert_eq!(out.compute_cycles, 1);
    }

    #[test]
    fn duration_rounds_rather_than_ceils_fractional_base_cycles() {
        // compute_cycles = ceil(504/10)*1 = 51, scaled by s_comp=1 -> base
        // 50.4 would need a fractional compute-cycles input; exercise the
        // final rounding directly by scaling a whole-number base down.
        let out = compute_duration(100, 1, 1.0, 1000.0, 0.504, 1.0);
        // base_cycles = 100 * 0.504 = 50.4 -> rounds to 50, not 51.
        assert_eq!(out.duration, 50);
    }

    #[test]
    fn duration_floors_to_one_when_base_cycles_collapse_to_zero() {
        let out = compute_duration(0, 0, 10.0, 1000.0, 0.5, 0.5);
        assert_eq!(out.duration, 1);
    }
}
