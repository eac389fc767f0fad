//! One-way ANOVA across algorithms' shots-to-win samples.

use serde::Serialize;

use crate::error::ComparisonError;

const BETACF_MAX_ITER: usize = 300;
const BETACF_EPS: f64 = 1e-14;
const FP_MIN: f64 = 1e-300;

/// F test result. A non-finite `f_statistic` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub ss_between: f64,
    pub ss_within: f64,
}

/// One-way ANOVA over named groups. Needs at least two groups, none empty.
/// With one sample per group SS_within is zero and the degenerate F applies.
pub fn one_way_anova(groups: &[(&str, &[usize])]) -> Result<AnovaResult, ComparisonError> {
    let k = groups.len();
    if k < 2 {
        return Err(ComparisonError::TooFewGroups(k));
    }
    if let Some((name, _)) = groups.iter().find(|(_, g)| g.is_empty()) {
        return Err(ComparisonError::EmptyGroup(name.to_string()));
    }
    let total: usize = groups.iter().map(|(_, g)| g.len()).sum();

    let grand_mean = groups
        .iter()
        .flat_map(|(_, g)| g.iter())
        .map(|&x| x as f64)
        .sum::<f64>()
        / total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for (_, g) in groups {
        let n = g.len() as f64;
        let mean = g.iter().map(|&x| x as f64).sum::<f64>() / n;
        ss_between += n * (mean - grand_mean).powi(2);
        ss_within += g.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1;
    let df_within = total - k;
    let (f_statistic, p_value) = if ss_within == 0.0 {
        if ss_between == 0.0 {
            (0.0, 1.0)
        } else {
            (f64::INFINITY, 0.0)
        }
    } else {
        let f = (ss_between / df_between as f64) / (ss_within / df_within as f64);
        (f, f_survival(f, df_between as f64, df_within as f64))
    };

    Ok(AnovaResult {
        f_statistic,
        p_value,
        df_between,
        df_within,
        ss_between,
        ss_within,
    })
}

/// P(F > f) for an F distribution with `(d1, d2)` degrees of freedom.
pub fn f_survival(f: f64, d1: f64, d2: f64) -> f64 {
    if f <= 0.0 {
        return 1.0;
    }
    if !f.is_finite() {
        return 0.0;
    }
    regularized_beta(d2 / (d2 + d1 * f), d2 / 2.0, d1 / 2.0)
}

/// Regularized incomplete beta function I_x(a, b).
pub fn regularized_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front =
        libm::lgamma(a + b) - libm::lgamma(a) - libm::lgamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    let value = if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    };
    value.clamp(0.0, 1.0)
}

/// Continued fraction for the incomplete beta, evaluated with the modified
/// Lentz method.
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let guard = |v: f64| if v.abs() < FP_MIN { FP_MIN } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;
    for m in 1..=BETACF_MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < BETACF_EPS {
            break;
        }
    }
    h
}
