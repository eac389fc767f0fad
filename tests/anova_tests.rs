use proptest::prelude::*;
use salvo::{f_survival, one_way_anova, regularized_beta, ComparisonError};

#[test]
fn identical_groups_have_zero_f() {
    let a = [50, 60, 70];
    let b = [50, 60, 70];
    let result = one_way_anova(&[("a", &a[..]), ("b", &b[..])]).unwrap();
    assert_eq!(result.f_statistic, 0.0);
    assert!((result.p_value - 1.0).abs() < 1e-12);
    assert_eq!(result.df_between, 1);
    assert_eq!(result.df_within, 4);
}

#[test]
fn textbook_example() {
    // means 5, 9 and 7; SSB = 24, SSW = 6
    let a = [4, 5, 6];
    let b = [8, 9, 10];
    let c = [6, 7, 8];
    let result = one_way_anova(&[("a", &a[..]), ("b", &b[..]), ("c", &c[..])]).unwrap();
    assert!((result.ss_between - 24.0).abs() < 1e-9);
    assert!((result.ss_within - 6.0).abs() < 1e-9);
    assert!((result.f_statistic - 12.0).abs() < 1e-9);
    // for d1 = 2 the survival function is (1 + 2F/d2)^(-d2/2)
    let expected = (1.0f64 + 2.0 * 12.0 / 6.0).powf(-3.0);
    assert!((result.p_value - expected).abs() < 1e-9);
}

#[test]
fn constant_groups_that_differ() {
    let a = [30, 30, 30];
    let b = [40, 40, 40];
    let result = one_way_anova(&[("a", &a[..]), ("b", &b[..])]).unwrap();
    assert!(result.f_statistic.is_infinite());
    assert_eq!(result.p_value, 0.0);
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["f_statistic"].is_null());
}

#[test]
fn degenerate_inputs_rejected() {
    let a = [1, 2, 3];
    assert_eq!(
        one_way_anova(&[("a", &a[..])]).unwrap_err(),
        ComparisonError::TooFewGroups(1)
    );
    assert_eq!(
        one_way_anova(&[("a", &a[..]), ("b", &[][..])]).unwrap_err(),
        ComparisonError::EmptyGroup("b".to_string())
    );
}

#[test]
fn single_sample_groups() {
    let same = one_way_anova(&[("a", &[42][..]), ("b", &[42][..])]).unwrap();
    assert_eq!(same.df_within, 0);
    assert_eq!(same.f_statistic, 0.0);
    assert_eq!(same.p_value, 1.0);

    let apart = one_way_anova(&[("a", &[1][..]), ("b", &[2][..])]).unwrap();
    assert_eq!(apart.df_within, 0);
    assert!(apart.f_statistic.is_infinite());
    assert_eq!(apart.p_value, 0.0);
}

#[test]
fn incomplete_beta_reference_values() {
    assert_eq!(regularized_beta(0.0, 2.0, 3.0), 0.0);
    assert_eq!(regularized_beta(1.0, 2.0, 3.0), 1.0);
    // I_x(1, 1) = x and I_x(a, 1) = x^a
    assert!((regularized_beta(0.3, 1.0, 1.0) - 0.3).abs() < 1e-12);
    assert!((regularized_beta(0.5, 3.0, 1.0) - 0.125).abs() < 1e-12);
    assert!((regularized_beta(0.5, 2.5, 2.5) - 0.5).abs() < 1e-12);
    assert_eq!(f_survival(0.0, 3.0, 10.0), 1.0);
}

proptest! {
    #[test]
    fn anova_outputs_in_range(
        a in prop::collection::vec(17usize..=100, 2..50),
        b in prop::collection::vec(17usize..=100, 2..50),
    ) {
        let result = one_way_anova(&[("a", &a[..]), ("b", &b[..])]).unwrap();
        prop_assert!(result.f_statistic >= 0.0);
        prop_assert!((0.0..=1.0).contains(&result.p_value));
        prop_assert_eq!(result.df_within, a.len() + b.len() - 2);
    }

    #[test]
    fn shifted_copy_has_same_within_variance(a in prop::collection::vec(17usize..=90, 2..50)) {
        let b: Vec<usize> = a.iter().map(|&x| x + 10).collect();
        let r1 = one_way_anova(&[("a", &a[..]), ("a2", &a[..])]).unwrap();
        let r2 = one_way_anova(&[("a", &a[..]), ("b", &b[..])]).unwrap();
        prop_assert!((r1.ss_within - r2.ss_within).abs() < 1e-6);
        prop_assert!(r1.ss_between.abs() < 1e-9);
    }
}
