//! End-to-end scenarios across the kernel families.

use assert_approx_eq::assert_approx_eq;

use ta_rolling::{
    Error, Rolling, Strided, extrema, moments,
    rank::{self, RankOptions},
    regression, weighted,
};

fn assert_nan_prefix(out: &[f64], len: usize) {
    for (i, v) in out.iter().take(len).enumerate() {
        assert!(v.is_nan(), "position {i} should be NaN, got {v}");
    }
}

#[test]
fn sum_and_mean_of_dense_series() {
    let input = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
    let sum = input.ts_sum(3, 1).unwrap();
    let sma = input.ts_sma(3, 1).unwrap();

    assert_nan_prefix(&sum, 2);
    assert_nan_prefix(&sma, 2);
    assert_eq!(&sum[2..], &[6.0, 9.0, 12.0]);
    assert_eq!(&sma[2..], &[2.0, 3.0, 4.0]);
}

#[test]
fn sum_and_mean_skip_missing_values() {
    let input = [1.0_f64, f64::NAN, 3.0, 4.0, 5.0];
    let sum = input.ts_sum(3, 2).unwrap();
    let sma = input.ts_sma(3, 2).unwrap();

    assert_eq!(sum[2], 4.0);
    assert_eq!(sma[2], 2.0);
    assert_eq!(sum[3], 7.0);
    assert_eq!(sma[3], 3.5);
    assert_eq!(sum[4], 12.0);
}

#[test]
fn max_and_argmax_of_short_series() {
    let input = [3.0_f64, 1.0, 2.0];
    let max = input.ts_max(3, 1).unwrap();
    let argmax = input.ts_argmax(3, 1).unwrap();

    assert_nan_prefix(&max, 2);
    assert_nan_prefix(&argmax, 2);
    assert_eq!(max[2], 3.0);
    assert_eq!(argmax[2], 1.0);
}

#[test]
fn window_below_min_periods_fills_nan() {
    let input = [1.0_f64, 2.0, 3.0, 4.0];
    for out in [
        input.ts_sum(2, 3).unwrap(),
        input.ts_max(2, 3).unwrap(),
        input.ts_wma(2, 3).unwrap(),
        input.ts_rank(2, 3, RankOptions::new()).unwrap(),
        input.ts_reg(2, 3).unwrap(),
    ] {
        assert!(out.iter().all(|v| v.is_nan()));
    }
}

#[test]
fn zero_window_fills_nan() {
    let input = [1.0_f64, 2.0, 3.0];
    assert!(input.ts_sma(0, 0).unwrap().iter().all(|v| v.is_nan()));
    assert!(input.ts_std(0, 0).unwrap().iter().all(|v| v.is_nan()));
}

#[test]
fn floors_raise_min_periods() {
    let input = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
    // three values never satisfy the kurtosis floor of four
    assert!(input.ts_kurt(3, 1).unwrap().iter().all(|v| v.is_nan()));
    // two values satisfy the deviation floor
    let std = input.ts_std(2, 0).unwrap();
    assert_approx_eq!(std[1], 0.5_f64.sqrt(), 1e-12);
}

#[test]
fn empty_input_writes_nothing() {
    let input: [f64; 0] = [];
    let mut out: [f64; 0] = [];
    assert!(moments::sum(&input, &mut out[..], 3, 1).is_ok());
    assert!(input.ts_rank(3, 1, RankOptions::new()).unwrap().is_empty());
}

#[test]
fn mismatched_output_is_an_error() {
    let input = [1.0_f64, 2.0, 3.0];
    let mut out = [0.0_f64; 4];
    assert_eq!(
        extrema::min(&input, &mut out[..], 2, 1),
        Err(Error::LengthMismatch {
            expected: 3,
            actual: 4
        })
    );
}

#[test]
fn strided_output_leaves_gaps_untouched() {
    let input = [1.0_f64, 2.0, 3.0, 4.0];
    let mut buf = [-1.0_f64; 10];
    let mut out = Strided::new(&mut buf, input.len(), 3).unwrap();
    assert_eq!(out.stride(), 3);
    moments::sum(&input, &mut out, 2, 1).unwrap();

    assert!(buf[0].is_nan());
    assert_eq!(buf[3], 3.0);
    assert_eq!(buf[6], 5.0);
    assert_eq!(buf[9], 7.0);
    for i in [1, 2, 4, 5, 7, 8] {
        assert_eq!(buf[i], -1.0);
    }
}

#[test]
fn strided_output_rejects_short_buffer() {
    let mut buf = [0.0_f64; 9];
    assert_eq!(
        Strided::new(&mut buf, 4, 3).unwrap_err(),
        Error::BufferTooShort {
            required: 10,
            actual: 9
        }
    );
}

#[test]
fn infinity_propagates_through_running_sums() {
    let input = [1.0_f64, f64::INFINITY, 2.0, 3.0];
    assert_eq!(input.ts_sum(2, 1).unwrap()[1..], [f64::INFINITY, f64::INFINITY, 5.0]);
    assert_eq!(input.ts_sma(2, 1).unwrap()[1..], [f64::INFINITY, f64::INFINITY, 2.5]);
    let wma = input.ts_wma(2, 1).unwrap();
    assert_eq!(wma[1], f64::INFINITY);
    assert_approx_eq!(wma[3], 8.0 / 3.0, 1e-12);
}

#[test]
fn overflowing_sum_is_infinite() {
    let input = [1e308_f64, 1e308, 1.0];
    let sum = input.ts_sum(2, 1).unwrap();
    assert_eq!(sum[1], f64::INFINITY);
    assert_eq!(sum[2], 1e308);
}

#[test]
fn infinity_is_forgotten_once_it_leaves() {
    let input = [1.0_f64, f64::INFINITY, 2.0, 3.0, 4.0];
    let sum = input.ts_sum(2, 1).unwrap();
    let std = input.ts_std(2, 1).unwrap();

    assert_eq!(sum[3], 5.0);
    assert_eq!(sum[4], 7.0);
    assert_approx_eq!(std[3], 0.5_f64.sqrt(), 1e-12);
    assert_approx_eq!(std[4], 0.5_f64.sqrt(), 1e-12);
}

#[test]
fn percentage_and_reversed_rank() {
    let input = [4.0_f64, 2.0, 8.0, 6.0];
    let mut options = RankOptions::new();
    options.set_pct(true);
    let pct = input.ts_rank(4, 1, options).unwrap();
    assert_eq!(pct[3], 0.75);

    let mut out = [0.0_f64; 4];
    let mut options = RankOptions::new();
    options.set_rev(true);
    rank::rank(&[1.0_f64, 9.0, 3.0, 9.5], &mut out[..], 4, 1, options).unwrap();
    assert_eq!(out[3], 1.0);
}

#[test]
fn regression_on_second_sequence_recovers_line() {
    let x = [0.5_f64, 1.5, -2.0, 4.0, 3.0, 7.0];
    let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();

    let beta = y.ts_regx_beta(&x, 4, 2).unwrap();
    let alpha = y.ts_regx_alpha(&x, 4, 2).unwrap();
    let resid = y.ts_regx_resid_std(&x, 4, 2).unwrap();

    assert_nan_prefix(&beta, 3);
    for i in 3..x.len() {
        assert_approx_eq!(beta[i], 2.0, 1e-9);
        assert_approx_eq!(alpha[i], 1.0, 1e-9);
        assert_approx_eq!(resid[i], 0.0, 1e-9);
    }
}

#[test]
fn residual_statistics_of_a_spike() {
    let x = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
    let y = [0.0_f64, 0.0, 10.0, 0.0, 0.0];

    assert_approx_eq!(y.ts_reg_resid_mean(5, 1).unwrap()[4], 16.0, 1e-9);
    assert_approx_eq!(y.ts_regx_resid_mean(&x, 5, 1).unwrap()[4], 0.0, 1e-9);
    assert_approx_eq!(y.ts_regx_resid_std(&x, 5, 1).unwrap()[4], 20.0_f64.sqrt(), 1e-9);
    assert_approx_eq!(y.ts_regx_resid_skew(&x, 5, 1).unwrap()[4], 5.0_f64.sqrt(), 1e-9);
}

#[test]
fn trend_forecast_extends_linear_series() {
    let input = [10.0_f64, 12.0, 14.0, 16.0, 18.0];
    let mut out = [0.0_f64; 5];
    regression::tsf(&input, &mut out[..], 4, 1).unwrap();
    assert_approx_eq!(out[3], 18.0, 1e-9);
    assert_approx_eq!(out[4], 20.0, 1e-9);

    let slope = input.ts_reg_slope(4, 1).unwrap();
    assert_approx_eq!(slope[4], 2.0, 1e-9);
}

#[test]
fn exponential_average_with_generated_weights() {
    let input = [1.0_f64, 2.0, 3.0, 4.0];
    let weights = weighted::ema_weights::<f64>(4);
    let mut out = [0.0_f64; 4];
    weighted::ema(&input, &weights, &mut out[..], 4, 1).unwrap();

    let expected: f64 = input.iter().zip(&weights).map(|(v, w)| v * w).sum();
    assert_approx_eq!(out[3], expected, 1e-12);
    assert_eq!(input.ts_ewm(4, 1).unwrap()[3], out[3]);
}

#[test]
fn single_precision_is_supported() {
    let input = [1.0_f32, 2.0, 3.0, 4.0];
    let out = input.ts_sma(2, 1).unwrap();
    assert_eq!(&out[1..], &[1.5_f32, 2.5, 3.5]);
}
