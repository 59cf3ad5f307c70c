//! 初始频率估计
//!
//! 对 `y(x)` 做 FFT，取去除直流分量后的主峰所在频点，
//! 作为正弦拟合的初始角频率。要求 `x` 等间隔采样。

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// 估计信号的主导角频率（rad / x 的单位）
///
/// 返回 `None` 当样本过少、`x` 步长非正、或频谱没有非直流峰。
///
/// # 示例
///
/// ```
/// use calib_regression::estimate_init_freq;
///
/// let x: Vec<f64> = (0..1024).map(|i| i as f64 * 0.01).collect();
/// let y: Vec<f64> = x.iter().map(|&xi| (3.0 * xi).sin()).collect();
/// let w = estimate_init_freq(&x, &y).unwrap();
/// assert!((w - 3.0).abs() < 0.1);
/// ```
pub fn estimate_init_freq(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 4 {
        return None;
    }
    let dx = x[1] - x[0];
    if !(dx > 0.0) {
        return None;
    }

    let mut buffer: Vec<Complex<f64>> = y[..n]
        .iter()
        .map(|&v| Complex::new(v, 0.0))
        .collect();
    FftPlanner::new().plan_fft_forward(n).process(&mut buffer);

    // 只扫正频率半谱，跳过直流 bin
    let half = n / 2;
    let mut best_bin = 0;
    let mut best_mag = 0.0;
    for (k, c) in buffer.iter().enumerate().take(half).skip(1) {
        let mag = c.norm();
        if mag > best_mag {
            best_mag = mag;
            best_bin = k;
        }
    }
    if best_bin == 0 || best_mag == 0.0 {
        return None;
    }

    let freq = best_bin as f64 / (n as f64 * dx);
    Some(2.0 * std::f64::consts::PI * freq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn grid(n: usize, dx: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * dx).collect()
    }

    #[test]
    fn test_pure_sine_frequency() {
        let x = grid(4096, 0.001);
        let w = 2.0 * PI * 37.0; // 37 Hz
        let y: Vec<f64> = x.iter().map(|&xi| (w * xi + 0.3).sin()).collect();

        let est = estimate_init_freq(&x, &y).unwrap();
        assert_relative_eq!(est, w, max_relative = 0.01);
    }

    #[test]
    fn test_dominant_of_two_components() {
        let x = grid(4096, 0.001);
        let w1 = 2.0 * PI * 10.0;
        let w2 = 2.0 * PI * 55.0;
        let y: Vec<f64> = x
            .iter()
            .map(|&xi| 0.2 * (w1 * xi).sin() + 1.0 * (w2 * xi).sin())
            .collect();

        let est = estimate_init_freq(&x, &y).unwrap();
        assert_relative_eq!(est, w2, max_relative = 0.01);
    }

    #[test]
    fn test_dc_offset_ignored() {
        let x = grid(2048, 0.001);
        let w = 2.0 * PI * 20.0;
        let y: Vec<f64> = x.iter().map(|&xi| 5.0 + 0.1 * (w * xi).sin()).collect();

        let est = estimate_init_freq(&x, &y).unwrap();
        assert_relative_eq!(est, w, max_relative = 0.02);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(estimate_init_freq(&[], &[]).is_none());
        assert!(estimate_init_freq(&[0.0, 1.0], &[0.0, 1.0]).is_none());

        // 零步长
        let x = vec![1.0; 64];
        let y: Vec<f64> = (0..64).map(|i| (i as f64).sin()).collect();
        assert!(estimate_init_freq(&x, &y).is_none());

        // 全零信号
        let x = grid(64, 0.01);
        let y = vec![0.0; 64];
        assert!(estimate_init_freq(&x, &y).is_none());
    }
}
