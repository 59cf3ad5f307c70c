//! 拟合质量统计（纯函数）
//!
//! - RMSE: 均方根误差
//! - NRMSE: 用参考信号标准差归一化的 RMSE，尺度无关

/// 总体标准差
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|&x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64;

    variance.sqrt()
}

/// 均方根误差
///
/// 两序列长度取较短者（容忍仿真输出比实测短 2 个样本的场景由调用方截断）。
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }

    let sum_sq = actual
        .iter()
        .zip(predicted.iter())
        .take(n)
        .map(|(a, p)| {
            let diff = a - p;
            diff * diff
        })
        .sum::<f64>();

    (sum_sq / n as f64).sqrt()
}

/// 归一化均方根误差：`rmse / std(predicted)`
///
/// 参考信号为常数（零标准差）时返回 `f64::INFINITY`，
/// 调用方据此判断拟合无意义，而不是拿到被静默替换的数值。
pub fn nrmse(actual: &[f64], predicted: &[f64]) -> f64 {
    let sd = std_dev(predicted);
    if sd == 0.0 {
        return f64::INFINITY;
    }
    rmse(actual, predicted) / sd
}
