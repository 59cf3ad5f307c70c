//! 线性求解策略
//!
//! - [`lsq_pseudoinv_strategy`] - SVD 伪逆普通最小二乘。
//!   i.i.d. 高斯噪声下最优，对离群点敏感。
//! - [`huber_regr_strategy`] - Huber 损失鲁棒回归（IRLS 实现）。
//!   力矩日志在换向瞬间常含瞬态离群点，因此作为默认策略。
//! - [`bounded_lsq_strategy`] - 箱式边界最小二乘。
//!   物理参数必须落在可行域时使用（例如惯量非负）。

use crate::error::RegressionError;
use nalgebra::{DMatrix, DVector};

/// SVD 奇异值截断阈值
pub(crate) const SVD_EPS: f64 = 1e-10;

/// Huber IRLS 的最大迭代数与收敛容差
const HUBER_MAX_ITER: usize = 50;
const HUBER_TOL: f64 = 1e-10;

/// 线性求解策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinearStrategy {
    /// 普通最小二乘（SVD 伪逆）
    LsqPseudoinv,
    /// Huber 鲁棒回归，`delta` 为标准化残差的权重拐点
    Huber {
        /// 权重拐点（标准化残差单位）
        delta: f64,
    },
    /// 箱式边界最小二乘，边界广播到所有系数
    BoundedLsq {
        /// 系数下界
        lower: f64,
        /// 系数上界
        upper: f64,
    },
}

/// 普通最小二乘策略
pub fn lsq_pseudoinv_strategy() -> LinearStrategy {
    LinearStrategy::LsqPseudoinv
}

/// Huber 鲁棒回归策略（默认拐点 1.345，接近高斯时效率 95%）
pub fn huber_regr_strategy() -> LinearStrategy {
    LinearStrategy::Huber { delta: 1.345 }
}

/// 箱式边界最小二乘策略
pub fn bounded_lsq_strategy(lower: f64, upper: f64) -> LinearStrategy {
    LinearStrategy::BoundedLsq { lower, upper }
}

impl LinearStrategy {
    /// 求解 `X·β ≈ y`
    ///
    /// 调用方保证 X 列满秩（LinearRegression 已做秩检查）。
    pub(crate) fn solve(
        &self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
    ) -> Result<DVector<f64>, RegressionError> {
        match *self {
            Self::LsqPseudoinv => solve_ols(x, y),
            Self::Huber { delta } => solve_huber(x, y, delta),
            Self::BoundedLsq { lower, upper } => {
                if lower > upper {
                    return Err(RegressionError::InconsistentBounds { lower, upper });
                }
                solve_bounded(x, y, lower, upper)
            }
        }
    }
}

/// SVD 伪逆最小二乘
fn solve_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, RegressionError> {
    let cols = x.ncols();
    let svd = x.clone().svd(true, true);
    let rank = svd.rank(SVD_EPS);
    if rank < cols {
        return Err(RegressionError::RankDeficient { rank, cols });
    }

    let pinv = svd
        .pseudo_inverse(SVD_EPS)
        .map_err(|_| RegressionError::RankDeficient { rank, cols })?;
    Ok(&pinv * y)
}

/// Huber IRLS：残差超过 `delta · scale` 的样本按反比降权
///
/// scale 用 MAD 估计（对离群点本身鲁棒）。
fn solve_huber(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    delta: f64,
) -> Result<DVector<f64>, RegressionError> {
    let mut beta = solve_ols(x, y)?;

    for iter in 0..HUBER_MAX_ITER {
        let residuals = y - x * &beta;
        let scale = mad_scale(residuals.as_slice()).max(1e-12);

        // 加权行缩放后重新最小二乘
        let mut xw = x.clone();
        let mut yw = y.clone();
        for i in 0..residuals.len() {
            let r = residuals[i].abs() / scale;
            let w = if r <= delta { 1.0 } else { delta / r };
            let sw = w.sqrt();
            xw.row_mut(i).scale_mut(sw);
            yw[i] *= sw;
        }

        let next = solve_ols(&xw, &yw)?;
        let step = (&next - &beta).norm();
        let converged = step <= HUBER_TOL * (1.0 + beta.norm());
        beta = next;

        if converged {
            tracing::debug!(iterations = iter + 1, "huber IRLS converged");
            break;
        }
    }

    Ok(beta)
}

/// 箱式边界最小二乘：无约束解越界的系数钳位并固定，
/// 剩余自由系数对扣除固定贡献后的残差重新求解。
/// 每轮至少固定一个系数，最多 m 轮，确定性终止。
fn solve_bounded(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    lower: f64,
    upper: f64,
) -> Result<DVector<f64>, RegressionError> {
    let m = x.ncols();
    let mut beta = solve_ols(x, y)?;
    let mut fixed = vec![false; m];

    for _ in 0..m {
        // 本轮钳位越界系数
        let mut clamped_any = false;
        for j in 0..m {
            if fixed[j] {
                continue;
            }
            if beta[j] < lower {
                beta[j] = lower;
                fixed[j] = true;
                clamped_any = true;
            } else if beta[j] > upper {
                beta[j] = upper;
                fixed[j] = true;
                clamped_any = true;
            }
        }
        if !clamped_any {
            break;
        }

        let free: Vec<usize> = (0..m).filter(|&j| !fixed[j]).collect();
        if free.is_empty() {
            break;
        }

        // y' = y − X_fixed · β_fixed
        let mut y_free = y.clone();
        for j in 0..m {
            if fixed[j] {
                y_free -= x.column(j) * beta[j];
            }
        }

        let x_free = x.select_columns(free.iter());
        let beta_free = solve_ols(&x_free, &y_free)?;
        for (idx, &j) in free.iter().enumerate() {
            beta[j] = beta_free[idx];
        }
    }

    // 最终解保证在界内
    for j in 0..m {
        beta[j] = beta[j].clamp(lower, upper);
    }
    Ok(beta)
}

/// MAD 尺度估计：`1.4826 · median(|r − median(r)|)`
fn mad_scale(residuals: &[f64]) -> f64 {
    let med = median(residuals);
    let abs_dev: Vec<f64> = residuals.iter().map(|r| (r - med).abs()).collect();
    1.4826 * median(&abs_dev)
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}
