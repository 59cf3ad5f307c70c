//! Linear Regression - 线性项的设计矩阵求解
//!
//! 由一组线性 [`ModelTerm`] 构建设计矩阵 `X`，按策略求解
//! `X·β ≈ lhs`，把系数写回项的独立副本并导出参数字典。
//!
//! 求解不修改外部轨迹数据，也不修改加入的原始项：
//! 每次 `solve()` 都从原始项重新克隆，因此确定性策略下
//! 重复求解得到逐位一致的结果。

use crate::design::{build_design_matrix, total_coeffs};
use crate::error::RegressionError;
use crate::strategy::LinearStrategy;

use calib_model::{CompositeModel, ModelTerm, ParamDict};
use calib_trajectory::stats::std_dev;
use nalgebra::{DMatrix, DVector};

/// 求解完成后的内部快照
#[derive(Debug, Clone)]
struct Solved {
    model: CompositeModel,
    residuals: Vec<f64>,
    param_dict: ParamDict,
}

/// 线性回归
pub struct LinearRegression {
    strategy: LinearStrategy,
    terms: Vec<ModelTerm>,
    pos: Vec<f64>,
    vel: Vec<f64>,
    acc: Vec<f64>,
    lhs: Vec<f64>,
    samp_freq: Option<f64>,
    solved: Option<Solved>,
}

impl LinearRegression {
    /// 创建线性回归，指定求解策略
    pub fn new(strategy: LinearStrategy) -> Self {
        Self {
            strategy,
            terms: Vec::new(),
            pos: Vec::new(),
            vel: Vec::new(),
            acc: Vec::new(),
            lhs: Vec::new(),
            samp_freq: None,
            solved: None,
        }
    }

    /// 加入一个线性模型项
    ///
    /// # 错误
    ///
    /// 项在当前参数下非线性（自由 gamma / 自由频率）→
    /// [`RegressionError::NonLinearTerm`]
    pub fn add_model(&mut self, term: impl Into<ModelTerm>) -> Result<(), RegressionError> {
        let term = term.into();
        if !term.is_linear() {
            return Err(RegressionError::NonLinearTerm);
        }
        self.terms.push(term);
        self.solved = None;
        Ok(())
    }

    /// 设置位置 / 速度 / 加速度通道（复制为内部副本）
    pub fn set_pos_vel_acc(&mut self, pos: &[f64], vel: &[f64], acc: &[f64]) {
        self.pos = pos.to_vec();
        self.vel = vel.to_vec();
        self.acc = acc.to_vec();
        self.solved = None;
    }

    /// 设置回归目标（通常为已去除偏置/纹波的力矩）
    pub fn set_lhs(&mut self, lhs: &[f64]) {
        self.lhs = lhs.to_vec();
        self.solved = None;
    }

    /// 设置采样频率（Hz）
    pub fn set_samp_freq(&mut self, samp_freq: f64) {
        self.samp_freq = Some(samp_freq);
    }

    /// 求解并返回参数字典
    ///
    /// # 错误
    ///
    /// - 数据缺失 / 样本数不一致 → [`RegressionError::DataNotSet`] /
    ///   [`RegressionError::SampleCountMismatch`]
    /// - 设计矩阵秩亏 → [`RegressionError::RankDeficient`]
    pub fn solve(&mut self) -> Result<ParamDict, RegressionError> {
        self.validate_data()?;

        let m = total_coeffs(&self.terms);
        let n = self.pos.len();
        if n < m {
            return Err(RegressionError::RankDeficient { rank: n, cols: m });
        }

        let x = build_design_matrix(&self.terms, &self.pos, &self.vel, &self.acc);
        let y = DVector::from_column_slice(&self.lhs);

        tracing::debug!(samples = n, coeffs = m, strategy = ?self.strategy, "linear solve");
        let beta = self.strategy.solve(&x, &y)?;

        let model = self.write_back(beta.as_slice());
        let residuals = compute_residuals(&x, &y, &beta);
        let param_dict = model.get_param_dict()?;

        tracing::debug!(
            residual_norm = residuals.iter().map(|r| r * r).sum::<f64>().sqrt(),
            "linear solve done"
        );

        self.solved = Some(Solved {
            model,
            residuals,
            param_dict: param_dict.clone(),
        });
        Ok(param_dict)
    }

    /// 残差序列（observed − predicted）
    ///
    /// `equalized` 时残差按目标信号标准差归一化，
    /// 便于跨不同尺度的拟合互相比较。
    ///
    /// # 错误
    ///
    /// 未求解 → [`RegressionError::NotSolved`]
    pub fn get_prediction_error(&self, equalized: bool) -> Result<Vec<f64>, RegressionError> {
        let solved = self.solved.as_ref().ok_or(RegressionError::NotSolved)?;
        if !equalized {
            return Ok(solved.residuals.clone());
        }

        let scale = std_dev(&self.lhs);
        if scale == 0.0 {
            return Ok(solved.residuals.clone());
        }
        Ok(solved.residuals.iter().map(|r| r / scale).collect())
    }

    /// 已求解参数字典
    pub fn get_param_dict(&self) -> Result<ParamDict, RegressionError> {
        let solved = self.solved.as_ref().ok_or(RegressionError::NotSolved)?;
        Ok(solved.param_dict.clone())
    }

    /// 冻结系数后的模型独立快照
    ///
    /// 快照与求解器内部状态完全解耦：之后对本实例的任何操作
    /// 不影响已返回的模型。
    pub fn get_model_copy(&self) -> Result<CompositeModel, RegressionError> {
        let solved = self.solved.as_ref().ok_or(RegressionError::NotSolved)?;
        Ok(solved.model.clone())
    }

    fn validate_data(&self) -> Result<(), RegressionError> {
        if self.terms.is_empty() {
            return Err(RegressionError::NoModel);
        }
        if self.pos.is_empty() {
            return Err(RegressionError::DataNotSet("pos/vel/acc"));
        }
        if self.lhs.is_empty() {
            return Err(RegressionError::DataNotSet("lhs"));
        }

        let n = self.pos.len();
        for (channel, len) in [
            ("vel", self.vel.len()),
            ("acc", self.acc.len()),
            ("lhs", self.lhs.len()),
        ] {
            if len != n {
                return Err(RegressionError::SampleCountMismatch {
                    channel,
                    got: len,
                    expected: n,
                });
            }
        }
        Ok(())
    }

    /// 把 β 按列序切片写回各项的副本，组装快照模型
    fn write_back(&self, beta: &[f64]) -> CompositeModel {
        let mut model = CompositeModel::new();
        let mut offset = 0;
        for term in &self.terms {
            let count = term.linear_coeff_count();
            let mut fitted = term.clone();
            fitted.apply_linear_coeffs(&beta[offset..offset + count]);
            offset += count;
            model.push(fitted);
        }
        model
    }
}

fn compute_residuals(x: &DMatrix<f64>, y: &DVector<f64>, beta: &DVector<f64>) -> Vec<f64> {
    (y - x * beta).as_slice().to_vec()
}
