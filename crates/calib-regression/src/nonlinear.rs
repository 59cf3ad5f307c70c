//! Non-Linear Regression - 带箱式约束的 Levenberg-Marquardt
//!
//! 对模型项的全部自由参数（含平滑参数 gamma）做非线性最小二乘。
//! Jacobian 用前向差分数值估计，每步解阻尼正规方程并把候选点
//! 投影回参数箱内。
//!
//! # 算法
//!
//! 1. 收集各项的自由参数描述符，平滑参数套用调用方给定的区间
//! 2. 迭代：解 `(JᵀJ + λ·diag(JᵀJ))·δ = Jᵀr`，候选点夹回箱内
//! 3. 代价下降则接受并减小 λ，否则增大 λ 重试
//! 4. 代价相对变化低于 `ftol` 或梯度无穷范数低于 `gtol` 时收敛

use crate::error::RegressionError;
use crate::strategy::SVD_EPS;

use calib_model::{CompositeModel, ModelTerm, ParamDict, ParamSpec};
use calib_trajectory::stats::std_dev;
use nalgebra::{DMatrix, DVector};

/// 数值 Jacobian 的相对步长
const JAC_STEP: f64 = 1.4901161193847656e-8; // sqrt(f64::EPSILON)

/// 初始阻尼因子
const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_UP: f64 = 10.0;
const LAMBDA_DOWN: f64 = 0.1;
const LAMBDA_MAX: f64 = 1e12;

/// 求解器收敛设置
#[derive(Debug, Clone, Copy)]
pub struct SolverSettings {
    /// 最大迭代次数
    pub max_iter: usize,
    /// 代价相对变化阈值
    pub ftol: f64,
    /// 梯度无穷范数阈值
    pub gtol: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iter: 100,
            ftol: 1e-10,
            gtol: 1e-10,
        }
    }
}

#[derive(Debug, Clone)]
struct Solved {
    model: CompositeModel,
    residuals: Vec<f64>,
    param_dict: ParamDict,
}

/// 非线性回归
pub struct NonLinearRegression {
    settings: SolverSettings,
    base_model: Option<CompositeModel>,
    terms: Vec<ModelTerm>,
    pos: Vec<f64>,
    vel: Vec<f64>,
    acc: Vec<f64>,
    lhs: Vec<f64>,
    samp_freq: Option<f64>,
    solved: Option<Solved>,
}

impl NonLinearRegression {
    pub fn new(settings: SolverSettings) -> Self {
        Self {
            settings,
            base_model: None,
            terms: Vec::new(),
            pos: Vec::new(),
            vel: Vec::new(),
            acc: Vec::new(),
            lhs: Vec::new(),
            samp_freq: None,
            solved: None,
        }
    }

    /// 加入一个拟合项，其全部自由参数进入优化
    pub fn add_model(&mut self, term: impl Into<ModelTerm>) {
        self.terms.push(term.into());
        self.solved = None;
    }

    /// 设置固定基模型：参与预测但参数不被优化
    ///
    /// 典型用法是把上一阶段拟合好的惯量/偏置模型冻结进来。
    pub fn add_base_model(&mut self, model: CompositeModel) {
        self.base_model = Some(model);
        self.solved = None;
    }

    pub fn set_pos_vel_acc(&mut self, pos: &[f64], vel: &[f64], acc: &[f64]) {
        self.pos = pos.to_vec();
        self.vel = vel.to_vec();
        self.acc = acc.to_vec();
        self.solved = None;
    }

    pub fn set_lhs(&mut self, lhs: &[f64]) {
        self.lhs = lhs.to_vec();
        self.solved = None;
    }

    pub fn set_samp_freq(&mut self, samp_freq: f64) {
        self.samp_freq = Some(samp_freq);
    }

    /// 求解，返回自由参数字典
    ///
    /// `gamma_lower` / `gamma_upper` 仅作用于平滑参数（gamma），
    /// 其余参数保留各自的固有区间。
    ///
    /// # 错误
    ///
    /// - `gamma_lower > gamma_upper` → [`RegressionError::InconsistentBounds`]
    /// - 初值越界 → [`RegressionError::BoundsViolation`]
    /// - 迭代耗尽未收敛，或初值处一步未曾接受 →
    ///   [`RegressionError::Convergence`]（携带末次参数）
    pub fn solve(
        &mut self,
        gamma_lower: f64,
        gamma_upper: f64,
    ) -> Result<ParamDict, RegressionError> {
        if gamma_lower > gamma_upper {
            return Err(RegressionError::InconsistentBounds {
                lower: gamma_lower,
                upper: gamma_upper,
            });
        }
        self.validate_data()?;

        let specs = self.collect_specs(gamma_lower, gamma_upper)?;
        let lower: Vec<f64> = specs.iter().map(|s| s.lower).collect();
        let upper: Vec<f64> = specs.iter().map(|s| s.upper).collect();
        let mut params: Vec<f64> = specs.iter().map(|s| s.value).collect();
        let p = params.len();

        tracing::debug!(
            free_params = p,
            samples = self.pos.len(),
            max_iter = self.settings.max_iter,
            "nonlinear solve"
        );

        let mut residuals = self.residuals_at(&params);
        let mut cost = 0.5 * residuals.norm_squared();
        let mut lambda = LAMBDA_INIT;
        let mut converged = false;
        let mut made_progress = false;
        let mut iterations = 0;

        for iter in 0..self.settings.max_iter {
            iterations = iter + 1;
            let jac = self.numeric_jacobian(&params, &residuals);
            let jtj = jac.transpose() * &jac;
            let jtr = jac.transpose() * &residuals;

            if jtr.amax() <= self.settings.gtol {
                converged = true;
                break;
            }

            // 阻尼子迭代：拒绝步则放大 λ 重解
            let mut step_accepted = false;
            while lambda <= LAMBDA_MAX {
                let mut damped = jtj.clone();
                for j in 0..p {
                    damped[(j, j)] += lambda * jtj[(j, j)].max(SVD_EPS);
                }
                let Some(delta) = damped.lu().solve(&jtr) else {
                    lambda *= LAMBDA_UP;
                    continue;
                };

                let candidate = project(&params, delta.as_slice(), &lower, &upper);
                let cand_residuals = self.residuals_at(&candidate);
                let cand_cost = 0.5 * cand_residuals.norm_squared();

                if cand_cost < cost {
                    let rel_drop = (cost - cand_cost) / cost.max(f64::MIN_POSITIVE);
                    params = candidate;
                    residuals = cand_residuals;
                    cost = cand_cost;
                    lambda = (lambda * LAMBDA_DOWN).max(f64::MIN_POSITIVE);
                    step_accepted = true;
                    made_progress = true;
                    if rel_drop <= self.settings.ftol {
                        converged = true;
                    }
                    break;
                }
                lambda *= LAMBDA_UP;
            }

            tracing::debug!(iter, cost, lambda, accepted = step_accepted, "lm step");

            if !step_accepted {
                if !made_progress {
                    // λ 已放到上限且从初值起一步未接受，按未收敛上报
                    tracing::warn!(cost, "lm rejected every step from the initial guess");
                    break;
                }
                // λ 已放到上限仍无法下降，在当前迭代点停机
                tracing::warn!(iterations, cost, "lm stalled at damping limit, stopping at current iterate");
                converged = true;
            }
            if converged {
                break;
            }
        }

        let param_dict: ParamDict = specs
            .iter()
            .zip(params.iter())
            .map(|(s, &v)| (s.name.clone(), v))
            .collect();

        if !converged {
            return Err(RegressionError::Convergence {
                iterations,
                last_cost: cost,
                last_params: param_dict,
            });
        }

        tracing::debug!(iterations, cost, "nonlinear solve done");

        let model = self.build_model(&params);
        self.solved = Some(Solved {
            model,
            residuals: residuals.as_slice().to_vec(),
            param_dict: param_dict.clone(),
        });
        Ok(param_dict)
    }

    /// 残差序列（observed − predicted），含基模型贡献
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

    pub fn get_param_dict(&self) -> Result<ParamDict, RegressionError> {
        let solved = self.solved.as_ref().ok_or(RegressionError::NotSolved)?;
        Ok(solved.param_dict.clone())
    }

    /// 含基模型与拟合项的完整模型快照
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

    /// 收集自由参数描述符并套用平滑参数区间
    fn collect_specs(
        &self,
        gamma_lower: f64,
        gamma_upper: f64,
    ) -> Result<Vec<ParamSpec>, RegressionError> {
        let mut specs = Vec::new();
        for term in &self.terms {
            for mut spec in term.free_params() {
                if spec.smoothing {
                    spec.lower = gamma_lower;
                    spec.upper = gamma_upper;
                }
                if !spec.in_bounds() {
                    return Err(RegressionError::BoundsViolation {
                        param: spec.name.clone(),
                        value: spec.value,
                        lower: spec.lower,
                        upper: spec.upper,
                    });
                }
                specs.push(spec);
            }
        }
        if specs.is_empty() {
            return Err(RegressionError::NoModel);
        }
        Ok(specs)
    }

    /// 把扁平参数向量按项切片分发，返回更新后的项集合
    fn apply_params(&self, params: &[f64]) -> Vec<ModelTerm> {
        let mut out = Vec::with_capacity(self.terms.len());
        let mut offset = 0;
        for term in &self.terms {
            let count = term.free_params().len();
            let mut updated = term.clone();
            updated.apply_free_params(&params[offset..offset + count]);
            offset += count;
            out.push(updated);
        }
        out
    }

    fn residuals_at(&self, params: &[f64]) -> DVector<f64> {
        let terms = self.apply_params(params);
        let n = self.pos.len();
        let dt = self.samp_freq.map(|f| 1.0 / f).unwrap_or(0.0);
        DVector::from_fn(n, |i, _| {
            let t = i as f64 * dt;
            let mut pred = 0.0;
            if let Some(base) = &self.base_model {
                pred += base.predict(self.pos[i], self.vel[i], self.acc[i], t);
            }
            for term in &terms {
                pred += term.predict(self.pos[i], self.vel[i], self.acc[i], t);
            }
            self.lhs[i] - pred
        })
    }

    /// 前向差分 Jacobian，∂r/∂θ_j
    fn numeric_jacobian(&self, params: &[f64], r0: &DVector<f64>) -> DMatrix<f64> {
        let n = r0.len();
        let p = params.len();
        let mut jac = DMatrix::zeros(n, p);
        let mut perturbed = params.to_vec();
        for j in 0..p {
            let h = JAC_STEP * params[j].abs().max(1.0);
            perturbed[j] = params[j] + h;
            let rj = self.residuals_at(&perturbed);
            perturbed[j] = params[j];
            for i in 0..n {
                jac[(i, j)] = (rj[i] - r0[i]) / h;
            }
        }
        jac
    }

    fn build_model(&self, params: &[f64]) -> CompositeModel {
        let mut model = CompositeModel::new();
        if let Some(base) = &self.base_model {
            for term in base.terms() {
                model.push(term.clone());
            }
        }
        for term in self.apply_params(params) {
            model.push(term);
        }
        model
    }
}

/// 走一步并夹回箱内
fn project(params: &[f64], delta: &[f64], lower: &[f64], upper: &[f64]) -> Vec<f64> {
    params
        .iter()
        .zip(delta)
        .zip(lower.iter().zip(upper))
        .map(|((&x, &d), (&lo, &hi))| (x + d).clamp(lo, hi))
        .collect()
}
