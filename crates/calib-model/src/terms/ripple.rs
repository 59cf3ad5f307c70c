//! 力矩纹波项：位置周期性正弦叠加
//!
//! `predict(pos) = Σ_{k=1..n} A_k · sin(w_k·pos + p_k) + c`
//!
//! 频率固定为机械转一圈的整数次谐波时（默认 1、2、3 倍），
//! 经 `A·sin(w·pos + p) = a·sin(w·pos) + b·cos(w·pos)` 分解，
//! 项对 (a, b, c) 线性；显式请求频率搜索（`fit_w`）则转入
//! 非线性路径，初始频率由力矩-位置信号的 FFT 主峰估计
//! （估计器在回归层）。

use crate::error::ModelError;
use crate::param::{ParamDict, ParamSpec};

use super::BasisRow;
use smallvec::SmallVec;

/// 拟合代码支持的最大谐波个数（封闭集合）
pub const MAX_HARMONICS: usize = 3;

/// 单个谐波的参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Harmonic {
    /// 幅值 A_k（Nm，非负）
    pub ampl: f64,
    /// 角频率 w_k（rad/rad，对机械位置）
    pub omega: f64,
    /// 相位 p_k（rad）
    pub phase: f64,
}

/// 力矩纹波项
#[derive(Debug, Clone, PartialEq)]
pub struct TorqueRippleSinPhase {
    harmonics: SmallVec<[Harmonic; MAX_HARMONICS]>,
    /// 常数偏置 c（Nm）
    pub c: f64,
    /// 是否把频率作为自由参数（转入非线性路径）
    pub fit_w: bool,
}

impl TorqueRippleSinPhase {
    /// 创建纹波项
    ///
    /// 第 k 个谐波初始化为：幅值 `init_ampl / 2^k`、
    /// 频率 `k · init_freq`、相位 0。基波频率 `init_freq` 取 1.0
    /// 即机械转一圈的整数次谐波。
    ///
    /// # 错误
    ///
    /// `num_of_sin ∉ {1, 2, 3}` → [`ModelError::UnsupportedHarmonics`]
    pub fn new(num_of_sin: usize, init_ampl: f64, init_freq: f64) -> Result<Self, ModelError> {
        if num_of_sin == 0 || num_of_sin > MAX_HARMONICS {
            return Err(ModelError::UnsupportedHarmonics { got: num_of_sin });
        }

        let harmonics = (1..=num_of_sin)
            .map(|k| Harmonic {
                ampl: init_ampl / (1 << k) as f64,
                omega: k as f64 * init_freq,
                phase: 0.0,
            })
            .collect();

        Ok(Self {
            harmonics,
            c: 0.0,
            fit_w: false,
        })
    }

    /// 设置频率是否自由
    pub fn with_fit_w(mut self, fit_w: bool) -> Self {
        self.fit_w = fit_w;
        self
    }

    /// 直接给定谐波参数（仿真 / 合成数据场景）
    ///
    /// # 错误
    ///
    /// 谐波个数超出支持集合 → [`ModelError::UnsupportedHarmonics`]
    pub fn from_harmonics(harmonics: &[Harmonic], c: f64) -> Result<Self, ModelError> {
        if harmonics.is_empty() || harmonics.len() > MAX_HARMONICS {
            return Err(ModelError::UnsupportedHarmonics {
                got: harmonics.len(),
            });
        }
        Ok(Self {
            harmonics: SmallVec::from_slice(harmonics),
            c,
            fit_w: false,
        })
    }

    /// 谐波个数
    pub fn num_of_sin(&self) -> usize {
        self.harmonics.len()
    }

    /// 谐波参数
    pub fn harmonics(&self) -> &[Harmonic] {
        &self.harmonics
    }

    /// 该项的力矩贡献
    pub fn predict(&self, pos: f64) -> f64 {
        self.harmonics
            .iter()
            .map(|h| h.ampl * (h.omega * pos + h.phase).sin())
            .sum::<f64>()
            + self.c
    }

    pub(crate) fn linear_coeff_names(&self) -> Vec<String> {
        if self.fit_w {
            return Vec::new();
        }
        let mut names = Vec::with_capacity(2 * self.harmonics.len() + 1);
        for k in 1..=self.harmonics.len() {
            names.push(format!("a{k}_sin"));
            names.push(format!("a{k}_cos"));
        }
        names.push("c".to_string());
        names
    }

    pub(crate) fn linear_basis_row(&self, pos: f64) -> BasisRow {
        let mut row = SmallVec::with_capacity(2 * self.harmonics.len() + 1);
        for h in &self.harmonics {
            row.push((h.omega * pos).sin());
            row.push((h.omega * pos).cos());
        }
        row.push(1.0);
        row
    }

    /// sin/cos 系数 → 幅值/相位：`a·sin + b·cos = hypot(a,b)·sin(· + atan2(b,a))`
    pub(crate) fn apply_linear_coeffs(&mut self, beta: &[f64]) {
        for (k, h) in self.harmonics.iter_mut().enumerate() {
            let a = beta[2 * k];
            let b = beta[2 * k + 1];
            h.ampl = a.hypot(b);
            h.phase = b.atan2(a);
        }
        self.c = beta[2 * self.harmonics.len()];
    }

    pub(crate) fn param_dict(&self) -> ParamDict {
        let mut dict = Vec::with_capacity(3 * self.harmonics.len() + 1);
        for (k, h) in self.harmonics.iter().enumerate() {
            let k = k + 1;
            dict.push((format!("a{k}"), h.ampl));
            dict.push((format!("w{k}"), h.omega));
            dict.push((format!("p{k}"), h.phase));
        }
        dict.push(("c".to_string(), self.c));
        dict
    }

    pub(crate) fn free_params(&self) -> Vec<ParamSpec> {
        let mut specs = Vec::with_capacity(3 * self.harmonics.len() + 1);
        for (k, h) in self.harmonics.iter().enumerate() {
            let k = k + 1;
            specs.push(ParamSpec::coefficient(format!("a{k}"), h.ampl));
            if self.fit_w {
                // 频率必须为正，否则相位不可辨识
                specs.push(ParamSpec::bounded(
                    format!("w{k}"),
                    h.omega,
                    f64::EPSILON,
                    f64::INFINITY,
                ));
            }
            specs.push(ParamSpec::coefficient(format!("p{k}"), h.phase));
        }
        specs.push(ParamSpec::coefficient("c", self.c));
        specs
    }

    pub(crate) fn apply_free_params(&mut self, values: &[f64]) {
        let mut i = 0;
        for h in self.harmonics.iter_mut() {
            h.ampl = values[i];
            i += 1;
            if self.fit_w {
                h.omega = values[i];
                i += 1;
            }
            h.phase = values[i];
            i += 1;
        }
        self.c = values[i];
    }
}
