//! Composite Model - 模型项的求和组合
//!
//! 独占持有一组有序的 [`ModelTerm`]（只增不删）；预测为各项之和。
//! 回归求解返回的 `model_copy` 是独立快照（`Clone`），
//! 不与仍在求解中的实例共享任何状态。

use crate::error::ModelError;
use crate::param::{ParamDict, lookup};
use crate::terms::ModelTerm;

/// 模型项的求和组合
///
/// `predict = Σ term.predict(...)`。顺序不影响预测，
/// 但决定 [`Self::get_param_dict`] 的键顺序来源。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeModel {
    terms: Vec<ModelTerm>,
}

impl CompositeModel {
    /// 空组合
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// 追加一个项（获取所有权）
    pub fn push(&mut self, term: impl Into<ModelTerm>) {
        self.terms.push(term.into());
    }

    /// 所有项
    pub fn terms(&self) -> &[ModelTerm] {
        &self.terms
    }

    /// 项的个数
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 所有项的预测之和
    pub fn predict(&self, pos: f64, vel: f64, acc: f64, t: f64) -> f64 {
        self.terms
            .iter()
            .map(|term| term.predict(pos, vel, acc, t))
            .sum()
    }

    /// 合并导出所有项的参数字典
    ///
    /// # 错误
    ///
    /// 两个项声明同名参数 → [`ModelError::DuplicateParameter`]。
    /// 这是配置错误：立即上抛，不做静默去重。
    pub fn get_param_dict(&self) -> Result<ParamDict, ModelError> {
        let mut dict: ParamDict = Vec::new();
        for term in &self.terms {
            for (name, value) in term.param_dict() {
                if dict.iter().any(|(n, _)| *n == name) {
                    return Err(ModelError::DuplicateParameter { name });
                }
                dict.push((name, value));
            }
        }
        Ok(dict)
    }

    /// 按名字查找参数值（仿真用它取 `motor_inertia`）
    pub fn param(&self, name: &str) -> Option<f64> {
        for term in &self.terms {
            let dict = term.param_dict();
            if let Some(v) = lookup(&dict, name) {
                return Some(v);
            }
        }
        None
    }
}
