//! 模型层错误类型定义

use thiserror::Error;

/// 模型配置错误类型
///
/// 配置错误不重试：立即上抛并中止本次拟合。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// 不支持的谐波个数（拟合代码只支持 1~3）
    #[error("unsupported number of sinusoids: {got} (supported: 1, 2 or 3)")]
    UnsupportedHarmonics {
        /// 请求的谐波个数
        got: usize,
    },

    /// 组合模型中两个项声明了同名参数
    #[error("duplicate parameter name across terms: {name}")]
    DuplicateParameter {
        /// 冲突的参数名
        name: String,
    },

    /// 平滑常数非法（必须为正，否则摩擦项不可微分）
    #[error("invalid smoothing constant gamma: {0} (must be positive)")]
    InvalidGamma(f64),
}
