//! 设计矩阵组装
//!
//! 第 j 列是第 j 个系数的基函数在各采样点的取值：
//! 对单系数线性项就是逐样本乘子（惯量项为 `acc`，偏置项为 1）。

use calib_model::ModelTerm;
use nalgebra::DMatrix;

/// 所有项的线性系数总数
pub(crate) fn total_coeffs(terms: &[ModelTerm]) -> usize {
    terms.iter().map(|t| t.linear_coeff_count()).sum()
}

/// 按行组装设计矩阵（n 样本 × m 系数）
pub(crate) fn build_design_matrix(
    terms: &[ModelTerm],
    pos: &[f64],
    vel: &[f64],
    acc: &[f64],
) -> DMatrix<f64> {
    let n = pos.len();
    let m = total_coeffs(terms);

    let mut x = DMatrix::<f64>::zeros(n, m);
    for i in 0..n {
        let mut col = 0;
        for term in terms {
            for v in term.linear_basis_row(pos[i], vel[i], acc[i]) {
                x[(i, col)] = v;
                col += 1;
            }
        }
    }
    x
}
