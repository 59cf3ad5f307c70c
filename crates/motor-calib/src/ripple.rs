//! 力矩纹波辨识流水线
//!
//! 纹波标定往同一组目标位置做多次往返运动。每次经过的
//! 位置-力矩对按起点聚类到位置档，取档内中值压掉测量噪声，
//! 得到一条 `位置 → 力矩` 中值曲线。曲线按 ±2π 周期延拓后，
//! 分别用 1、2、3 个正弦的纹波项做线性拟合，按未延拓档点上的
//! RMSE 选出最优候选。
//!
//! 延拓让拟合在 `[-π, π]` 边界处看到完整周期，避免端点处
//! 相位/偏置互相吸收。

use crate::config::CalibConfig;
use crate::error::CalibError;
use crate::results::{RippleHarmonicResult, RippleResults};

use calib_model::{ModelTerm, TorqueRippleSinPhase};
use calib_regression::{LinearRegression, lsq_pseudoinv_strategy};
use calib_trajectory::{rmse, std_dev};

/// 一次经过某目标位置的原始记录
#[derive(Debug, Clone, PartialEq)]
pub struct RipplePass {
    /// 经过期间的链路位置（rad）
    pub pos: Vec<f64>,
    /// 经过期间的力矩读数（Nm）
    pub torque: Vec<f64>,
}

/// 纹波辨识的完整产出
#[derive(Debug, Clone)]
pub struct RippleOutcome {
    /// 可归档的结果文档
    pub results: RippleResults,
    /// 选中的纹波模型（摩擦流水线用它做 `remove_ripple`）
    pub model: TorqueRippleSinPhase,
    /// 聚类后的位置档中值 `(pos, torque)`，按位置升序
    pub binned: Vec<(f64, f64)>,
}

/// 最大候选（3 正弦）有 7 个线性系数
const MIN_BINS: usize = 8;

/// 纹波辨识入口
///
/// `passes` 是按次分好的往返记录；起点相距 `2 * trj_error` 内的
/// 记录归入同一位置档。
pub fn identify_ripple(
    config: &CalibConfig,
    passes: &[RipplePass],
) -> Result<RippleOutcome, CalibError> {
    config.validate()?;

    let binned = bin_passes(passes, config.trj_error);
    if binned.len() < MIN_BINS {
        return Err(CalibError::InsufficientData {
            stage: "ripple_bins",
            kept: binned.len(),
            min: MIN_BINS,
        });
    }
    tracing::info!(
        passes = passes.len(),
        bins = binned.len(),
        "ripple identification start"
    );

    // ±2π 周期延拓
    let mut ext_pos = Vec::with_capacity(3 * binned.len());
    let mut ext_tq = Vec::with_capacity(3 * binned.len());
    for shift in [-std::f64::consts::TAU, 0.0, std::f64::consts::TAU] {
        for &(p, q) in &binned {
            ext_pos.push(p + shift);
            ext_tq.push(q);
        }
    }
    let zeros = vec![0.0; ext_pos.len()];

    let init_ampl = std_dev(&ext_tq) * std::f64::consts::SQRT_2;

    // 候选拟合：1..=harmonics_count 个正弦，谐波数上限由模型层把关
    let mut best: Option<(usize, TorqueRippleSinPhase, f64)> = None;
    for num_of_sin in 1..=config.harmonics_count {
        let term = TorqueRippleSinPhase::new(num_of_sin, init_ampl, 1.0)?;

        let mut regr = LinearRegression::new(lsq_pseudoinv_strategy());
        regr.add_model(term)?;
        regr.set_pos_vel_acc(&ext_pos, &zeros, &zeros);
        regr.set_lhs(&ext_tq);
        regr.solve()?;

        let model = regr.get_model_copy()?;
        let Some(fitted) = model.terms().iter().find_map(|t| match t {
            ModelTerm::TorqueRippleSinPhase(t) => Some(t.clone()),
            _ => None,
        }) else {
            continue;
        };

        let predicted: Vec<f64> = binned.iter().map(|&(p, _)| fitted.predict(p)).collect();
        let actual: Vec<f64> = binned.iter().map(|&(_, q)| q).collect();
        let candidate_rmse = rmse(&actual, &predicted);
        tracing::debug!(num_of_sin, candidate_rmse, "ripple candidate fitted");

        match &best {
            Some((_, _, best_rmse)) if candidate_rmse >= *best_rmse => {}
            _ => best = Some((num_of_sin, fitted, candidate_rmse)),
        }
    }

    // harmonics_count 经 validate 保证 ≥ 1，循环至少产生一个候选
    let Some((num_of_sinusoids, model, best_rmse)) = best else {
        return Err(CalibError::InvalidConfig(
            "no ripple candidate was fitted".into(),
        ));
    };
    tracing::info!(num_of_sinusoids, rmse = best_rmse, "ripple model selected");

    let harmonics = model
        .harmonics()
        .iter()
        .map(|h| RippleHarmonicResult {
            a: h.ampl,
            w: h.omega,
            p: h.phase,
        })
        .collect();

    Ok(RippleOutcome {
        results: RippleResults {
            num_of_sinusoids,
            c: model.c,
            harmonics,
            rmse: best_rmse,
        },
        model,
        binned,
    })
}

/// 按起点位置聚类并取档内中值，返回按位置升序的 `(pos, torque)`
fn bin_passes(passes: &[RipplePass], trj_error: f64) -> Vec<(f64, f64)> {
    // 每档保存锚点（首条记录的起点）与池化的原始值
    let mut anchors: Vec<f64> = Vec::new();
    let mut pooled_pos: Vec<Vec<f64>> = Vec::new();
    let mut pooled_tq: Vec<Vec<f64>> = Vec::new();

    for pass in passes {
        let Some(&start) = pass.pos.first() else {
            continue;
        };
        let slot = anchors
            .iter()
            .position(|&a| (a - start).abs() < 2.0 * trj_error);
        match slot {
            Some(i) => {
                pooled_pos[i].extend_from_slice(&pass.pos);
                pooled_tq[i].extend_from_slice(&pass.torque);
            }
            None => {
                anchors.push(start);
                pooled_pos.push(pass.pos.clone());
                pooled_tq.push(pass.torque.clone());
            }
        }
    }

    let mut bins: Vec<(f64, f64)> = pooled_pos
        .iter_mut()
        .zip(pooled_tq.iter_mut())
        .filter(|(p, q)| !p.is_empty() && !q.is_empty())
        .map(|(p, q)| (median(p), median(q)))
        .collect();
    bins.sort_by(|a, b| a.0.total_cmp(&b.0));
    bins
}

/// 就地排序取中值（偶数长度取中间两值均值）
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pass_at(center: f64, torque: f64) -> RipplePass {
        // 档内带少量散布
        RipplePass {
            pos: vec![center - 0.002, center, center + 0.002],
            torque: vec![torque - 0.001, torque, torque + 0.001],
        }
    }

    #[test]
    fn test_bin_passes_clusters_by_start() {
        let passes = vec![
            pass_at(0.0, 0.1),
            pass_at(0.001, 0.3), // 与上一条同档
            pass_at(1.0, 0.2),
        ];
        let bins = bin_passes(&passes, 0.01);

        assert_eq!(bins.len(), 2);
        // 同档中值来自池化后的全部样本
        assert!((bins[0].1 - 0.2).abs() < 1e-9);
        assert!((bins[1].1 - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_too_few_bins_rejected() {
        let passes = vec![pass_at(0.0, 0.1), pass_at(1.0, 0.2)];
        let err = identify_ripple(&CalibConfig::default(), &passes).unwrap_err();
        assert!(matches!(
            err,
            CalibError::InsufficientData {
                stage: "ripple_bins",
                ..
            }
        ));
    }
}
