//! 摩擦/惯量辨识流水线
//!
//! 分阶段拟合：
//!
//! 1. 恒速段样本按速度窗口筛选，去除负载力矩的纹波偏置，
//!    目标量 `lhs = tau_m − tau_l`
//! 2. 阶段一：固定 gamma 的线性求解（黏性 + 库伦，精确且快）
//! 3. 阶段二（可选）：有界非线性细化，在 `gamma_bounds` 内释放
//!    两个 gamma，斜率/幅值以阶段一的解为初值
//! 4. 多正弦段（可选）：扣除已辨识摩擦后对剩余力矩做惯量线性拟合
//! 5. 仿真验证（可选）：组合模型前向积分，与实测位置/速度对比
//!
//! 每阶段输出 RMSE/NRMSE，汇入 [`FrictionResults`]。

use crate::config::{CalibConfig, RobustStrategy};
use crate::error::CalibError;
use crate::results::{
    CoulombFrictionResult, FrictionParams, FrictionResults, FrictionStatistics,
    ViscousFrictionResult,
};

use calib_model::param::lookup;
use calib_model::{
    AsymmetricCoulombStribeckFriction, AsymmetricViscousFriction, CompositeModel, MotorInertia,
    ParamDict,
};
use calib_regression::{
    LinearRegression, LinearStrategy, NonLinearRegression, SolverSettings, huber_regr_strategy,
    lsq_pseudoinv_strategy,
};
use calib_sim::Simulation;
use calib_trajectory::{TrajectorySample, nrmse, rmse};

/// 筛选后至少保留的恒速样本数，少于此无法稳定分辨四个摩擦参数
const MIN_CONST_VEL_SAMPLES: usize = 16;

/// 仿真输出的轨迹对
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedTrajectory {
    pub pos: Vec<f64>,
    pub vel: Vec<f64>,
}

/// 摩擦/惯量辨识的完整产出
#[derive(Debug, Clone)]
pub struct FrictionOutcome {
    /// 可归档的结果文档
    pub results: FrictionResults,
    /// 摩擦模型（阶段二产物；未细化时为阶段一线性解）
    pub friction_model: CompositeModel,
    /// 摩擦 + 惯量组合模型（仅多正弦段运行过时含惯量项）
    pub motor_model: CompositeModel,
    /// 仿真轨迹（`run_simulation` 且多正弦段给出时）
    pub simulated: Option<SimulatedTrajectory>,
}

fn strategy_of(config: &CalibConfig) -> LinearStrategy {
    match config.robust_strategy {
        RobustStrategy::Huber => huber_regr_strategy(),
        RobustStrategy::LsqPseudoinv => lsq_pseudoinv_strategy(),
    }
}

/// 摩擦/惯量辨识入口
///
/// - `const_vel` — 恒速往返日志（加速度 ≈ 0），摩擦辨识的数据源
/// - `ripple_offset` — 纹波标定得到的负载力矩常数偏置
///   （[`RippleResults::c`](crate::results::RippleResults)）
/// - `multisine` — 多正弦激励日志；给出时追加惯量拟合与可选仿真
pub fn identify_friction(
    config: &CalibConfig,
    const_vel: &TrajectorySample,
    ripple_offset: f64,
    multisine: Option<&TrajectorySample>,
) -> Result<FrictionOutcome, CalibError> {
    config.validate()?;

    tracing::info!(
        samples = const_vel.len(),
        ripple_offset,
        "friction identification start"
    );

    // 1. 数据准备
    let windowed = const_vel
        .select_velocity_window(config.velocity_window.min, config.velocity_window.max)?
        .remove_torque_offset(ripple_offset);
    if windowed.len() < MIN_CONST_VEL_SAMPLES {
        return Err(CalibError::InsufficientData {
            stage: "const_vel",
            kept: windowed.len(),
            min: MIN_CONST_VEL_SAMPLES,
        });
    }
    let lhs = windowed.friction_lhs();

    // 2. 阶段一：固定 gamma 的线性解
    let mut linear = LinearRegression::new(strategy_of(config));
    linear.add_model(AsymmetricViscousFriction::new(config.init_gamma)?)?;
    linear.add_model(AsymmetricCoulombStribeckFriction::new(config.init_gamma)?)?;
    linear.set_pos_vel_acc(&windowed.pos, &windowed.vel, &windowed.acc);
    linear.set_samp_freq(windowed.samp_freq);
    linear.set_lhs(&lhs);
    let linear_params = linear.solve()?;
    tracing::debug!(?linear_params, "linear friction stage done");

    // 3. 阶段二：释放 gamma 的有界细化
    let friction_model = if config.refine_gamma {
        let dv_plus = required(&linear_params, "dv_plus")?;
        let dv_minus = required(&linear_params, "dv_minus")?;
        let dc_plus = required(&linear_params, "dc_plus")?;
        let dc_minus = required(&linear_params, "dc_minus")?;

        let mut nonlinear = NonLinearRegression::new(SolverSettings::default());
        nonlinear.add_model(
            AsymmetricViscousFriction::new(config.init_gamma)?
                .with_fit_gamma(true)
                .with_slopes(dv_plus, dv_minus),
        );
        nonlinear.add_model(
            AsymmetricCoulombStribeckFriction::new(config.init_gamma)?
                .with_fit_gamma(true)
                .with_magnitudes(dc_plus, dc_minus),
        );
        nonlinear.set_pos_vel_acc(&windowed.pos, &windowed.vel, &windowed.acc);
        nonlinear.set_samp_freq(windowed.samp_freq);
        nonlinear.set_lhs(&lhs);

        let refined = nonlinear.solve(config.gamma_bounds.min, config.gamma_bounds.max)?;
        tracing::debug!(?refined, "nonlinear friction stage done");
        nonlinear.get_model_copy()?
    } else {
        linear.get_model_copy()?
    };

    // 4. 摩擦统计
    let predicted: Vec<f64> = windowed
        .vel
        .iter()
        .map(|&v| friction_model.predict(0.0, v, 0.0, 0.0))
        .collect();
    let friction_rmse = rmse(&lhs, &predicted);
    let friction_nrmse = nrmse(&lhs, &predicted);
    tracing::info!(friction_rmse, friction_nrmse, "friction model fitted");

    // 5. 惯量拟合与仿真验证
    let friction_params = friction_model.get_param_dict()?;
    let mut motor_model = friction_model.clone();
    let mut motor_inertia = None;
    let mut inertia_stats = (None, None);
    let mut sim_stats = (None, None, None, None);
    let mut simulated = None;

    if let Some(ms) = multisine {
        let ms = ms.remove_torque_offset(ripple_offset);
        let lhs_ms: Vec<f64> = (0..ms.len())
            .map(|i| {
                ms.torque_motor[i]
                    - friction_model.predict(ms.pos[i], ms.vel[i], 0.0, ms.time[i])
                    - ms.torque_load[i]
            })
            .collect();

        let mut inertia_regr = LinearRegression::new(strategy_of(config));
        inertia_regr.add_model(MotorInertia::new())?;
        inertia_regr.set_pos_vel_acc(&ms.pos, &ms.vel, &ms.acc);
        inertia_regr.set_samp_freq(ms.samp_freq);
        inertia_regr.set_lhs(&lhs_ms);
        let inertia_params = inertia_regr.solve()?;
        tracing::debug!(?inertia_params, "inertia stage done");

        let inertia_model = inertia_regr.get_model_copy()?;
        let predicted_inertia: Vec<f64> = (0..ms.len())
            .map(|i| inertia_model.predict(ms.pos[i], ms.vel[i], ms.acc[i], ms.time[i]))
            .collect();
        inertia_stats = (
            Some(rmse(&lhs_ms, &predicted_inertia)),
            Some(nrmse(&lhs_ms, &predicted_inertia)),
        );
        motor_inertia = lookup(&inertia_params, "motor_inertia");

        for term in inertia_model.terms() {
            motor_model.push(term.clone());
        }

        if config.run_simulation {
            let trj_info = config.multisine_info(ms.samp_freq);
            let mut sim = Simulation::new();
            sim.set_init_conditions(&ms);
            sim.set_time_interval(&trj_info);
            sim.set_model(motor_model.clone());
            sim.set_motor_torque(&ms);
            let (sim_pos, sim_vel) = sim.solve_ode()?;

            let position_rmse = rmse(&ms.pos[..sim_pos.len()], &sim_pos);
            let position_nrmse = nrmse(&ms.pos[..sim_pos.len()], &sim_pos);
            let velocity_rmse = rmse(&ms.vel[..sim_vel.len()], &sim_vel);
            let velocity_nrmse = nrmse(&ms.vel[..sim_vel.len()], &sim_vel);
            tracing::info!(position_rmse, velocity_rmse, "simulation validation done");

            sim_stats = (
                Some(position_rmse),
                Some(position_nrmse),
                Some(velocity_rmse),
                Some(velocity_nrmse),
            );
            simulated = Some(SimulatedTrajectory {
                pos: sim_pos,
                vel: sim_vel,
            });
        }
    }

    let results = FrictionResults {
        params: FrictionParams {
            min_gamma: config.gamma_bounds.min,
            max_gamma: config.gamma_bounds.max,
            min_const_vel: config.velocity_window.min,
            max_const_vel: config.velocity_window.max,
        },
        viscous_friction: ViscousFrictionResult {
            gamma: required(&friction_params, "gamma_v")?,
            dv_plus: required(&friction_params, "dv_plus")?,
            dv_minus: required(&friction_params, "dv_minus")?,
        },
        coulomb_friction: CoulombFrictionResult {
            gamma: required(&friction_params, "gamma_c")?,
            dc_plus: required(&friction_params, "dc_plus")?,
            dc_minus: required(&friction_params, "dc_minus")?,
        },
        motor_inertia,
        statistics: FrictionStatistics {
            friction_model_rmse: friction_rmse,
            friction_model_nrmse: friction_nrmse,
            inertia_model_rmse: inertia_stats.0,
            inertia_model_nrmse: inertia_stats.1,
            position_model_rmse: sim_stats.0,
            position_model_nrmse: sim_stats.1,
            velocity_model_rmse: sim_stats.2,
            velocity_model_nrmse: sim_stats.3,
        },
    };

    Ok(FrictionOutcome {
        results,
        friction_model,
        motor_model,
        simulated,
    })
}

fn required(dict: &ParamDict, name: &str) -> Result<f64, CalibError> {
    lookup(dict, name).ok_or_else(|| CalibError::MissingParameter(name.to_string()))
}
