//! 正向仿真
//!
//! 给定已辨识的 [`CompositeModel`] 和实测电机力矩序列，
//! 前向积分二阶动力学，得到仿真位置/速度轨迹，
//! 供与实测轨迹对比评估模型质量。
//!
//! # 积分格式
//!
//! 显式欧拉，按轨迹原生采样率步进：
//!
//! ```text
//! acc[t]   = (tau_motor[t] − model.predict(pos[t], vel[t], acc[t−1], t)) / I
//! vel[t+1] = vel[t] + acc[t]·dt
//! pos[t+1] = pos[t] + vel[t]·dt
//! ```
//!
//! 采样率 ≥ 1 kHz 时离散化误差远小于模型拟合误差，
//! 不需要高阶积分器。模型对加速度的依赖（惯量项）用上一步
//! 的加速度估计代入，避免隐式求解。

use crate::error::SimulationError;

use calib_model::CompositeModel;
use calib_trajectory::{MultisineTrjInfo, TrajectorySample};

/// 结尾丢弃的样本数，与加速度有限差分的边界伪影对齐
const EDGE_SAMPLES: usize = 2;

/// 电机动力学前向仿真器
///
/// 按 setter 注入全部前置条件后调用 [`solve_ode`](Simulation::solve_ode)。
/// 惯量取自模型的 `motor_inertia` 参数。
#[derive(Debug, Default, Clone)]
pub struct Simulation {
    model: Option<CompositeModel>,
    torque: Option<Vec<f64>>,
    init: Option<(f64, f64)>,
    dt: Option<f64>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从实测轨迹取初始位置/速度
    pub fn set_init_conditions(&mut self, sample: &TrajectorySample) {
        let pos0 = sample.pos.first().copied().unwrap_or(0.0);
        let vel0 = sample.vel.first().copied().unwrap_or(0.0);
        self.init = Some((pos0, vel0));
    }

    /// 从激励元信息取积分步长
    pub fn set_time_interval(&mut self, trj_info: &MultisineTrjInfo) {
        self.dt = Some(trj_info.dt());
    }

    /// 设置产生反抗力矩的动力学模型
    pub fn set_model(&mut self, model: CompositeModel) {
        self.model = Some(model);
    }

    /// 设置外部施加的电机力矩序列
    pub fn set_motor_torque(&mut self, sample: &TrajectorySample) {
        self.torque = Some(sample.torque_motor.clone());
    }

    /// 前向积分，返回 `(pos, vel)` 序列
    ///
    /// 输出比力矩序列短 [`EDGE_SAMPLES`] 个样本，与实测轨迹做
    /// 同样边界裁剪后逐点可比。
    ///
    /// # 错误
    ///
    /// 前置条件缺失 → 对应的 [`SimulationError`] 契约变体；
    /// 模型无正惯量 → [`SimulationError::MissingInertia`]。
    pub fn solve_ode(&self) -> Result<(Vec<f64>, Vec<f64>), SimulationError> {
        let model = self.model.as_ref().ok_or(SimulationError::ModelNotSet)?;
        let torque = self.torque.as_ref().ok_or(SimulationError::TorqueNotSet)?;
        let (pos0, vel0) = self.init.ok_or(SimulationError::InitConditionsNotSet)?;
        let dt = self.dt.ok_or(SimulationError::TimeIntervalNotSet)?;

        let inertia = model.param("motor_inertia");
        let inertia = match inertia {
            Some(i) if i > 0.0 => i,
            other => return Err(SimulationError::MissingInertia(other)),
        };

        if torque.len() <= EDGE_SAMPLES {
            return Err(SimulationError::TooShort {
                got: torque.len(),
                min: EDGE_SAMPLES + 1,
            });
        }
        let steps = torque.len() - EDGE_SAMPLES;

        tracing::debug!(steps, dt, inertia, "forward simulation");

        let mut pos = Vec::with_capacity(steps);
        let mut vel = Vec::with_capacity(steps);
        let mut p = pos0;
        let mut v = vel0;
        let mut acc_prev = 0.0;

        for (t, &tau) in torque.iter().take(steps).enumerate() {
            pos.push(p);
            vel.push(v);

            // 模型预测含惯量项 I·acc，用上一步加速度代入后扣除，
            // 剩余净力矩推进当前加速度
            let reaction = model.predict(p, v, acc_prev, t as f64 * dt);
            let acc = (tau - (reaction - inertia * acc_prev)) / inertia;

            p += v * dt;
            v += acc * dt;
            acc_prev = acc;
        }

        Ok((pos, vel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calib_model::{AsymmetricViscousFriction, MotorInertia};
    use calib_trajectory::TrajectorySample;
    use approx::assert_relative_eq;

    fn constant_torque_sample(n: usize, tau: f64, samp_freq: f64) -> TrajectorySample {
        let time: Vec<f64> = (0..n).map(|i| i as f64 / samp_freq).collect();
        let zeros = vec![0.0; n];
        TrajectorySample::new(
            time,
            zeros.clone(),
            zeros.clone(),
            zeros.clone(),
            zeros.clone(),
            vec![tau; n],
            samp_freq,
        )
        .unwrap()
    }

    fn trj_info(samp_freq: f64) -> MultisineTrjInfo {
        MultisineTrjInfo {
            freq0: 0.1,
            num_of_sinusoids: 1,
            samp_freq,
            trans_time: 0.0,
        }
    }

    fn inertia_model(inertia: f64) -> CompositeModel {
        let mut model = CompositeModel::new();
        model.push(MotorInertia::with_initial_guess(inertia));
        model
    }

    /// 纯惯量 + 恒定力矩的闭式解：pos(t) = 0.5·(τ/I)·t²
    fn closed_form_error(samp_freq: f64) -> f64 {
        let inertia = 0.01;
        let tau = 0.02;
        let duration = 1.0;
        let n = (duration * samp_freq) as usize;

        let motor = constant_torque_sample(n, tau, samp_freq);
        let mut sim = Simulation::new();
        sim.set_init_conditions(&motor);
        sim.set_time_interval(&trj_info(samp_freq));
        sim.set_model(inertia_model(inertia));
        sim.set_motor_torque(&motor);

        let (pos, _vel) = sim.solve_ode().unwrap();

        let dt = 1.0 / samp_freq;
        let mut max_err: f64 = 0.0;
        for (i, &p) in pos.iter().enumerate() {
            let t = i as f64 * dt;
            let expected = 0.5 * (tau / inertia) * t * t;
            max_err = max_err.max((p - expected).abs());
        }
        max_err
    }

    #[test]
    fn test_closed_form_kinematics() {
        // 误差与最终位移（1 秒末 1 rad）相比可忽略
        assert!(closed_form_error(1000.0) < 2e-3);
    }

    #[test]
    fn test_discretization_error_shrinks_with_rate() {
        let coarse = closed_form_error(500.0);
        let fine = closed_form_error(4000.0);
        assert!(fine < coarse / 4.0);
    }

    #[test]
    fn test_output_two_samples_short() {
        let motor = constant_torque_sample(100, 0.01, 1000.0);
        let mut sim = Simulation::new();
        sim.set_init_conditions(&motor);
        sim.set_time_interval(&trj_info(1000.0));
        sim.set_model(inertia_model(0.01));
        sim.set_motor_torque(&motor);

        let (pos, vel) = sim.solve_ode().unwrap();
        assert_eq!(pos.len(), 98);
        assert_eq!(vel.len(), 98);
    }

    #[test]
    fn test_initial_conditions_propagated() {
        let samp_freq = 1000.0;
        let n = 50;
        let time: Vec<f64> = (0..n).map(|i| i as f64 / samp_freq).collect();
        let motor = TrajectorySample::new(
            time,
            vec![1.5; n],
            vec![-0.3; n],
            vec![0.0; n],
            vec![0.0; n],
            vec![0.0; n],
            samp_freq,
        )
        .unwrap();

        let mut sim = Simulation::new();
        sim.set_init_conditions(&motor);
        sim.set_time_interval(&trj_info(samp_freq));
        sim.set_model(inertia_model(0.01));
        sim.set_motor_torque(&motor);

        let (pos, vel) = sim.solve_ode().unwrap();
        assert_relative_eq!(pos[0], 1.5);
        assert_relative_eq!(vel[0], -0.3);
    }

    #[test]
    fn test_friction_decelerates_free_motion() {
        // 零力矩 + 初速度：黏性摩擦应让速度单调衰减
        let samp_freq = 1000.0;
        let n = 2000;
        let time: Vec<f64> = (0..n).map(|i| i as f64 / samp_freq).collect();
        let motor = TrajectorySample::new(
            time,
            vec![0.0; n],
            vec![1.0; n],
            vec![0.0; n],
            vec![0.0; n],
            vec![0.0; n],
            samp_freq,
        )
        .unwrap();

        let mut model = inertia_model(0.01);
        model.push(
            AsymmetricViscousFriction::new(1000.0)
                .unwrap()
                .with_slopes(0.05, 0.05),
        );

        let mut sim = Simulation::new();
        sim.set_init_conditions(&motor);
        sim.set_time_interval(&trj_info(samp_freq));
        sim.set_model(model);
        sim.set_motor_torque(&motor);

        let (_pos, vel) = sim.solve_ode().unwrap();
        assert!(vel.windows(2).all(|w| w[1] <= w[0]));
        assert!(*vel.last().unwrap() < 0.1);
        assert!(*vel.last().unwrap() >= 0.0);
    }

    #[test]
    fn test_prerequisite_errors() {
        let motor = constant_torque_sample(10, 0.01, 1000.0);

        let sim = Simulation::new();
        assert!(matches!(
            sim.solve_ode().unwrap_err(),
            SimulationError::ModelNotSet
        ));

        let mut sim = Simulation::new();
        sim.set_model(inertia_model(0.01));
        assert!(matches!(
            sim.solve_ode().unwrap_err(),
            SimulationError::TorqueNotSet
        ));

        let mut sim = Simulation::new();
        sim.set_model(inertia_model(0.01));
        sim.set_motor_torque(&motor);
        assert!(matches!(
            sim.solve_ode().unwrap_err(),
            SimulationError::InitConditionsNotSet
        ));

        let mut sim = Simulation::new();
        sim.set_model(inertia_model(0.01));
        sim.set_motor_torque(&motor);
        sim.set_init_conditions(&motor);
        assert!(matches!(
            sim.solve_ode().unwrap_err(),
            SimulationError::TimeIntervalNotSet
        ));
    }

    #[test]
    fn test_missing_inertia_rejected() {
        let motor = constant_torque_sample(10, 0.01, 1000.0);

        let mut model = CompositeModel::new();
        model.push(
            AsymmetricViscousFriction::new(1000.0)
                .unwrap()
                .with_slopes(0.05, 0.05),
        );

        let mut sim = Simulation::new();
        sim.set_init_conditions(&motor);
        sim.set_time_interval(&trj_info(1000.0));
        sim.set_model(model);
        sim.set_motor_torque(&motor);

        assert!(matches!(
            sim.solve_ode().unwrap_err(),
            SimulationError::MissingInertia(None)
        ));
    }
}
