//! 摩擦辨识端到端测试
//!
//! 按已知摩擦模型合成恒速日志，验证流水线把参数找回来。

use motor_calib::prelude::*;

use approx::assert_relative_eq;
use calib_model::param::lookup;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Box-Muller 高斯噪声
fn gaussian(rng: &mut StdRng, sigma: f64) -> f64 {
    let u1: f64 = rng.r#gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.r#gen();
    sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// 速度从 -2 到 +2 rad/s 线性扫过的恒速段日志，
/// `tau_m = dc·sign(v) + dv·v + 噪声`，`tau_l = 0`
fn synth_const_vel_log(n: usize, dc: f64, dv: f64, noise_sigma: f64, seed: u64) -> TrajectorySample {
    let samp_freq = 1000.0;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut time = Vec::with_capacity(n);
    let mut pos = Vec::with_capacity(n);
    let mut vel = Vec::with_capacity(n);
    let mut torque_motor = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 / samp_freq;
        let v = -2.0 + 4.0 * i as f64 / (n - 1) as f64;
        time.push(t);
        pos.push(v * t);
        vel.push(v);
        torque_motor.push(dc * v.signum() + dv * v + gaussian(&mut rng, noise_sigma));
    }

    TrajectorySample::new(
        time,
        pos,
        vel,
        vec![0.0; n],
        vec![0.0; n],
        torque_motor,
        samp_freq,
    )
    .unwrap()
}

#[test]
fn test_recovers_coulomb_and_viscous_parameters() {
    let log = synth_const_vel_log(10_000, 0.3, 0.1, 0.01, 7);
    let outcome = identify_friction(&CalibConfig::default(), &log, 0.0, None).unwrap();

    let r = &outcome.results;
    assert_relative_eq!(r.coulomb_friction.dc_plus, 0.3, max_relative = 0.1);
    assert_relative_eq!(r.coulomb_friction.dc_minus, 0.3, max_relative = 0.1);
    assert_relative_eq!(r.viscous_friction.dv_plus, 0.1, max_relative = 0.1);
    assert_relative_eq!(r.viscous_friction.dv_minus, 0.1, max_relative = 0.1);

    assert!(r.statistics.friction_model_nrmse < 0.1);
    // 多正弦段未运行：惯量与仿真统计缺席
    assert!(r.motor_inertia.is_none());
    assert!(r.statistics.inertia_model_rmse.is_none());
    assert!(r.statistics.position_model_rmse.is_none());
    assert!(outcome.simulated.is_none());
}

#[test]
fn test_asymmetric_slopes_recovered() {
    // 正负方向不同的黏性斜率
    let samp_freq = 1000.0;
    let n = 8000;
    let (dv_plus, dv_minus, dc) = (0.15, 0.08, 0.2);
    let mut rng = StdRng::seed_from_u64(11);

    let mut time = Vec::with_capacity(n);
    let mut vel = Vec::with_capacity(n);
    let mut torque_motor = Vec::with_capacity(n);
    for i in 0..n {
        let v = -2.0 + 4.0 * i as f64 / (n - 1) as f64;
        time.push(i as f64 / samp_freq);
        vel.push(v);
        let slope = if v >= 0.0 { dv_plus } else { dv_minus };
        torque_motor.push(dc * v.signum() + slope * v + gaussian(&mut rng, 0.005));
    }
    let log = TrajectorySample::new(
        time,
        vec![0.0; n],
        vel,
        vec![0.0; n],
        vec![0.0; n],
        torque_motor,
        samp_freq,
    )
    .unwrap();

    let outcome = identify_friction(&CalibConfig::default(), &log, 0.0, None).unwrap();
    let r = &outcome.results;
    assert_relative_eq!(r.viscous_friction.dv_plus, dv_plus, max_relative = 0.1);
    assert_relative_eq!(r.viscous_friction.dv_minus, dv_minus, max_relative = 0.1);
    assert_relative_eq!(r.coulomb_friction.dc_plus, dc, max_relative = 0.1);
}

#[test]
fn test_identification_is_deterministic() {
    let log = synth_const_vel_log(5_000, 0.25, 0.12, 0.01, 3);
    let config = CalibConfig::default();

    let first = identify_friction(&config, &log, 0.0, None).unwrap();
    let second = identify_friction(&config, &log, 0.0, None).unwrap();
    assert_eq!(first.results, second.results);
}

#[test]
fn test_model_copy_reproduces_prediction() {
    let log = synth_const_vel_log(5_000, 0.3, 0.1, 0.005, 5);
    let outcome = identify_friction(&CalibConfig::default(), &log, 0.0, None).unwrap();

    // 结果文档与模型快照同源
    let dict = outcome.friction_model.get_param_dict().unwrap();
    assert_relative_eq!(
        lookup(&dict, "dc_plus").unwrap(),
        outcome.results.coulomb_friction.dc_plus
    );
    assert_relative_eq!(
        lookup(&dict, "gamma_v").unwrap(),
        outcome.results.viscous_friction.gamma
    );
}

#[test]
fn test_velocity_window_excludes_samples() {
    let log = synth_const_vel_log(10_000, 0.3, 0.1, 0.01, 13);
    let mut config = CalibConfig::default();
    // 裁掉两端高速段，只用 |v| <= 1.5 的样本
    config.velocity_window = motor_calib::VelocityWindow {
        min: -1.5,
        max: 1.5,
    };
    config.refine_gamma = false;

    let outcome = identify_friction(&config, &log, 0.0, None).unwrap();
    assert_relative_eq!(
        outcome.results.viscous_friction.dv_plus,
        0.1,
        max_relative = 0.15
    );
    assert_relative_eq!(
        outcome.results.coulomb_friction.dc_minus,
        0.3,
        max_relative = 0.1
    );
}

#[test]
fn test_ripple_offset_subtracted_from_load_torque() {
    // tau_l 带常数偏置，传入的 ripple_offset 应抵消它
    let mut log = synth_const_vel_log(5_000, 0.3, 0.1, 0.005, 21);
    let offset = 0.07;
    for tl in &mut log.torque_load {
        *tl += offset;
    }

    let outcome = identify_friction(&CalibConfig::default(), &log, offset, None).unwrap();
    assert_relative_eq!(
        outcome.results.coulomb_friction.dc_plus,
        0.3,
        max_relative = 0.1
    );
}

#[test]
fn test_insufficient_data_after_window() {
    let log = synth_const_vel_log(100, 0.3, 0.1, 0.01, 1);
    let mut config = CalibConfig::default();
    // 窗口只能留下最末端的几个样本
    config.velocity_window = motor_calib::VelocityWindow { min: 1.9, max: 2.0 };

    let err = identify_friction(&config, &log, 0.0, None).unwrap_err();
    assert!(matches!(
        err,
        CalibError::InsufficientData { .. } | CalibError::Trajectory(_)
    ));
}
