//! 摩擦项的性质测试
//!
//! 用 proptest 验证平滑摩擦项在任意参数下的结构性质：
//! 有界性、零速连续性、γ → ∞ 的符号切换极限。

use calib_model::{AsymmetricCoulombStribeckFriction, AsymmetricViscousFriction};
use proptest::prelude::*;

proptest! {
    /// 库伦项在任意速度下严格落在两渐近值之间
    #[test]
    fn coulomb_prediction_is_bounded(
        dc_plus in 0.01f64..10.0,
        dc_minus in 0.01f64..10.0,
        gamma in 1.0f64..1e6,
        vel in -50.0f64..50.0,
    ) {
        let term = AsymmetricCoulombStribeckFriction::new(gamma)
            .unwrap()
            .with_magnitudes(dc_plus, dc_minus);
        let tau = term.predict(vel);

        prop_assert!(tau >= -dc_minus - 1e-12);
        prop_assert!(tau <= dc_plus + 1e-12);
    }

    /// 零速时库伦项严格位于两渐近水平之间（平滑性检查）
    #[test]
    fn coulomb_at_zero_is_strictly_between_levels(
        dc_plus in 0.01f64..10.0,
        dc_minus in 0.01f64..10.0,
        gamma in 1.0f64..1e6,
    ) {
        let term = AsymmetricCoulombStribeckFriction::new(gamma)
            .unwrap()
            .with_magnitudes(dc_plus, dc_minus);
        let at_zero = term.predict(0.0);

        prop_assert!(at_zero > -dc_minus);
        prop_assert!(at_zero < dc_plus);
    }

    /// 大 γ 下库伦项收敛到符号切换基线
    #[test]
    fn coulomb_converges_to_signum_for_large_gamma(
        dc_plus in 0.01f64..10.0,
        dc_minus in 0.01f64..10.0,
        vel in 0.01f64..10.0,
    ) {
        let term = AsymmetricCoulombStribeckFriction::new(1e9)
            .unwrap()
            .with_magnitudes(dc_plus, dc_minus);

        prop_assert!((term.predict(vel) - dc_plus).abs() < 1e-6 * dc_plus.max(1.0));
        prop_assert!((term.predict(-vel) + dc_minus).abs() < 1e-6 * dc_minus.max(1.0));
    }

    /// 黏性项在远离零速处的斜率等于对应侧的系数
    #[test]
    fn viscous_slope_matches_side(
        dv_plus in 0.01f64..5.0,
        dv_minus in 0.01f64..5.0,
        vel in 0.5f64..20.0,
    ) {
        let term = AsymmetricViscousFriction::new(1e4)
            .unwrap()
            .with_slopes(dv_plus, dv_minus);

        let plus = term.predict(vel) / vel;
        let minus = term.predict(-vel) / -vel;
        prop_assert!((plus - dv_plus).abs() < 1e-6);
        prop_assert!((minus - dv_minus).abs() < 1e-6);
    }

    /// 黏性项在零速处贡献为零且连续
    #[test]
    fn viscous_is_continuous_at_zero(
        dv_plus in 0.01f64..5.0,
        dv_minus in 0.01f64..5.0,
        gamma in 1.0f64..1e6,
    ) {
        let term = AsymmetricViscousFriction::new(gamma)
            .unwrap()
            .with_slopes(dv_plus, dv_minus);

        prop_assert_eq!(term.predict(0.0), 0.0);

        // 零速两侧的极限一致（平滑过渡，而不是跳变）
        let eps = 1e-9;
        prop_assert!((term.predict(eps) - term.predict(-eps)).abs() < 1e-6);
    }
}
