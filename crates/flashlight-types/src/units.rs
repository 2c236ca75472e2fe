//! 强类型角度单位
//!
//! 使用 NewType 模式防止角度与弧度混淆。装配工位的所有配置值都以角度给出，
//! 只有在生成控制器脚本时才转换为弧度。
//!
//! # 示例
//!
//! ```rust
//! use flashlight_types::{Deg, Rad};
//!
//! let yaw = Deg(90.0);
//! assert!((yaw.to_rad().0 - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
//!
//! // 类型安全：以下代码无法编译
//! // let _ = Rad(1.0) + Deg(1.0);
//! ```

use std::fmt;
use std::ops::{Add, Neg, Sub};

/// 弧度（NewType）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rad(pub f64);

impl Rad {
    /// 零弧度常量
    pub const ZERO: Self = Rad(0.0);

    /// 转换为角度
    #[inline]
    pub fn to_deg(self) -> Deg {
        Deg(self.0.to_degrees())
    }
}

impl fmt::Display for Rad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

/// 角度（NewType）
///
/// 关节目标、末端姿态和关节速度配置都使用角度。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deg(pub f64);

impl Deg {
    /// 零角度常量
    pub const ZERO: Self = Deg(0.0);

    /// 90 度
    pub const DEG_90: Self = Deg(90.0);

    /// 180 度
    pub const DEG_180: Self = Deg(180.0);

    /// 转换为弧度
    #[inline]
    pub fn to_rad(self) -> Rad {
        Rad(self.0.to_radians())
    }

    /// 取绝对值
    #[inline]
    pub fn abs(self) -> Self {
        Deg(self.0.abs())
    }

    /// 是否为有限值（非 NaN / 非无穷）
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

impl Add for Deg {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Deg(self.0 + rhs.0)
    }
}

impl Sub for Deg {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Deg(self.0 - rhs.0)
    }
}

impl Neg for Deg {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Deg(-self.0)
    }
}

impl From<Rad> for Deg {
    #[inline]
    fn from(rad: Rad) -> Self {
        rad.to_deg()
    }
}

impl From<Deg> for Rad {
    #[inline]
    fn from(deg: Deg) -> Self {
        deg.to_rad()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_deg_to_rad() {
        assert!((Deg::DEG_180.to_rad().0 - std::f64::consts::PI).abs() < 1e-12);
        assert!((Deg::DEG_90.to_rad().0 - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(Deg::ZERO.to_rad(), Rad::ZERO);
    }

    #[test]
    fn test_deg_arithmetic() {
        assert_eq!(Deg(10.0) + Deg(5.0), Deg(15.0));
        assert_eq!(Deg(10.0) - Deg(15.0), Deg(-5.0));
        assert_eq!(-Deg(-206.51), Deg(206.51));
        assert_eq!(Deg(-3.0).abs(), Deg(3.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Deg(-89.73)), "-89.73°");
        assert_eq!(format!("{}", Rad(1.0)), "1.0000 rad");
    }

    #[test]
    fn test_is_finite() {
        assert!(Deg(1.0).is_finite());
        assert!(!Deg(f64::NAN).is_finite());
        assert!(!Deg(f64::INFINITY).is_finite());
    }

    proptest! {
        #[test]
        fn prop_deg_rad_conversion_preserves_value(value in -720.0f64..720.0) {
            let back = Deg(value).to_rad().to_deg();
            prop_assert!((back.0 - value).abs() < 1e-9);
        }
    }
}
