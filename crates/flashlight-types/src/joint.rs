//! 关节索引和数组
//!
//! 提供编译期安全的关节索引，以及装配动作中使用的关节目标类型。
//!
//! # 示例
//!
//! ```rust
//! use flashlight_types::{Deg, Joint, JointTarget};
//!
//! let home = JointTarget::from_degrees([0.0, -90.0, 0.0, -90.0, 0.0, 0.0]);
//! assert_eq!(home[Joint::J2], Deg(-90.0));
//!
//! let radians = home.map(|d| d.to_rad());
//! assert!((radians[Joint::J4].0 + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
//! ```

use super::units::Deg;
use std::fmt;
use std::ops::{Index, IndexMut};

/// 关节枚举
///
/// 六轴机械臂的 6 个关节，命名沿用 UR 系列的关节顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Joint {
    /// 关节 1（基座旋转）
    J1 = 0,
    /// 关节 2（肩部俯仰）
    J2 = 1,
    /// 关节 3（肘部俯仰）
    J3 = 2,
    /// 关节 4（腕部 1）
    J4 = 3,
    /// 关节 5（腕部 2）
    J5 = 4,
    /// 关节 6（腕部 3，末端旋转）
    J6 = 5,
}

impl Joint {
    /// 所有关节的数组
    pub const ALL: [Joint; 6] = [
        Joint::J1,
        Joint::J2,
        Joint::J3,
        Joint::J4,
        Joint::J5,
        Joint::J6,
    ];

    /// 获取关节索引（0-5）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 从索引创建关节（范围检查）
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 获取关节名称
    pub const fn name(self) -> &'static str {
        match self {
            Joint::J1 => "J1",
            Joint::J2 => "J2",
            Joint::J3 => "J3",
            Joint::J4 => "J4",
            Joint::J5 => "J5",
            Joint::J6 => "J6",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 关节数组
///
/// 类型安全的 6 关节数组容器，支持索引、迭代和映射操作。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct JointArray<T> {
    data: [T; 6],
}

impl<T: Copy> Copy for JointArray<T> {}

impl<T> JointArray<T> {
    /// 创建新的关节数组
    #[inline]
    pub const fn new(data: [T; 6]) -> Self {
        JointArray { data }
    }

    /// 迭代器
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// 带关节索引的迭代器
    pub fn iter_joints(&self) -> impl Iterator<Item = (Joint, &T)> {
        Joint::ALL.into_iter().zip(self.data.iter())
    }

    /// 映射转换
    pub fn map<U, F>(self, mut f: F) -> JointArray<U>
    where
        F: FnMut(T) -> U,
    {
        let [a, b, c, d, e, g] = self.data;
        JointArray::new([f(a), f(b), f(c), f(d), f(e), f(g)])
    }
}

impl<T: Copy> JointArray<T> {
    /// 创建所有元素相同的数组
    #[inline]
    pub const fn splat(value: T) -> Self {
        JointArray::new([value, value, value, value, value, value])
    }
}

impl<T: Default> Default for JointArray<T> {
    fn default() -> Self {
        JointArray::new(Default::default())
    }
}

impl<T> Index<Joint> for JointArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, joint: Joint) -> &T {
        &self.data[joint.index()]
    }
}

impl<T> IndexMut<Joint> for JointArray<T> {
    #[inline]
    fn index_mut(&mut self, joint: Joint) -> &mut T {
        &mut self.data[joint.index()]
    }
}

impl<T> From<[T; 6]> for JointArray<T> {
    #[inline]
    fn from(data: [T; 6]) -> Self {
        JointArray::new(data)
    }
}

impl<'a, T> IntoIterator for &'a JointArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// 关节目标（角度）
pub type JointTarget = JointArray<Deg>;

impl JointTarget {
    /// 从原始角度值创建关节目标
    pub const fn from_degrees(values: [f64; 6]) -> Self {
        let [a, b, c, d, e, g] = values;
        JointArray::new([Deg(a), Deg(b), Deg(c), Deg(d), Deg(e), Deg(g)])
    }

    /// 所有关节值是否有限
    pub fn is_finite(&self) -> bool {
        self.iter().all(|d| d.is_finite())
    }
}

impl fmt::Display for JointTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.3}", value.0)?;
        }
        write!(f, "]")
    }
}
