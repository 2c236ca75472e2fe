//! 笛卡尔位姿类型
//!
//! 工具末端位姿以毫米和角度表示，欧拉角按固定轴 `Rx(roll)·Ry(pitch)·Rz(yaw)`
//! 顺序组合，与控制运行时 `Pose(x, y, z, r, p, w)` 的约定一致。
//!
//! # 示例
//!
//! ```rust
//! use flashlight_types::{Orientation, Pose};
//!
//! let pose = Pose::new(-414.4, -456.17, 130.0, Orientation::TOOL_DOWN);
//! assert_eq!(pose.z, 130.0);
//!
//! let lowered = pose.with_z(10.0);
//! assert_eq!((lowered.x, lowered.y, lowered.z), (-414.4, -456.17, 10.0));
//! ```

use super::joint::JointTarget;
use super::units::Deg;
use nalgebra::{Rotation3, UnitQuaternion, Vector3};
use std::fmt;

/// 工具姿态（欧拉角，角度）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    /// 绕 X 轴
    pub roll: Deg,
    /// 绕 Y 轴
    pub pitch: Deg,
    /// 绕 Z 轴
    pub yaw: Deg,
}

impl Orientation {
    /// 工具竖直朝下、夹爪开口沿托盘方向（180°, 0°, 90°）
    pub const TOOL_DOWN: Self = Orientation::new(Deg(180.0), Deg(0.0), Deg(90.0));

    /// 创建新的姿态
    pub const fn new(roll: Deg, pitch: Deg, yaw: Deg) -> Self {
        Orientation { roll, pitch, yaw }
    }

    /// 转换为旋转矩阵
    pub fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::x_axis(), self.roll.to_rad().0)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), self.pitch.to_rad().0)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.yaw.to_rad().0)
    }

    /// 转换为旋转向量（轴 × 角度，弧度）
    ///
    /// 经由四元数求轴角，旋转矩阵的反对称部分在 180° 旋转时为零，无法给出转轴。
    pub fn rotation_vector(&self) -> [f64; 3] {
        let v = UnitQuaternion::from_rotation_matrix(&self.rotation()).scaled_axis();
        [v.x, v.y, v.z]
    }

    /// 所有分量是否有限
    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::TOOL_DOWN
    }
}

/// 笛卡尔位姿（毫米 + 角度）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    /// X 坐标（毫米）
    pub x: f64,
    /// Y 坐标（毫米）
    pub y: f64,
    /// Z 坐标（毫米）
    pub z: f64,
    /// 工具姿态
    pub orientation: Orientation,
}

impl Pose {
    /// 创建新的位姿
    pub const fn new(x: f64, y: f64, z: f64, orientation: Orientation) -> Self {
        Pose {
            x,
            y,
            z,
            orientation,
        }
    }

    /// 保持 XY 和姿态，替换高度
    pub fn with_z(self, z: f64) -> Self {
        Pose { z, ..self }
    }

    /// 位置向量（毫米）
    pub fn position(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// 到基座原点的距离（毫米）
    pub fn reach(&self) -> f64 {
        self.position().norm()
    }

    /// 所有分量是否有限
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.orientation.is_finite()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pose({:.3}, {:.3}, {:.3}, {:.2}, {:.2}, {:.2})",
            self.x,
            self.y,
            self.z,
            self.orientation.roll.0,
            self.orientation.pitch.0,
            self.orientation.yaw.0
        )
    }
}

/// 运动目标
///
/// 关节运动和直线运动都可以接受两种目标：直线运动到关节目标时，
/// 由控制器对其正解做直线插补。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "snake_case"))]
pub enum MotionTarget {
    /// 笛卡尔位姿
    Pose(Pose),
    /// 关节角度
    Joints(JointTarget),
}

impl MotionTarget {
    /// 如果是位姿目标，返回位姿
    pub fn as_pose(&self) -> Option<&Pose> {
        match self {
            MotionTarget::Pose(pose) => Some(pose),
            MotionTarget::Joints(_) => None,
        }
    }

    /// 如果是关节目标，返回关节角度
    pub fn as_joints(&self) -> Option<&JointTarget> {
        match self {
            MotionTarget::Joints(joints) => Some(joints),
            MotionTarget::Pose(_) => None,
        }
    }

    /// 所有分量是否有限
    pub fn is_finite(&self) -> bool {
        match self {
            MotionTarget::Pose(pose) => pose.is_finite(),
            MotionTarget::Joints(joints) => joints.is_finite(),
        }
    }
}

impl From<Pose> for MotionTarget {
    fn from(pose: Pose) -> Self {
        MotionTarget::Pose(pose)
    }
}

impl From<JointTarget> for MotionTarget {
    fn from(joints: JointTarget) -> Self {
        MotionTarget::Joints(joints)
    }
}

impl fmt::Display for MotionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionTarget::Pose(pose) => write!(f, "{}", pose),
            MotionTarget::Joints(joints) => write!(f, "Joints{}", joints),
        }
    }
}
