//! 命令类型定义模块
//!
//! 控制运行时接受的全部指令：关节/直线运动、速度与加速度设置，
//! 以及插入控制器脚本环境执行的工具代码（夹爪、夹具、力矩拧紧）。

use crate::error::RobotError;
use flashlight_types::{Deg, MotionTarget};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 力矩拧紧参数
///
/// 对应控制器侧 `tighten_torque(...)` 程序的 9 个参数，按调用顺序排列。
/// 缺省值为工位调校后的参数。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TightenTorqueParams {
    /// 力矩上限
    pub torque_limit: f64,
    /// 末端关节起始角
    pub start_angle: Deg,
    /// 末端关节终止角
    pub end_angle: Deg,
    /// 关节加速度
    pub joint_acceleration: f64,
    /// 关节速度
    pub joint_speed: f64,
    /// 力矩检查次数
    pub torque_checks: u32,
    /// 夹爪力（0-255）
    pub gripper_force: u8,
    /// 夹爪速度（0-255）
    pub gripper_speed: u8,
    /// 松开时的夹爪开度（0-255）
    pub gripper_open: u8,
}

impl Default for TightenTorqueParams {
    fn default() -> Self {
        Self {
            torque_limit: 2.0,
            start_angle: Deg(-205.27),
            end_angle: Deg(-115.27),
            joint_acceleration: 2.0,
            joint_speed: 2.0,
            torque_checks: 1,
            gripper_force: 100,
            gripper_speed: 100,
            gripper_open: 50,
        }
    }
}

impl TightenTorqueParams {
    /// 检查参数：角度有限，力矩上限与关节速度/加速度为正的有限值
    pub fn validate(&self) -> Result<(), RobotError> {
        let positive = [
            ("torque_limit", self.torque_limit),
            ("joint_acceleration", self.joint_acceleration),
            ("joint_speed", self.joint_speed),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RobotError::InvalidParameter(format!(
                    "tighten_torque {} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        for (name, angle) in [("start_angle", self.start_angle), ("end_angle", self.end_angle)] {
            if !angle.is_finite() {
                return Err(RobotError::InvalidParameter(format!(
                    "tighten_torque {} must be finite, got {}",
                    name, angle.0
                )));
            }
        }
        Ok(())
    }
}

/// 工具命令
///
/// 控制器脚本环境中的工具程序，以插入代码的方式执行。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", content = "params", rename_all = "snake_case")]
pub enum ToolCommand {
    /// 闭合夹爪并等待完成
    CloseAndWait,
    /// 张开夹爪
    Open,
    /// 夹具夹紧
    Clamp,
    /// 夹具松开
    Unclamp,
    /// 力矩限制拧紧（闭环由控制器执行）
    TightenTorque(TightenTorqueParams),
}

impl ToolCommand {
    /// 控制器侧程序名
    pub const fn name(&self) -> &'static str {
        match self {
            ToolCommand::CloseAndWait => "rq_close_and_wait",
            ToolCommand::Open => "rq_open",
            ToolCommand::Clamp => "clamp",
            ToolCommand::Unclamp => "unclamp",
            ToolCommand::TightenTorque(_) => "tighten_torque",
        }
    }

    /// 渲染为控制器脚本调用
    pub fn code(&self) -> String {
        match self {
            ToolCommand::TightenTorque(p) => format!(
                "{}({}, {}, {}, {}, {}, {}, {}, {}, {})",
                self.name(),
                p.torque_limit,
                p.start_angle.0,
                p.end_angle.0,
                p.joint_acceleration,
                p.joint_speed,
                p.torque_checks,
                p.gripper_force,
                p.gripper_speed,
                p.gripper_open
            ),
            _ => format!("{}()", self.name()),
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// 机器人命令
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args", rename_all = "snake_case")]
pub enum RobotCommand {
    /// 关节空间运动
    MoveJ(MotionTarget),
    /// 直线运动
    MoveL(MotionTarget),
    /// 直线速度（mm/s）
    SetSpeed(f64),
    /// 直线加速度（mm/s²）
    SetAcceleration(f64),
    /// 关节速度（°/s）
    SetSpeedJoints(f64),
    /// 工具代码
    RunTool(ToolCommand),
}

impl RobotCommand {
    /// 运动目标（非运动命令返回 `None`）
    pub fn target(&self) -> Option<&MotionTarget> {
        match self {
            RobotCommand::MoveJ(target) | RobotCommand::MoveL(target) => Some(target),
            _ => None,
        }
    }

    /// 是否为运动命令
    pub fn is_motion(&self) -> bool {
        self.target().is_some()
    }

    /// 工具命令（非工具命令返回 `None`）
    pub fn tool(&self) -> Option<&ToolCommand> {
        match self {
            RobotCommand::RunTool(tool) => Some(tool),
            _ => None,
        }
    }
}

impl fmt::Display for RobotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RobotCommand::MoveJ(target) => write!(f, "MoveJ {}", target),
            RobotCommand::MoveL(target) => write!(f, "MoveL {}", target),
            RobotCommand::SetSpeed(v) => write!(f, "SetSpeed {} mm/s", v),
            RobotCommand::SetAcceleration(a) => write!(f, "SetAcceleration {} mm/s²", a),
            RobotCommand::SetSpeedJoints(v) => write!(f, "SetSpeedJoints {} °/s", v),
            RobotCommand::RunTool(tool) => write!(f, "RunCode {}", tool),
        }
    }
}
