//! 记录型机器人后端
//!
//! [`RecordingRobot`] 不连接硬件：它按顺序记录每条被接受的命令，模拟夹爪与
//! 夹具状态，并像控制运行时一样对不可达目标报错。用于 `plan`/`sim` 演练和测试。
//!
//! # 示例
//!
//! ```rust
//! use flashlight_driver::{ClampState, RecordingRobot, Robot, ToolCommand};
//!
//! let mut robot = RecordingRobot::new("UR5");
//! robot.run_tool(ToolCommand::Unclamp).unwrap();
//! robot.run_tool(ToolCommand::Unclamp).unwrap();
//! assert_eq!(robot.clamp(), ClampState::Released);
//! assert_eq!(robot.commands().len(), 2);
//! ```

use crate::command::{RobotCommand, ToolCommand};
use crate::error::RobotError;
use crate::robot::Robot;
use flashlight_types::{MotionTarget, Pose};
use tracing::{trace, warn};

/// 工作空间限制
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkspaceLimits {
    /// 工具中心到基座原点的最大距离（毫米）
    pub max_reach_mm: f64,
    /// 最低允许高度（毫米，基座坐标系）
    pub min_z_mm: f64,
    /// 关节角绝对值上限（度）
    pub joint_limit_deg: f64,
}

impl WorkspaceLimits {
    /// UR5：850 mm 工作半径，关节 ±360°
    pub const UR5: Self = WorkspaceLimits {
        max_reach_mm: 850.0,
        min_z_mm: 0.0,
        joint_limit_deg: 360.0,
    };

    /// 不做任何限制
    pub const UNLIMITED: Self = WorkspaceLimits {
        max_reach_mm: f64::INFINITY,
        min_z_mm: f64::NEG_INFINITY,
        joint_limit_deg: f64::INFINITY,
    };

    /// 检查运动目标是否可达
    pub fn check(&self, target: &MotionTarget) -> Result<(), RobotError> {
        if !target.is_finite() {
            return Err(RobotError::InvalidParameter(format!(
                "non-finite motion target: {}",
                target
            )));
        }

        match target {
            MotionTarget::Pose(pose) => self.check_pose(pose),
            MotionTarget::Joints(joints) => {
                for (joint, value) in joints.iter_joints() {
                    if value.abs().0 > self.joint_limit_deg {
                        return Err(RobotError::JointLimitExceeded {
                            joint,
                            value: value.0,
                            limit: self.joint_limit_deg,
                        });
                    }
                }
                Ok(())
            },
        }
    }

    fn check_pose(&self, pose: &Pose) -> Result<(), RobotError> {
        let reach = pose.reach();
        if reach > self.max_reach_mm {
            return Err(RobotError::Unreachable {
                target: pose.to_string(),
                reason: format!(
                    "{:.1} mm from base exceeds reach of {:.1} mm",
                    reach, self.max_reach_mm
                ),
            });
        }
        if pose.z < self.min_z_mm {
            return Err(RobotError::Unreachable {
                target: pose.to_string(),
                reason: format!("z {:.1} mm below floor at {:.1} mm", pose.z, self.min_z_mm),
            });
        }
        Ok(())
    }
}

impl Default for WorkspaceLimits {
    fn default() -> Self {
        Self::UR5
    }
}

/// 夹爪状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripperState {
    /// 张开
    Open,
    /// 闭合
    Closed,
}

/// 夹具状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClampState {
    /// 松开
    Released,
    /// 夹紧
    Engaged,
}

/// 记录型机器人
#[derive(Debug, Clone)]
pub struct RecordingRobot {
    name: String,
    limits: WorkspaceLimits,
    commands: Vec<RobotCommand>,
    gripper: GripperState,
    clamp: ClampState,
    linear_speed: Option<f64>,
    linear_acceleration: Option<f64>,
    joint_speed: Option<f64>,
    last_target: Option<MotionTarget>,
    fail_at: Option<usize>,
}

impl RecordingRobot {
    /// 创建新的记录型机器人（UR5 工作空间限制，夹爪张开，夹具松开）
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limits: WorkspaceLimits::UR5,
            commands: Vec::new(),
            gripper: GripperState::Open,
            clamp: ClampState::Released,
            linear_speed: None,
            linear_acceleration: None,
            joint_speed: None,
            last_target: None,
            fail_at: None,
        }
    }

    /// 设置工作空间限制
    pub fn with_limits(mut self, limits: WorkspaceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// 故障注入：第 `index` 条命令（从 0 开始）被拒绝
    pub fn fail_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// 已接受的命令
    pub fn commands(&self) -> &[RobotCommand] {
        &self.commands
    }

    /// 取出已接受的命令
    pub fn into_commands(self) -> Vec<RobotCommand> {
        self.commands
    }

    /// 当前夹爪状态
    pub fn gripper(&self) -> GripperState {
        self.gripper
    }

    /// 当前夹具状态
    pub fn clamp(&self) -> ClampState {
        self.clamp
    }

    /// 当前直线速度（mm/s）
    pub fn linear_speed(&self) -> Option<f64> {
        self.linear_speed
    }

    /// 当前直线加速度（mm/s²）
    pub fn linear_acceleration(&self) -> Option<f64> {
        self.linear_acceleration
    }

    /// 当前关节速度（°/s）
    pub fn joint_speed(&self) -> Option<f64> {
        self.joint_speed
    }

    /// 最近一次运动目标
    pub fn last_target(&self) -> Option<&MotionTarget> {
        self.last_target.as_ref()
    }

    fn check_rate(name: &str, value: f64) -> Result<f64, RobotError> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(RobotError::InvalidParameter(format!(
                "{} must be positive and finite, got {}",
                name, value
            )))
        }
    }

    fn apply_tool(&mut self, tool: &ToolCommand) -> Result<(), RobotError> {
        match tool {
            ToolCommand::CloseAndWait => self.gripper = GripperState::Closed,
            ToolCommand::Open => self.gripper = GripperState::Open,
            ToolCommand::Clamp => self.clamp = ClampState::Engaged,
            ToolCommand::Unclamp => self.clamp = ClampState::Released,
            ToolCommand::TightenTorque(params) => {
                params.validate()?;
                if self.clamp != ClampState::Engaged {
                    return Err(RobotError::ToolFault {
                        code: tool.code(),
                        reason: "clamp is not engaged".to_string(),
                    });
                }
            },
        }
        Ok(())
    }
}

impl Robot for RecordingRobot {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self, command: RobotCommand) -> Result<(), RobotError> {
        let index = self.commands.len();
        if self.fail_at == Some(index) {
            warn!(robot = %self.name, index, %command, "Injected command failure");
            return Err(RobotError::CommandRejected {
                index,
                command: command.to_string(),
            });
        }

        match &command {
            RobotCommand::MoveJ(target) | RobotCommand::MoveL(target) => {
                self.limits.check(target)?;
                self.last_target = Some(*target);
            },
            RobotCommand::SetSpeed(v) => {
                self.linear_speed = Some(Self::check_rate("linear speed", *v)?);
            },
            RobotCommand::SetAcceleration(a) => {
                self.linear_acceleration = Some(Self::check_rate("linear acceleration", *a)?);
            },
            RobotCommand::SetSpeedJoints(v) => {
                self.joint_speed = Some(Self::check_rate("joint speed", *v)?);
            },
            RobotCommand::RunTool(tool) => self.apply_tool(tool)?,
        }

        trace!(robot = %self.name, index, %command, "Command accepted");
        self.commands.push(command);
        Ok(())
    }
}
