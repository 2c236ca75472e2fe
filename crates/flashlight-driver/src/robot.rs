//! 机器人能力接口
//!
//! 装配动作只通过 [`Robot`] 与控制运行时交互。每次调用都阻塞到运行时
//! 完成（或失败）为止，句柄以 `&mut` 传递，保证命令严格串行。

use crate::command::{RobotCommand, ToolCommand};
use crate::error::RobotError;
use flashlight_types::MotionTarget;

/// 机器人句柄
///
/// 实现者只需提供 [`Robot::execute`]，其余方法是对命令枚举的便捷封装。
pub trait Robot {
    /// 机器人实例名（如 `UR5`）
    fn name(&self) -> &str;

    /// 执行一条命令，返回时命令已完成
    fn execute(&mut self, command: RobotCommand) -> Result<(), RobotError>;

    /// 关节空间运动
    fn move_j(&mut self, target: MotionTarget) -> Result<(), RobotError> {
        self.execute(RobotCommand::MoveJ(target))
    }

    /// 直线运动
    fn move_l(&mut self, target: MotionTarget) -> Result<(), RobotError> {
        self.execute(RobotCommand::MoveL(target))
    }

    /// 设置直线速度（mm/s）
    fn set_speed(&mut self, speed: f64) -> Result<(), RobotError> {
        self.execute(RobotCommand::SetSpeed(speed))
    }

    /// 设置直线加速度（mm/s²）
    fn set_acceleration(&mut self, acceleration: f64) -> Result<(), RobotError> {
        self.execute(RobotCommand::SetAcceleration(acceleration))
    }

    /// 设置关节速度（°/s）
    fn set_speed_joints(&mut self, speed: f64) -> Result<(), RobotError> {
        self.execute(RobotCommand::SetSpeedJoints(speed))
    }

    /// 执行工具代码
    fn run_tool(&mut self, tool: ToolCommand) -> Result<(), RobotError> {
        self.execute(RobotCommand::RunTool(tool))
    }
}

impl<R: Robot + ?Sized> Robot for &mut R {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&mut self, command: RobotCommand) -> Result<(), RobotError> {
        (**self).execute(command)
    }
}

impl<R: Robot + ?Sized> Robot for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&mut self, command: RobotCommand) -> Result<(), RobotError> {
        (**self).execute(command)
    }
}
