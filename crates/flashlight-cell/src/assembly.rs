//! 装配主流程
//!
//! [`run_assembly`] 按固定顺序执行 [`AssemblyStep::SEQUENCE`]，没有分支，
//! 也不根据传感器反馈调整。任何一步失败，整个流程在该命令处停止，
//! 错误包装为 [`CellError::StepFailed`] 返回。

use crate::choreography::{
    move_endcap_to_pedestal, pickup_from_clamp, pickup_from_tray, release_into_clamp,
    release_into_tray, set_motion_params, tighten_cap,
};
use crate::config::{BATTERY_SLOT, CellConfig, ENDCAP_SLOT, HEAD_SLOT, OUTPUT_SLOT, PEDESTAL_SLOT};
use crate::error::CellError;
use flashlight_driver::{RecordingRobot, Robot, RobotCommand, RobotError, ToolCommand};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, info_span, warn};

/// 装配步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssemblyStep {
    /// 松开夹具（上次运行可能留下夹紧状态）
    Reset,
    /// 回到原点
    Home,
    /// 端盖：托盘 → 底座
    EndcapToPedestal,
    /// 灯头：托盘 → 夹具
    HeadToClamp,
    /// 电池：托盘 → 夹具（装入灯头）
    BatteryToClamp,
    /// 底座组件：托盘 → 夹具并拧紧
    TightenCap,
    /// 成品：夹具 → 托盘输出槽位
    FinishedToTray,
    /// 回到原点
    ReturnHome,
}

impl AssemblyStep {
    /// 固定执行顺序
    pub const SEQUENCE: [AssemblyStep; 8] = [
        AssemblyStep::Reset,
        AssemblyStep::Home,
        AssemblyStep::EndcapToPedestal,
        AssemblyStep::HeadToClamp,
        AssemblyStep::BatteryToClamp,
        AssemblyStep::TightenCap,
        AssemblyStep::FinishedToTray,
        AssemblyStep::ReturnHome,
    ];

    /// 步骤名
    pub const fn name(self) -> &'static str {
        match self {
            AssemblyStep::Reset => "reset",
            AssemblyStep::Home => "home",
            AssemblyStep::EndcapToPedestal => "endcap_to_pedestal",
            AssemblyStep::HeadToClamp => "head_to_clamp",
            AssemblyStep::BatteryToClamp => "battery_to_clamp",
            AssemblyStep::TightenCap => "tighten_cap",
            AssemblyStep::FinishedToTray => "finished_to_tray",
            AssemblyStep::ReturnHome => "return_home",
        }
    }

    /// 执行本步骤
    pub fn run<R: Robot + ?Sized>(self, robot: &mut R, config: &CellConfig) -> Result<(), CellError> {
        let tray = &config.tray;
        let clamp = &config.clamp;
        match self {
            AssemblyStep::Reset => robot.run_tool(ToolCommand::Unclamp)?,
            AssemblyStep::Home => {
                robot.move_j(config.joints.home.into())?;
                set_motion_params(robot, config.motion.transfer_speed, config.motion.acceleration)?;
            },
            AssemblyStep::EndcapToPedestal => {
                pickup_from_tray(robot, config, ENDCAP_SLOT, tray.grip.endcap, tray.clear_height)?;
                move_endcap_to_pedestal(robot, config)?;
            },
            AssemblyStep::HeadToClamp => {
                pickup_from_tray(robot, config, HEAD_SLOT, tray.grip.head, tray.clear_height)?;
                release_into_clamp(robot, config, clamp.release_head, clamp.clear_height)?;
            },
            AssemblyStep::BatteryToClamp => {
                pickup_from_tray(robot, config, BATTERY_SLOT, tray.grip.battery, tray.clear_height)?;
                release_into_clamp(robot, config, clamp.release_battery, clamp.clear_height)?;
            },
            AssemblyStep::TightenCap => {
                pickup_from_tray(robot, config, PEDESTAL_SLOT, tray.grip.pedestal, tray.clear_height)?;
                tighten_cap(robot, config)?;
            },
            AssemblyStep::FinishedToTray => {
                pickup_from_clamp(robot, config, clamp.pickup_flashlight, clamp.clear_height)?;
                release_into_tray(
                    robot,
                    config,
                    OUTPUT_SLOT,
                    tray.output_release_height,
                    tray.clear_height,
                )?;
            },
            AssemblyStep::ReturnHome => robot.move_j(config.joints.home.into())?,
        }
        Ok(())
    }
}

impl fmt::Display for AssemblyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 装配结果
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    /// 机器人名
    pub robot: String,
    /// 已完成的步骤
    pub steps_completed: Vec<AssemblyStep>,
    /// 发出的命令数
    pub commands_issued: usize,
    /// 总耗时
    pub elapsed: Duration,
}

/// 统计命令数的句柄包装
struct Counting<'a, R: ?Sized> {
    inner: &'a mut R,
    count: usize,
}

impl<R: Robot + ?Sized> Robot for Counting<'_, R> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn execute(&mut self, command: RobotCommand) -> Result<(), RobotError> {
        self.inner.execute(command)?;
        self.count += 1;
        Ok(())
    }
}

/// 执行完整装配流程
pub fn run_assembly<R: Robot + ?Sized>(
    robot: &mut R,
    config: &CellConfig,
) -> Result<AssemblyReport, CellError> {
    config.validate()?;

    let start = Instant::now();
    let mut counting = Counting {
        inner: robot,
        count: 0,
    };
    let mut steps_completed = Vec::with_capacity(AssemblyStep::SEQUENCE.len());
    info!(robot = counting.name(), "Starting flashlight assembly");

    for step in AssemblyStep::SEQUENCE {
        let _span = info_span!("step", name = step.name()).entered();
        let issued_before = counting.count;

        if let Err(err) = step.run(&mut counting, config) {
            warn!(%step, error = %err, "Assembly step failed, stopping");
            return Err(CellError::StepFailed {
                step,
                source: Box::new(err),
            });
        }

        info!(%step, commands = counting.count - issued_before, "Step complete");
        steps_completed.push(step);
    }

    let report = AssemblyReport {
        robot: counting.name().to_string(),
        steps_completed,
        commands_issued: counting.count,
        elapsed: start.elapsed(),
    };
    info!(
        commands = report.commands_issued,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Flashlight assembly complete"
    );
    Ok(report)
}

/// 生成完整命令序列（不连接机器人）
///
/// 在 [`RecordingRobot`] 上演练一遍，同样会检查可达性和工具互锁。
pub fn plan(config: &CellConfig) -> Result<Vec<RobotCommand>, CellError> {
    let mut robot = RecordingRobot::new(config.robot.name.clone());
    run_assembly(&mut robot, config)?;
    Ok(robot.into_commands())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_order() {
        let names: Vec<_> = AssemblyStep::SEQUENCE.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            [
                "reset",
                "home",
                "endcap_to_pedestal",
                "head_to_clamp",
                "battery_to_clamp",
                "tighten_cap",
                "finished_to_tray",
                "return_home",
            ]
        );
    }

    #[test]
    fn test_report_counts_commands() {
        let config = CellConfig::default();
        let mut robot = RecordingRobot::new("UR5");
        let report = run_assembly(&mut robot, &config).unwrap();

        assert_eq!(report.robot, "UR5");
        assert_eq!(report.steps_completed, AssemblyStep::SEQUENCE);
        assert_eq!(report.commands_issued, robot.commands().len());
    }

    #[test]
    fn test_invalid_config_issues_nothing() {
        let mut config = CellConfig::default();
        config.motion.transfer_speed = -1.0;
        let mut robot = RecordingRobot::new("UR5");

        let err = run_assembly(&mut robot, &config).unwrap_err();
        assert!(matches!(err, CellError::InvalidConfig(_)));
        assert!(robot.commands().is_empty());
    }

    #[test]
    fn test_plan_matches_run() {
        let config = CellConfig::default();
        let mut robot = RecordingRobot::new("UR5");
        run_assembly(&mut robot, &config).unwrap();
        assert_eq!(plan(&config).unwrap(), robot.into_commands());
    }

    #[test]
    fn test_step_display() {
        assert_eq!(AssemblyStep::FinishedToTray.to_string(), "finished_to_tray");
    }
}
