//! 装配动作
//!
//! 每个函数是一段固定的动作编排：取料、放料、拧紧。函数只向机器人句柄发送命令，
//! 不读取任何反馈；调用前机器人必须停在上一段动作结束的位置。
//! 后端返回的任何错误立即向上传播，不做重试。

use crate::config::{CellConfig, ENDCAP_SLOT};
use crate::error::CellError;
use flashlight_driver::{Robot, ToolCommand};
use tracing::debug;

/// 设置直线速度和加速度
pub fn set_motion_params<R: Robot + ?Sized>(
    robot: &mut R,
    speed: f64,
    acceleration: f64,
) -> Result<(), CellError> {
    robot.set_speed(speed)?;
    robot.set_acceleration(acceleration)?;
    Ok(())
}

/// 从托盘槽位取料
///
/// 在安全高度接近、直线下降、闭合夹爪、直线回到安全高度。
/// 端盖槽位的直线接近路径不可达，改为关节运动到预设的关节目标。
pub fn pickup_from_tray<R: Robot + ?Sized>(
    robot: &mut R,
    config: &CellConfig,
    slot: u8,
    pickup_height: f64,
    clear_height: f64,
) -> Result<(), CellError> {
    let approach = config.tray_pose(slot, clear_height)?;
    let pickup = config.tray_pose(slot, pickup_height)?;
    debug!(slot, pickup_height, clear_height, "Picking up from tray");

    set_motion_params(robot, config.motion.transfer_speed, config.motion.acceleration)?;
    if slot == ENDCAP_SLOT {
        robot.move_j(config.joints.endcap_clear.into())?;
    } else {
        robot.move_j(approach.into())?;
    }
    robot.move_l(pickup.into())?;
    robot.run_tool(ToolCommand::CloseAndWait)?;
    robot.move_l(approach.into())?;
    Ok(())
}

/// 把零件放回托盘槽位
///
/// 直线移动到安全高度，降速后直线下降、张开夹爪、回到安全高度。
pub fn release_into_tray<R: Robot + ?Sized>(
    robot: &mut R,
    config: &CellConfig,
    slot: u8,
    release_height: f64,
    clear_height: f64,
) -> Result<(), CellError> {
    let approach = config.tray_pose(slot, clear_height)?;
    let release = config.tray_pose(slot, release_height)?;
    debug!(slot, release_height, clear_height, "Releasing into tray");

    set_motion_params(robot, config.motion.transfer_speed, config.motion.acceleration)?;
    robot.move_l(approach.into())?;
    robot.set_speed(config.motion.approach_speed)?;
    robot.move_l(release.into())?;
    robot.run_tool(ToolCommand::Open)?;
    robot.move_l(approach.into())?;
    Ok(())
}

/// 把已抓取的端盖放到底座上
///
/// 托盘与底座之间的直线路径经过奇异位形，必须经中转关节目标过渡。
pub fn move_endcap_to_pedestal<R: Robot + ?Sized>(
    robot: &mut R,
    config: &CellConfig,
) -> Result<(), CellError> {
    let joints = &config.joints;
    debug!("Moving endcap to pedestal");

    set_motion_params(robot, config.motion.transfer_speed, config.motion.acceleration)?;
    robot.move_j(joints.intermediate.into())?;
    robot.move_j(joints.pedestal_clear.into())?;
    robot.move_l(joints.pedestal_drop.into())?;
    robot.run_tool(ToolCommand::Open)?;
    robot.move_j(joints.pedestal_clear.into())?;
    Ok(())
}

/// 从夹具中取出零件
///
/// 只在拧紧之后调用：此时工具已在夹具上方，直接降速下降。
pub fn pickup_from_clamp<R: Robot + ?Sized>(
    robot: &mut R,
    config: &CellConfig,
    pickup_height: f64,
    clear_height: f64,
) -> Result<(), CellError> {
    let safe = config.clamp_pose(clear_height);
    let pickup = config.clamp_pose(pickup_height);
    debug!(pickup_height, clear_height, "Picking up from clamp");

    set_motion_params(robot, config.motion.transfer_speed, config.motion.acceleration)?;
    robot.set_speed(config.motion.approach_speed)?;
    robot.move_l(pickup.into())?;
    robot.run_tool(ToolCommand::CloseAndWait)?;
    robot.move_l(safe.into())?;
    Ok(())
}

/// 把零件放入夹具
pub fn release_into_clamp<R: Robot + ?Sized>(
    robot: &mut R,
    config: &CellConfig,
    release_height: f64,
    clear_height: f64,
) -> Result<(), CellError> {
    let safe = config.clamp_pose(clear_height);
    let release = config.clamp_pose(release_height);
    debug!(release_height, clear_height, "Releasing into clamp");

    set_motion_params(robot, config.motion.transfer_speed, config.motion.acceleration)?;
    robot.move_j(safe.into())?;
    robot.set_speed(config.motion.approach_speed)?;
    robot.move_l(release.into())?;
    robot.run_tool(ToolCommand::Open)?;
    robot.move_l(safe.into())?;
    Ok(())
}

/// 拧紧端盖
///
/// 夹紧后在两个关节目标之间往复（闭合、转到终止角、张开、回到起始角），
/// 模拟旋入动作；最后由控制器执行力矩限制拧紧并松开夹具。
pub fn tighten_cap<R: Robot + ?Sized>(robot: &mut R, config: &CellConfig) -> Result<(), CellError> {
    let joints = &config.joints;
    let motion = &config.motion;
    let safe = config.tighten_pose(config.clamp.clear_height);
    debug!(cycles = config.tightening.cycles, "Tightening cap");

    set_motion_params(robot, motion.transfer_speed, motion.acceleration)?;
    robot.run_tool(ToolCommand::Clamp)?;
    robot.move_j(safe.into())?;
    robot.move_l(joints.turning_initial.into())?;
    robot.set_speed_joints(motion.turning_joint_speed)?;

    for cycle in 0..config.tightening.cycles {
        debug!(cycle, "Turning cycle");
        robot.run_tool(ToolCommand::CloseAndWait)?;
        robot.move_j(joints.turning_final.into())?;
        robot.run_tool(ToolCommand::Open)?;
        robot.set_speed_joints(motion.return_joint_speed)?;
        robot.move_j(joints.turning_initial.into())?;
    }

    robot.move_j(joints.tighten_start.into())?;
    robot.run_tool(ToolCommand::TightenTorque(config.tightening.torque))?;
    robot.run_tool(ToolCommand::Unclamp)?;
    Ok(())
}
