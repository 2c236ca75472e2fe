//! 工位配置
//!
//! [`CellConfig`] 在启动时构建一次，以只读引用传给每个装配动作。默认值就是
//! 现场调好的参数；也可以从 TOML 文件加载，文件中缺省的字段沿用默认值。
//!
//! 配置文件路径：
//! - Linux: `~/.config/flashlight/cell.toml`
//! - macOS: `~/Library/Application Support/flashlight/cell.toml`
//! - Windows: `%APPDATA%\flashlight\cell.toml`

use crate::error::CellError;
use flashlight_driver::TightenTorqueParams;
use flashlight_types::{JointTarget, Orientation, Pose};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 端盖托盘槽位
pub const ENDCAP_SLOT: u8 = 0;
/// 电池托盘槽位
pub const BATTERY_SLOT: u8 = 1;
/// 灯头托盘槽位
pub const HEAD_SLOT: u8 = 2;
/// 底座托盘槽位
pub const PEDESTAL_SLOT: u8 = 3;
/// 成品放回的托盘槽位
pub const OUTPUT_SLOT: u8 = 4;

/// 装配流程用到的全部槽位
pub const REQUIRED_SLOTS: [u8; 5] = [ENDCAP_SLOT, BATTERY_SLOT, HEAD_SLOT, PEDESTAL_SLOT, OUTPUT_SLOT];

/// 工位配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CellConfig {
    /// 机器人实例
    pub robot: RobotSettings,
    /// 托盘与夹具操作使用的固定工具姿态
    pub orientation: Orientation,
    /// 运动参数
    pub motion: MotionSettings,
    /// 托盘
    pub tray: TraySettings,
    /// 夹具
    pub clamp: ClampSettings,
    /// 关节目标
    pub joints: JointTargets,
    /// 拧紧
    pub tightening: TighteningSettings,
}

/// 机器人实例设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotSettings {
    /// 控制运行时中的机器人名
    pub name: String,
    /// 生成控制器程序时使用的函数名
    pub program: String,
}

impl Default for RobotSettings {
    fn default() -> Self {
        Self {
            name: "UR5".to_string(),
            program: "flashlight_assembly".to_string(),
        }
    }
}

/// 运动参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// 直线加速度（mm/s²）
    pub acceleration: f64,
    /// 搬运速度（mm/s）
    pub transfer_speed: f64,
    /// 接近/下降速度（mm/s）
    pub approach_speed: f64,
    /// 拧紧往复时的关节速度（°/s）
    pub turning_joint_speed: f64,
    /// 拧紧回位时的关节速度（°/s）
    pub return_joint_speed: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            acceleration: 500.0,
            transfer_speed: 1000.0,
            approach_speed: 200.0,
            turning_joint_speed: 700.0,
            return_joint_speed: 200.0,
        }
    }
}

/// 托盘槽位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraySlot {
    /// 槽位编号
    pub id: u8,
    /// X（毫米）
    pub x: f64,
    /// Y（毫米）
    pub y: f64,
    /// 槽位内容
    #[serde(default)]
    pub label: String,
}

impl TraySlot {
    fn new(id: u8, x: f64, y: f64, label: &str) -> Self {
        Self {
            id,
            x,
            y,
            label: label.to_string(),
        }
    }
}

/// 各零件的抓取高度（毫米）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripHeights {
    pub endcap: f64,
    pub battery: f64,
    pub head: f64,
    pub pedestal: f64,
}

impl Default for GripHeights {
    fn default() -> Self {
        Self {
            endcap: 10.0,
            battery: 34.0,
            head: 65.3,
            pedestal: 60.9,
        }
    }
}

/// 托盘设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraySettings {
    /// 托盘上方的安全高度（毫米）
    pub clear_height: f64,
    /// 成品放回托盘的释放高度（毫米）
    pub output_release_height: f64,
    /// 抓取高度
    pub grip: GripHeights,
    /// 槽位坐标
    pub slots: Vec<TraySlot>,
}

impl Default for TraySettings {
    fn default() -> Self {
        Self {
            clear_height: 130.0,
            output_release_height: 89.90,
            grip: GripHeights::default(),
            slots: vec![
                TraySlot::new(ENDCAP_SLOT, -414.4, -456.17, "endcap"),
                TraySlot::new(BATTERY_SLOT, -334.85, -456.72, "battery"),
                TraySlot::new(HEAD_SLOT, -259.08, -457.45, "head"),
                TraySlot::new(PEDESTAL_SLOT, -182.53, -456.90, "pedestal"),
                TraySlot::new(OUTPUT_SLOT, -256.8, -458.1, "finished flashlight"),
            ],
        }
    }
}

impl TraySettings {
    /// 按编号查找槽位
    pub fn slot(&self, id: u8) -> Option<&TraySlot> {
        self.slots.iter().find(|s| s.id == id)
    }
}

/// 夹具设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClampSettings {
    /// 夹具 X（毫米）
    pub x: f64,
    /// 夹具 Y（毫米）
    pub y: f64,
    /// 拧紧时的 X（毫米）
    pub tighten_x: f64,
    /// 拧紧时的 Y（毫米）
    pub tighten_y: f64,
    /// 夹具上方的安全高度（毫米）
    pub clear_height: f64,
    /// 放入灯头的释放高度（毫米）
    pub release_head: f64,
    /// 放入电池的释放高度（毫米）
    pub release_battery: f64,
    /// 放入端盖的释放高度（毫米）
    pub release_endcap: f64,
    /// 取出成品的抓取高度（毫米）
    pub pickup_flashlight: f64,
}

impl Default for ClampSettings {
    fn default() -> Self {
        Self {
            x: -322.98,
            y: 38.3,
            tighten_x: -322.25,
            tighten_y: 38.78,
            clear_height: 250.0,
            release_head: 163.9,
            release_battery: 192.751,
            release_endcap: 197.31,
            pickup_flashlight: 185.0,
        }
    }
}

/// 关节目标（角度）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointTargets {
    /// 原点
    pub home: JointTarget,
    /// 端盖槽位上方（直线接近不可达，改用关节运动）
    pub endcap_clear: JointTarget,
    /// 托盘到底座的中转点
    pub intermediate: JointTarget,
    /// 底座上方
    pub pedestal_clear: JointTarget,
    /// 底座放置点
    pub pedestal_drop: JointTarget,
    /// 拧紧往复的起始角
    pub turning_initial: JointTarget,
    /// 拧紧往复的终止角
    pub turning_final: JointTarget,
    /// 力矩拧紧前的位置
    pub tighten_start: JointTarget,
}

impl Default for JointTargets {
    fn default() -> Self {
        Self {
            home: JointTarget::from_degrees([0.0, -90.0, 0.0, -90.0, 0.0, 0.0]),
            endcap_clear: JointTarget::from_degrees([37.41, -72.76, 83.21, -100.44, -89.73, -142.51]),
            intermediate: JointTarget::from_degrees([
                8.348806,
                -77.787199,
                103.336014,
                -25.548815,
                8.348806,
                -194.849375,
            ]),
            pedestal_clear: JointTarget::from_degrees([15.32, -96.4, 143.41, -47.02, 15.3, -180.0]),
            pedestal_drop: JointTarget::from_degrees([15.31, -84.25, 147.34, -63.09, 15.3, -180.0]),
            turning_initial: JointTarget::from_degrees([-26.51, -115.18, 112.67, -87.48, -90.0, -206.51]),
            turning_final: JointTarget::from_degrees([
                -26.510124,
                -115.194661,
                113.040864,
                -87.836005,
                -89.999890,
                11.929876,
            ]),
            tighten_start: JointTarget::from_degrees([-26.51, -115.18, 112.67, -87.48, -90.0, -206.51]),
        }
    }
}

impl JointTargets {
    fn named(&self) -> [(&'static str, &JointTarget); 8] {
        [
            ("home", &self.home),
            ("endcap_clear", &self.endcap_clear),
            ("intermediate", &self.intermediate),
            ("pedestal_clear", &self.pedestal_clear),
            ("pedestal_drop", &self.pedestal_drop),
            ("turning_initial", &self.turning_initial),
            ("turning_final", &self.turning_final),
            ("tighten_start", &self.tighten_start),
        ]
    }
}

/// 拧紧设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TighteningSettings {
    /// 往复次数
    pub cycles: u32,
    /// 力矩拧紧参数
    pub torque: TightenTorqueParams,
}

impl Default for TighteningSettings {
    fn default() -> Self {
        Self {
            cycles: 6,
            torque: TightenTorqueParams::default(),
        }
    }
}

impl CellConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flashlight").join("cell.toml"))
    }

    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, CellError> {
        let config: CellConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, CellError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CellError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CellError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "Cell configuration loaded");
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CellError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|source| CellError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 加载配置：显式路径优先，其次默认路径（存在时），否则使用默认值
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CellError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// 槽位 + 高度 → 固定姿态的工具位姿
    pub fn tray_pose(&self, slot: u8, z: f64) -> Result<Pose, CellError> {
        let slot = self.tray.slot(slot).ok_or(CellError::UnknownTraySlot(slot))?;
        Ok(Pose::new(slot.x, slot.y, z, self.orientation))
    }

    /// 夹具 XY 上指定高度的位姿
    pub fn clamp_pose(&self, z: f64) -> Pose {
        Pose::new(self.clamp.x, self.clamp.y, z, self.orientation)
    }

    /// 拧紧 XY 上指定高度的位姿
    pub fn tighten_pose(&self, z: f64) -> Pose {
        Pose::new(self.clamp.tighten_x, self.clamp.tighten_y, z, self.orientation)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), CellError> {
        let invalid = |msg: String| Err(CellError::InvalidConfig(msg));

        if self.robot.name.trim().is_empty() {
            return invalid("robot.name must not be empty".to_string());
        }
        if !self.orientation.is_finite() {
            return invalid("orientation must be finite".to_string());
        }

        let rates = [
            ("motion.acceleration", self.motion.acceleration),
            ("motion.transfer_speed", self.motion.transfer_speed),
            ("motion.approach_speed", self.motion.approach_speed),
            ("motion.turning_joint_speed", self.motion.turning_joint_speed),
            ("motion.return_joint_speed", self.motion.return_joint_speed),
        ];
        for (name, value) in rates {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{} must be positive, got {}", name, value));
            }
        }

        let mut seen = HashSet::new();
        for slot in &self.tray.slots {
            if !seen.insert(slot.id) {
                return invalid(format!("tray slot {} is defined twice", slot.id));
            }
            if !(slot.x.is_finite() && slot.y.is_finite()) {
                return invalid(format!("tray slot {} has non-finite coordinates", slot.id));
            }
        }
        for id in REQUIRED_SLOTS {
            if self.tray.slot(id).is_none() {
                return invalid(format!("tray slot {} is missing", id));
            }
        }

        let tray_clear = self.tray.clear_height;
        let tray_heights = [
            ("tray.grip.endcap", self.tray.grip.endcap),
            ("tray.grip.battery", self.tray.grip.battery),
            ("tray.grip.head", self.tray.grip.head),
            ("tray.grip.pedestal", self.tray.grip.pedestal),
            ("tray.output_release_height", self.tray.output_release_height),
        ];
        Self::check_below("tray.clear_height", tray_clear, &tray_heights)?;

        let clamp_heights = [
            ("clamp.release_head", self.clamp.release_head),
            ("clamp.release_battery", self.clamp.release_battery),
            ("clamp.release_endcap", self.clamp.release_endcap),
            ("clamp.pickup_flashlight", self.clamp.pickup_flashlight),
        ];
        Self::check_below("clamp.clear_height", self.clamp.clear_height, &clamp_heights)?;

        let clamp_xy = [self.clamp.x, self.clamp.y, self.clamp.tighten_x, self.clamp.tighten_y];
        if clamp_xy.iter().any(|v| !v.is_finite()) {
            return invalid("clamp coordinates must be finite".to_string());
        }

        for (name, target) in self.joints.named() {
            if !target.is_finite() {
                return invalid(format!("joints.{} must be finite", name));
            }
        }

        if self.tightening.cycles == 0 {
            return invalid("tightening.cycles must be at least 1".to_string());
        }
        if let Err(err) = self.tightening.torque.validate() {
            return invalid(format!("tightening.torque: {}", err));
        }

        Ok(())
    }

    fn check_below(clear_name: &str, clear: f64, heights: &[(&str, f64)]) -> Result<(), CellError> {
        if !clear.is_finite() {
            return Err(CellError::InvalidConfig(format!("{} must be finite", clear_name)));
        }
        for (name, value) in heights {
            if !value.is_finite() || *value >= clear {
                return Err(CellError::InvalidConfig(format!(
                    "{} ({}) must be below {} ({})",
                    name, value, clear_name, clear
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashlight_types::Deg;

    #[test]
    fn test_default_config_is_valid() {
        CellConfig::default().validate().unwrap();
    }

    #[test]
    fn test_tray_pose_uses_slot_xy_and_fixed_orientation() {
        let config = CellConfig::default();
        let pose = config.tray_pose(ENDCAP_SLOT, 130.0).unwrap();
        assert_eq!((pose.x, pose.y, pose.z), (-414.4, -456.17, 130.0));
        assert_eq!(pose.orientation, Orientation::TOOL_DOWN);
    }

    #[test]
    fn test_tray_pose_unknown_slot() {
        let config = CellConfig::default();
        assert!(matches!(
            config.tray_pose(7, 130.0),
            Err(CellError::UnknownTraySlot(7))
        ));
    }

    #[test]
    fn test_clamp_and_tighten_poses() {
        let config = CellConfig::default();
        let clamp = config.clamp_pose(250.0);
        assert_eq!((clamp.x, clamp.y, clamp.z), (-322.98, 38.3, 250.0));
        let tighten = config.tighten_pose(250.0);
        assert_eq!((tighten.x, tighten.y), (-322.25, 38.78));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = CellConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[motion]"));
        assert!(text.contains("[[tray.slots]]"));
        let parsed = CellConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CellConfig::from_toml_str(
            r#"
            [robot]
            name = "UR5-line2"

            [motion]
            approach_speed = 150.0
            "#,
        )
        .unwrap();

        assert_eq!(config.robot.name, "UR5-line2");
        assert_eq!(config.robot.program, "flashlight_assembly");
        assert_eq!(config.motion.approach_speed, 150.0);
        assert_eq!(config.motion.transfer_speed, 1000.0);
        assert_eq!(config.tray.slots.len(), 5);
        assert_eq!(config.tightening.cycles, 6);
    }

    #[test]
    fn test_joint_targets_from_toml_arrays() {
        let config = CellConfig::from_toml_str(
            r#"
            [joints]
            home = [0.0, -80.0, 0.0, -90.0, 0.0, 0.0]
            "#,
        )
        .unwrap();
        assert_eq!(
            config.joints.home,
            JointTarget::from_degrees([0.0, -80.0, 0.0, -90.0, 0.0, 0.0])
        );
        assert_eq!(config.joints.pedestal_drop, JointTargets::default().pedestal_drop);
    }

    #[test]
    fn test_missing_slot_rejected() {
        let mut config = CellConfig::default();
        config.tray.slots.retain(|s| s.id != OUTPUT_SLOT);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CellError::InvalidConfig(ref msg) if msg.contains("slot 4")), "{err}");
    }

    #[test]
    fn test_duplicate_slot_rejected() {
        let mut config = CellConfig::default();
        config.tray.slots.push(TraySlot::new(HEAD_SLOT, 0.0, 0.0, "spare"));
        assert!(matches!(config.validate(), Err(CellError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_positive_speed_rejected() {
        let mut config = CellConfig::default();
        config.motion.approach_speed = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("motion.approach_speed"));
    }

    #[test]
    fn test_grip_above_clear_height_rejected() {
        let mut config = CellConfig::default();
        config.tray.grip.head = 140.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tray.grip.head"));

        let mut config = CellConfig::default();
        config.clamp.pickup_flashlight = 260.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cycles_rejected() {
        let mut config = CellConfig::default();
        config.tightening.cycles = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_joint_rejected() {
        let mut config = CellConfig::default();
        config.joints.turning_final = JointTarget::splat(Deg(f64::NAN));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("joints.turning_final"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        assert!(matches!(
            CellConfig::from_toml_str("[motion\nspeed = 1"),
            Err(CellError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_broken_torque_params_rejected() {
        let content = "[tightening.torque]\ntorque_limit = nan\nstart_angle = inf\njoint_acceleration = -2.0\n";
        let err = CellConfig::from_toml_str(content).unwrap_err();
        assert!(matches!(err, CellError::InvalidConfig(_)));
        assert!(err.to_string().contains("tightening.torque"), "{err}");

        let mut config = CellConfig::default();
        config.tightening.torque.joint_speed = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_torque_table_keeps_defaults() {
        let config = CellConfig::from_toml_str("[tightening.torque]\ntorque_limit = 2.5\n").unwrap();
        assert_eq!(config.tightening.torque.torque_limit, 2.5);
        assert_eq!(config.tightening.torque.start_angle, Deg(-205.27));
        assert_eq!(config.tightening.torque.end_angle, Deg(-115.27));
        assert_eq!(config.tightening.cycles, 6);
    }

    #[test]
    fn test_save_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("cell.toml");
        match CellConfig::default().save(&path).unwrap_err() {
            CellError::ConfigIo { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("Expected ConfigIo, got {other:?}"),
        }
    }
}
