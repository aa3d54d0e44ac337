//! 像素尺寸标定流程
//!
//! 把机械臂移到拍摄位姿，由操作员在画面上找直尺相距 100 mm 的
//! 两个点，键入像素坐标。轮询循环没有超时，Ctrl+C 手动中断。

use crate::commands::config::{load_config, save_config};
use anyhow::{Context, Result};
use cobot_client::MotionController;
use cobot_driver::{ArmDevice, Clock, MockArmDevice, MockClock, SerialArmDevice, SpinClock};
use cobot_operator::{CalibrationSession, CalibrationState, OperatorConfig};
use nalgebra::Vector2;
use std::io::{BufRead, Write};

/// 运行标定
pub fn run(mock: bool, config_path: Option<&str>) -> Result<()> {
    let mut config = load_config(config_path)?;

    ctrlc::set_handler(|| {
        eprintln!("\n标定中断");
        std::process::exit(130);
    })
    .context("failed to install the Ctrl+C handler")?;

    println!("开始标定 ...");
    println!("移动到拍摄位姿 ...");
    if mock {
        let clock = MockClock::new();
        let device = MockArmDevice::new(clock.clone());
        move_to_capture(device, clock, &config)?;
    } else {
        let device = SerialArmDevice::open(
            &config.controller.port,
            config.controller.baud_rate,
            config.controller.suction_channel,
        )
        .with_context(|| format!("failed to open {}", config.controller.port))?;
        move_to_capture(device, SpinClock::new(), &config)?;
    }

    println!("把直尺放进画面，依次输入图像上相距 100 mm 的两个点。");
    println!("格式：row,col（像素坐标），Ctrl+C 中断。");

    let mut session = CalibrationSession::new();
    let stdin = std::io::stdin();

    while session.state() != CalibrationState::Done {
        let ordinal = match session.state() {
            CalibrationState::AwaitingFirstPoint => "第一个点",
            CalibrationState::AwaitingSecondPoint => "第二个点",
            CalibrationState::Done => unreachable!("loop exits on Done"),
        };
        print!("{} > ", ordinal);
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            anyhow::bail!("input closed before calibration finished");
        }

        let point = match parse_point(&line) {
            Some(point) => point,
            None => {
                println!("无法解析 {:?}，请输入 row,col", line.trim());
                continue;
            },
        };

        if let Err(e) = session.feed_point(point) {
            println!("❌ {}", e);
        }
    }

    let pixel_size = session
        .pixel_size_m()
        .expect("session is Done, pixel size present");
    config.pixel_size_m = pixel_size;
    let path = save_config(&config, config_path)?;

    println!("标定完成，像素尺寸 {:.6e} m/pixel", pixel_size);
    println!("✅ 配置已写入 {}", path.display());
    Ok(())
}

fn move_to_capture<D: ArmDevice, C: Clock>(
    device: D,
    clock: C,
    config: &OperatorConfig,
) -> Result<()> {
    let mut controller = MotionController::new(device, clock, config.controller.clone())?;
    controller.move_to_place("capture", None)?;
    Ok(())
}

/// 解析 `row,col` 形式的像素坐标
fn parse_point(line: &str) -> Option<Vector2<f64>> {
    let (row, col) = line.trim().split_once(',')?;
    Some(Vector2::new(
        row.trim().parse().ok()?,
        col.trim().parse().ok()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("120,340"), Some(Vector2::new(120.0, 340.0)));
        assert_eq!(parse_point("  12.5 , 34 \n"), Some(Vector2::new(12.5, 34.0)));
        assert_eq!(parse_point("120 340"), None);
        assert_eq!(parse_point("a,b"), None);
        assert_eq!(parse_point(""), None);
    }
}
