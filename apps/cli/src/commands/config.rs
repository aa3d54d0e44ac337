//! 配置管理命令
//!
//! 配置文件是单个 TOML，位于用户配置目录（`<config_dir>/cobot/config.toml`），
//! 结构即 [`OperatorConfig`]。`set` 只改给出的字段，其余保持原值。

use anyhow::{Context, Result};
use clap::Subcommand;
use cobot_operator::{InterfaceKind, OperatorConfig};
use std::fs;
use std::path::PathBuf;

/// 配置目录
fn config_dir() -> Result<PathBuf> {
    let mut path = dirs::config_dir().context("cannot determine the user config directory")?;
    path.push("cobot");
    Ok(path)
}

/// 配置文件路径
pub fn config_file() -> Result<PathBuf> {
    let mut path = config_dir()?;
    path.push("config.toml");
    Ok(path)
}

/// 加载配置（显式路径优先，文件缺失回落到默认值）
pub fn load_config(explicit_path: Option<&str>) -> Result<OperatorConfig> {
    let path = match explicit_path {
        Some(p) => PathBuf::from(p),
        None => config_file()?,
    };

    if !path.exists() {
        return Ok(OperatorConfig::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// 保存配置
pub fn save_config(config: &OperatorConfig, explicit_path: Option<&str>) -> Result<PathBuf> {
    let path = match explicit_path {
        Some(p) => PathBuf::from(p),
        None => {
            let dir = config_dir()?;
            fs::create_dir_all(&dir).context("failed to create the config directory")?;
            config_file()?
        },
    };

    let content = toml::to_string_pretty(config).context("failed to serialize config")?;
    fs::write(&path, content)
        .with_context(|| format!("failed to write config file {}", path.display()))?;
    Ok(path)
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印当前配置
    Show,

    /// 打印配置文件路径
    Path,

    /// 设置配置项
    Set {
        /// 串口设备路径（如 /dev/ttyACM0）
        #[arg(long)]
        port: Option<String>,

        /// 澄清问题的目标语言
        #[arg(long)]
        language: Option<String>,

        /// 操作员接口（terminal / audio）
        #[arg(long)]
        interface: Option<String>,

        /// 像素尺寸（米/像素）
        #[arg(long)]
        pixel_size: Option<f64>,
    },
}

/// 执行配置命令
pub fn execute(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = load_config(None)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        },

        ConfigCommand::Path => {
            println!("{}", config_file()?.display());
            Ok(())
        },

        ConfigCommand::Set {
            port,
            language,
            interface,
            pixel_size,
        } => {
            let mut config = load_config(None)?;

            if let Some(port) = port {
                config.controller.port = port;
            }
            if let Some(language) = language {
                config.language = language;
            }
            if let Some(interface) = interface {
                config.interface = parse_interface(&interface)?;
            }
            if let Some(pixel_size) = pixel_size {
                anyhow::ensure!(pixel_size > 0.0, "pixel size must be positive");
                config.pixel_size_m = pixel_size;
            }

            let path = save_config(&config, None)?;
            println!("✅ 配置已写入 {}", path.display());
            Ok(())
        },
    }
}

fn parse_interface(value: &str) -> Result<InterfaceKind> {
    match value {
        "terminal" => Ok(InterfaceKind::Terminal),
        "audio" => Ok(InterfaceKind::Audio),
        other => anyhow::bail!("invalid interface {:?} (expected terminal or audio)", other),
    }
}
