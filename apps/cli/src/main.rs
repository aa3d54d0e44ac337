//! # Cobot CLI
//!
//! 语言引导抓放操作台。
//!
//! ## 交互会话
//!
//! ```bash
//! # 真实串口设备
//! cobot-cli run
//!
//! # 无硬件演练（Mock 设备 + 文件检测 + 终端转发模型）
//! cobot-cli run --mock --detections detections.json
//! ```
//!
//! ## 单次命令
//!
//! ```bash
//! cobot-cli once --mock --detections detections.json "pick up object 2"
//! ```
//!
//! ## 标定
//!
//! ```bash
//! # 在拍摄位姿下用直尺两点标定像素尺寸
//! cobot-cli calibrate
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod adapters;
mod calibrate;
mod commands;
mod session;

use commands::ConfigCommand;

/// Cobot CLI - 语言引导机械臂操作台
#[derive(Parser, Debug)]
#[command(name = "cobot-cli")]
#[command(about = "Command-line interface for the language-guided cobot operator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 启动交互会话
    Run {
        /// 使用 Mock 设备（无硬件）
        #[arg(long)]
        mock: bool,

        /// 检测列表 JSON 文件（文件感知适配器）
        #[arg(long)]
        detections: Option<String>,

        /// 配置文件路径（默认用户配置目录）
        #[arg(long)]
        config: Option<String>,
    },

    /// 执行单个命令周期
    Once {
        /// 操作员指令文本
        text: String,

        /// 使用 Mock 设备（无硬件）
        #[arg(long)]
        mock: bool,

        /// 检测列表 JSON 文件（文件感知适配器）
        #[arg(long)]
        detections: Option<String>,

        /// 配置文件路径（默认用户配置目录）
        #[arg(long)]
        config: Option<String>,
    },

    /// 两点像素尺寸标定
    Calibrate {
        /// 使用 Mock 设备（无硬件）
        #[arg(long)]
        mock: bool,

        /// 配置文件路径（默认用户配置目录）
        #[arg(long)]
        config: Option<String>,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            mock,
            detections,
            config,
        } => session::run_session(mock, detections.as_deref(), config.as_deref()),

        Commands::Once {
            text,
            mock,
            detections,
            config,
        } => session::run_once(&text, mock, detections.as_deref(), config.as_deref()),

        Commands::Calibrate { mock, config } => calibrate::run(mock, config.as_deref()),

        Commands::Config(cmd) => commands::config::execute(cmd),
    }
}
