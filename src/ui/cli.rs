use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tabradio", version, about = "分标签页的网络电台播放器")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// 覆盖数据目录（默认走系统 data_local_dir）
    #[arg(long, env = "TABRADIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// 覆盖日志目录（默认 `{data_dir}/logs`）
    #[arg(long, env = "TABRADIO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// 覆盖日志过滤（等价于设置 RUST_LOG）
    #[arg(long, env = "RUST_LOG")]
    pub log_filter: Option<String>,

    /// 覆盖电台目录地址（settings.json 中的 catalog_url）
    #[arg(long, env = "TABRADIO_CATALOG_URL")]
    pub catalog_url: Option<String>,

    /// 不连接电台流，播放立即视为成功
    #[arg(long, env = "TABRADIO_NO_AUDIO")]
    pub no_audio: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 交互式命令行（默认）
    Run,

    /// 拉取并打印电台目录
    Stations {
        #[arg(long)]
        tab: Option<String>,
    },

    /// 在电台目录中搜索
    Search {
        name: String,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        tag: Option<String>,
    },

    /// 把保存的状态导出为 JSON 快照
    Export { path: PathBuf },

    /// 从 JSON 快照导入到保存的状态
    Import { path: PathBuf },
}
