use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "multi_doc_extract")]
#[command(about = "从文档和图片中批量提取纯文本")]
pub struct Cli {
    /// TOML 配置文件（环境变量优先）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 输出 debug 级别日志
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// 提取文件或目录中的文本
    Extract {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// gemini / openai / proxy
        #[arg(long)]
        provider: Option<String>,
        /// 压缩包路径，默认 `<output_dir>/extractions.zip`
        #[arg(long)]
        zip: Option<PathBuf>,
        #[arg(long = "no-zip", conflicts_with = "zip")]
        no_zip: bool,
        /// 全文输出位置，`-` 表示标准输出
        #[arg(long = "text-out")]
        text_out: Option<String>,
        /// 以 JSON 打印结果列表
        #[arg(long)]
        json: bool,
    },
    /// 启动提取代理服务
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

impl Cli {
    /// clap 无法表达的参数约束
    ///
    /// `--json` 与 `--text-out -` 都写标准输出，不能同时使用
    pub fn validate(&self) -> Result<(), clap::Error> {
        if let Command::Extract {
            json: true,
            text_out: Some(text_out),
            ..
        } = &self.cmd
        {
            if text_out == "-" {
                return Err(Cli::command().error(
                    ErrorKind::ArgumentConflict,
                    "--json 与 --text-out - 都输出到标准输出，不能同时使用",
                ));
            }
        }
        Ok(())
    }
}
