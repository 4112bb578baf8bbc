mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use multi_doc_extract::models::ExtractionResult;
use multi_doc_extract::utils::logging;
use multi_doc_extract::{server, App, Config, ExportOptions, TextOutput};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        e.exit();
    }

    // 加载配置
    let mut config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    if cli.verbose {
        config.verbose_logging = true;
    }

    // 初始化日志
    logging::init(config.verbose_logging);

    match cli.cmd {
        Command::Extract {
            paths,
            provider,
            zip,
            no_zip,
            text_out,
            json,
        } => {
            if let Some(provider) = provider {
                config.provider = provider;
            }

            let options = ExportOptions {
                zip_path: zip,
                skip_zip: no_zip,
                text_output: text_out.as_deref().map(TextOutput::parse),
            };

            let app = App::initialize(config)?;
            let results = app.run(&paths, &options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_summary(&results);
            }
        }
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            server::serve(&config).await?;
        }
    }

    Ok(())
}

/// 每个文件一行：✔ 成功 / ✘ 失败原因
fn print_summary(results: &[ExtractionResult]) {
    for result in results {
        match (&result.text, &result.error) {
            (Some(text), _) => {
                eprintln!("✔ {} ({} 个字符)", result.file_name, text.chars().count())
            }
            (None, Some(error)) => eprintln!("✘ {}: {}", result.file_name, error),
            (None, None) => eprintln!("✘ {}", result.file_name),
        }
    }
}
