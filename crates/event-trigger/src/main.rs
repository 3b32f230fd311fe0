//! Event Trigger CLI
//!
//! 触发工具的命令行入口点。

use anyhow::Context;
use clap::Parser;
use event_trigger::cli::{Cli, CommandRunner, Commands};
use trigger_shared::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本地开发时从 .env 读取 TRIGGER_API__API_KEY 等变量，文件不存在时忽略
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let runner = CommandRunner::from_cli(&cli)?;

    observability::init(&runner.config().observability).context("初始化日志失败")?;

    match cli.command {
        Commands::Trigger { event, file } => {
            runner
                .run_trigger(event.as_deref(), file.as_deref())
                .await?;
        }
        Commands::List => runner.run_list(),
        Commands::Describe { event, export } => runner.run_describe(&event, export)?,
        Commands::Resend { event_id } => runner.run_resend(&event_id).await?,
        Commands::Webhooks { event } => runner.run_webhooks(event.as_deref()).await?,
    }

    Ok(())
}
