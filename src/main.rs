use anyhow::Result;
use board_sync::bootstrap::bootstrap;
use board_sync::cli::{clean_input, usage, Cli};
use board_sync::config::{program_name, Config};
use board_sync::constants::{EXIT_FAILURE, EXIT_NOTHING_TO_DO, EXIT_OK};
use board_sync::device::WebWorkflowDevice;
use board_sync::logger::init_logger;
use board_sync::types::SyncOutcome;
use clap::error::ErrorKind;
use clap::Parser;
use dotenv::dotenv;
use log::error;
use std::env;
use std::path::Path;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载环境变量
    dotenv().ok();

    let argv0 = env::args().next();
    let self_name = program_name(argv0.as_deref());

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            print!("{}", usage(&self_name));
            std::process::exit(EXIT_FAILURE);
        }
    };

    init_logger()?;

    let mut config = match Config::new(
        clean_input(&cli.hostname),
        clean_input(&cli.password),
        self_name,
        cli.exact_mtime,
    ) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let device = WebWorkflowDevice::new()?;
    let code = match bootstrap(&mut config, &device, Path::new(".")).await {
        Ok(SyncOutcome::UpToDate) => EXIT_NOTHING_TO_DO,
        Ok(SyncOutcome::Completed { .. }) => EXIT_OK,
        Err(e) => {
            error!("{}", e);
            EXIT_FAILURE
        }
    };

    std::process::exit(code);
}
