// src/main.rs

use ecsrun::report::InvocationReport;
use ecsrun::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(report) if report.is_failure() => {
            let reason = report.message.as_deref().unwrap_or("task failed");
            match &report.console_url {
                Some(url) => eprintln!("ecsrun: {reason} (see {url})"),
                None => eprintln!("ecsrun: {reason}"),
            }
            std::process::exit(1);
        }
        Ok(_) => {}
        Err(err) => {
            eprintln!("ecsrun error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<InvocationReport> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
