//! Entry point: run one scheduled monitoring job per invocation.
//!
//! The scheduler invokes this binary with the job name as the first
//! argument; the process exit code mirrors the job outcome.

use std::process::ExitCode;

use poolwatch::jobs::{self, Job};
use poolwatch::monitor::fetch::{Fetcher, HTTP_TIMEOUT};
use poolwatch::monitor::sink::CloudWatchSink;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let job: Job = match std::env::args().nth(1) {
        Some(name) => match name.parse() {
            Ok(job) => job,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            error!("usage: poolwatch <{}>", Job::NAMES.join("|"));
            return ExitCode::FAILURE;
        }
    };

    let client = match reqwest::Client::builder().timeout(HTTP_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            error!("failed to build http client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let fetcher = Fetcher::new(client);

    let region = std::env::var("REGION_NAME").ok();
    let sink = CloudWatchSink::from_env(region).await;

    info!("Starting poolwatch job {job:?}");
    let outcome = jobs::run(job, &fetcher, &sink).await;
    info!(status = outcome.status_code, "{}", outcome.body);

    if outcome.status_code == 200 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
