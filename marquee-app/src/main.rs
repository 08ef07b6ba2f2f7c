use anyhow::Result;
use marquee_common::MarqueeError;
use marquee_common::observability::{LogConfig, LogFormat, init_logging};
use marquee_config::{LogFormatSetting, MarqueeConfig, MarqueeConfigLoader};
use run::run;
use session::{BrowserSession, ReplaySession};
use tracing::info;

mod run;
mod session;

const CONFIG_FILE: &str = "marquee.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    // 1) Defaults, then marquee.yaml if present, then MARQUEE_* env
    let cfg: MarqueeConfig = MarqueeConfigLoader::new()
        .with_optional_file(CONFIG_FILE)
        .load()
        .map_err(|e| MarqueeError::Config(e.to_string()))?;

    let log_path = init_logging(LogConfig {
        app_name: "marquee",
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr,
        format: match cfg.logging.format {
            LogFormatSetting::Text => LogFormat::Text,
            LogFormatSetting::Json => LogFormat::Json,
        },
        ..LogConfig::default()
    })?;
    info!(log = %log_path.display(), "logging to file");

    let report = match &cfg.replay_snapshot {
        Some(path) => run(ReplaySession::open(path)?, &cfg).await?,
        None => run(BrowserSession::open(&cfg).await?, &cfg).await?,
    };

    info!(
        records = report.records,
        path = %report.csv_path.display(),
        "done"
    );
    Ok(())
}
