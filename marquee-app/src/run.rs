use crate::session::ScrapeSession;
use futures::FutureExt;
use marquee_common::MarqueeError;
use marquee_config::MarqueeConfig;
use marquee_extract::Extractor;
use marquee_extract::RowSource;
use marquee_extract::export::{SnapshotNote, write_csv, write_snapshot};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct RunReport {
    pub records: usize,
    pub csv_path: PathBuf,
}

/// Scrape once and always close the session, whatever happened.
///
/// Fatal errors (including a panic while scraping) get a best-effort page
/// snapshot and are returned only after teardown.
pub async fn run<S: ScrapeSession>(
    mut session: S,
    cfg: &MarqueeConfig,
) -> Result<RunReport, MarqueeError> {
    let outcome = AssertUnwindSafe(scrape(&mut session, cfg))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(MarqueeError::Panicked(panic_message(payload.as_ref()))));

    if let Err(err) = &outcome {
        error!(error = ?err, "could not load movie data");
        save_snapshot(session.page(), cfg, SnapshotNote::for_error(err)).await;
    }

    if let Err(err) = session.close().await {
        warn!(error = %err, "session teardown failed");
    }
    outcome
}

async fn scrape<S: ScrapeSession>(
    session: &mut S,
    cfg: &MarqueeConfig,
) -> Result<RunReport, MarqueeError> {
    info!(url = %cfg.chart.url, "loading chart page");
    session.navigate(&cfg.chart.url).await?;

    let settle = cfg.settle_delay();
    if !settle.is_zero() {
        sleep(settle).await;
    }

    let records = Extractor::new(cfg.row_wait())
        .extract(session.page())
        .await?;

    let csv_path = cfg.output.csv_path.clone();
    write_csv(&csv_path, &records).map_err(|e| MarqueeError::Output(format!("{e:#}")))?;
    info!(
        records = records.len(),
        path = %csv_path.display(),
        "scraping complete"
    );

    Ok(RunReport {
        records: records.len(),
        csv_path,
    })
}

async fn save_snapshot(
    page: &dyn RowSource,
    cfg: &MarqueeConfig,
    note: SnapshotNote,
) -> Option<PathBuf> {
    let markup = match page.markup().await {
        Ok(markup) => markup,
        Err(err) => {
            warn!(error = %err, "page source unavailable; no snapshot taken");
            return None;
        }
    };

    match write_snapshot(
        &cfg.output.snapshot_dir,
        &cfg.output.snapshot_prefix,
        note,
        &markup,
    ) {
        Ok(path) => {
            info!(path = %path.display(), "saved page source for inspection");
            Some(path)
        }
        Err(err) => {
            warn!(error = %err, "failed to save page source");
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use marquee_extract::document::StaticDocument;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const LIST_PAGE: &str = r#"<html><body><ul>
        <li class="ipc-metadata-list-summary-item">
          <h3 class="ipc-title__text">1. The Godfather</h3>
          <span class="cli-title-metadata-item">1972</span>
          <span class="ipc-rating-star--rating">9.2</span>
        </li>
        <li class="ipc-metadata-list-summary-item">
          <h3 class="ipc-title__text">2. Casablanca</h3>
          <div>Drama 1h 42m 1942</div>
        </li>
    </ul></body></html>"#;

    const BLANK_PAGE: &str = "<html><body><p>Access denied</p></body></html>";

    #[derive(Clone, Copy, PartialEq)]
    enum Navigation {
        Ok,
        Fail,
        Panic,
    }

    struct FakeSession {
        doc: StaticDocument,
        navigation: Navigation,
        closes: Arc<AtomicUsize>,
    }

    impl FakeSession {
        fn new(markup: &str, navigation: Navigation) -> (Self, Arc<AtomicUsize>) {
            let closes = Arc::new(AtomicUsize::new(0));
            let session = Self {
                doc: StaticDocument::new(markup),
                navigation,
                closes: closes.clone(),
            };
            (session, closes)
        }
    }

    #[async_trait]
    impl ScrapeSession for FakeSession {
        async fn navigate(&mut self, _url: &str) -> anyhow::Result<()> {
            match self.navigation {
                Navigation::Ok => Ok(()),
                Navigation::Fail => bail!("net::ERR_NAME_NOT_RESOLVED"),
                Navigation::Panic => panic!("renderer crashed"),
            }
        }

        fn page(&self) -> &dyn RowSource {
            &self.doc
        }

        async fn close(self) -> anyhow::Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn test_config(tmp: &TempDir) -> MarqueeConfig {
        let mut cfg = MarqueeConfig::default();
        cfg.chart.settle_delay_ms = 0;
        cfg.chart.row_wait_secs = 1;
        cfg.browser.headless = true;
        cfg.output.csv_path = tmp.path().join("imdb_top_250.csv");
        cfg.output.snapshot_dir = tmp.path().join("snapshots");
        cfg
    }

    fn snapshot(cfg: &MarqueeConfig, note: &str) -> PathBuf {
        cfg.output
            .snapshot_dir
            .join(format!("{}_{note}.html", cfg.output.snapshot_prefix))
    }

    #[tokio::test]
    async fn success_writes_table_and_closes_once() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let (session, closes) = FakeSession::new(LIST_PAGE, Navigation::Ok);

        let report = run(session, &cfg).await.unwrap();

        assert_eq!(report.records, 2);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        let csv = std::fs::read_to_string(&cfg.output.csv_path).unwrap();
        assert_eq!(
            csv,
            "Rank,Title,Year,Rating\n1,The Godfather,1972,9.2\n2,Casablanca,1942,N/A\n"
        );
        assert!(!cfg.output.snapshot_dir.exists());
    }

    #[tokio::test]
    async fn no_rows_snapshots_and_skips_table() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let (session, closes) = FakeSession::new(BLANK_PAGE, Navigation::Ok);

        let err = run(session, &cfg).await.unwrap_err();

        assert!(err.is_no_rows());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!cfg.output.csv_path.exists());
        let saved = std::fs::read_to_string(snapshot(&cfg, "no_elements")).unwrap();
        assert!(saved.contains("Access denied"));
        assert!(!snapshot(&cfg, "error").exists());
    }

    #[tokio::test]
    async fn navigation_failure_snapshots_error() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let (session, closes) = FakeSession::new(LIST_PAGE, Navigation::Fail);

        let err = run(session, &cfg).await.unwrap_err();

        assert!(matches!(err, MarqueeError::Driver(_)));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(snapshot(&cfg, "error").exists());
        assert!(!cfg.output.csv_path.exists());
    }

    #[tokio::test]
    async fn panic_still_tears_down() {
        let tmp = TempDir::new().unwrap();
        let cfg = test_config(&tmp);
        let (session, closes) = FakeSession::new(LIST_PAGE, Navigation::Panic);

        let err = run(session, &cfg).await.unwrap_err();

        match err {
            MarqueeError::Panicked(msg) => assert_eq!(msg, "renderer crashed"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!cfg.output.csv_path.exists());
    }
}
