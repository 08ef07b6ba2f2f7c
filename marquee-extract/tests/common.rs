use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use marquee_common::observability::{LogConfig, LogFormat};
use marquee_extract::document::StaticDocument;

static INIT_PATH: OnceLock<PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "marquee-tests",
            log_dir: Some(std::env::temp_dir().join("marquee-tests")),
            emit_stderr: true,
            format: if std::env::var("MARQUEE_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug",
        };

        marquee_common::observability::init_logging(config).unwrap_or_default()
    });
}

pub fn fixture(name: &str) -> StaticDocument {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    StaticDocument::from_path(&path).expect("fixture exists")
}
