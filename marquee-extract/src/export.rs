//! Output: the CSV table on success, page snapshots on failure.
use crate::record::{CSV_HEADER, MovieRecord};
use anyhow::{Context, Result};
use marquee_common::MarqueeError;
use std::path::{Path, PathBuf};

/// Write `records` as `Rank,Title,Year,Rating` CSV.
///
/// Rows go to a sibling temp file that replaces `path` only once complete, so
/// a failed write never leaves a partial table behind.
pub fn write_csv(path: &Path, records: &[MovieRecord]) -> Result<()> {
    let tmp = partial_path(path);
    let written = write_rows(&tmp, records).and_then(|()| {
        std::fs::rename(&tmp, path)
            .with_context(|| format!("failed to move table into place at {}", path.display()))
    });
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written
}

fn write_rows(tmp: &Path, records: &[MovieRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(tmp)
        .with_context(|| format!("failed to create {}", tmp.display()))?;

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

/// Why a snapshot was taken; becomes part of the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotNote {
    NoElements,
    Error,
}

impl SnapshotNote {
    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotNote::NoElements => "no_elements",
            SnapshotNote::Error => "error",
        }
    }

    pub fn for_error(err: &MarqueeError) -> Self {
        if err.is_no_rows() {
            SnapshotNote::NoElements
        } else {
            SnapshotNote::Error
        }
    }
}

pub fn snapshot_path(dir: &Path, prefix: &str, note: SnapshotNote) -> PathBuf {
    dir.join(format!("{prefix}_{}.html", note.as_str()))
}

/// Dump page markup to `<dir>/<prefix>_<note>.html` and return the path.
pub fn write_snapshot(dir: &Path, prefix: &str, note: SnapshotNote, markup: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create snapshot directory {}", dir.display()))?;
    let path = snapshot_path(dir, prefix, note);
    std::fs::write(&path, markup)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    fn record(rank: u32, title: &str, year: Option<&str>, rating: Option<&str>) -> MovieRecord {
        MovieRecord {
            rank,
            title: Field::Present(title.into()),
            year: year.map(String::from).into(),
            rating: rating.map(String::from).into(),
        }
    }

    #[test]
    fn csv_has_header_and_sentinels() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("top.csv");
        let records = vec![
            record(1, "The Shawshank Redemption", Some("1994"), Some("9.2")),
            record(2, "Heat, Again", None, None),
        ];

        write_csv(&path, &records).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "Rank,Title,Year,Rating\n\
             1,The Shawshank Redemption,1994,9.2\n\
             2,\"Heat, Again\",N/A,N/A\n"
        );
        assert!(!partial_path(&path).exists());
    }

    #[test]
    fn empty_table_still_has_header() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.csv");
        write_csv(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Rank,Title,Year,Rating\n");
    }

    #[test]
    fn failed_move_leaves_no_table_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("imdb_top_250.csv");
        std::fs::create_dir(&path).unwrap();

        let err = write_csv(&path, &[record(1, "Heat", Some("1995"), Some("8.3"))]).unwrap_err();

        assert!(format!("{err:#}").contains("failed to move table into place"));
        assert!(!partial_path(&path).exists());
        assert!(path.is_dir());
    }

    #[test]
    fn snapshot_name_carries_note() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("snaps");
        let path = write_snapshot(&dir, "imdb_page", SnapshotNote::NoElements, "<html/>").unwrap();
        assert_eq!(path, dir.join("imdb_page_no_elements.html"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<html/>");
    }

    #[test]
    fn note_follows_error_kind() {
        let no_rows = MarqueeError::NoRowsFound { tried: vec![] };
        assert_eq!(SnapshotNote::for_error(&no_rows), SnapshotNote::NoElements);
        let other = MarqueeError::Output("disk full".into());
        assert_eq!(SnapshotNote::for_error(&other), SnapshotNote::Error);
    }
}
