use sentiment_core::{CoreError, ExportError, LabeledComment, SentimentLabel};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXPORT_FILE_NAME: &str = "youtube_sentiment_results.csv";

const HEADER: [&str; 3] = ["Comment", "Label", "Score"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Comment")]
    pub comment: String,
    #[serde(rename = "Label")]
    pub label: SentimentLabel,
    #[serde(rename = "Score")]
    pub score: f32,
}

impl From<&LabeledComment> for ExportRow {
    fn from(comment: &LabeledComment) -> Self {
        Self {
            comment: comment.text.clone(),
            label: comment.label,
            score: comment.score,
        }
    }
}

/// Writes the header and one row per comment, in run order.
pub fn write_csv<W: Write>(comments: &[LabeledComment], writer: W) -> Result<(), ExportError> {
    let serialization = |e: csv::Error| ExportError::Serialization {
        reason: e.to_string(),
    };

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER).map_err(serialization)?;
    for comment in comments {
        csv_writer
            .serialize(ExportRow::from(comment))
            .map_err(serialization)?;
    }
    csv_writer.flush().map_err(|e| ExportError::Serialization {
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Writes `<dir>/youtube_sentiment_results.csv`, replacing any previous export.
pub fn export_to_dir(comments: &[LabeledComment], dir: &Path) -> Result<PathBuf, CoreError> {
    let path = dir.join(EXPORT_FILE_NAME);
    let write_failed = |e: std::io::Error| ExportError::WriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    std::fs::create_dir_all(dir).map_err(write_failed)?;
    let file = File::create(&path).map_err(write_failed)?;
    write_csv(comments, file)?;

    info!("Exported {} rows to {}", comments.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<LabeledComment> {
        vec![
            LabeledComment {
                text: "great video".to_string(),
                label: SentimentLabel::Positive,
                score: 0.95,
            },
            LabeledComment {
                text: "terrible, just \"terrible\"".to_string(),
                label: SentimentLabel::Negative,
                score: 0.88,
            },
        ]
    }

    #[test]
    fn test_header_and_rows() {
        let mut buffer = Vec::new();
        write_csv(&rows(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Comment,Label,Score"));
        assert_eq!(lines.next(), Some("great video,Positive,0.95"));
        assert_eq!(lines.next(), Some("\"terrible, just \"\"terrible\"\"\",Negative,0.88"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_rows_read_back_in_order() {
        let mut buffer = Vec::new();
        write_csv(&rows(), &mut buffer).unwrap();

        let mut reader = csv::Reader::from_reader(buffer.as_slice());
        let parsed: Vec<ExportRow> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        let expected: Vec<ExportRow> = rows().iter().map(ExportRow::from).collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_export_to_dir_overwrites() {
        let dir = tempfile::tempdir().unwrap();

        let first = export_to_dir(&rows(), dir.path()).unwrap();
        let second = export_to_dir(&rows()[..1], dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.file_name().unwrap(), EXPORT_FILE_NAME);

        let contents = std::fs::read_to_string(second).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("today");
        let path = export_to_dir(&rows(), &nested).unwrap();
        assert!(path.exists());
    }
}
