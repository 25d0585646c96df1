//! RTTM reader and writer.
//!
//! Each RTTM line has whitespace-separated fields:
//! `TYPE FILE CHANNEL ONSET DURATION ORTHO SUBTYPE SPEAKER CONFIDENCE SLAT`.
//! Only TYPE, FILE, ONSET, DURATION and SPEAKER are used.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::{Annotation, Segment};
use crate::error::{EditorError, Result};

pub const DEFAULT_RTTM_TYPE: &str = "SPEAKER";

const MIN_FIELDS: usize = 8;

/// Read RTTM lines of type `keep_type`, grouped by file id.
///
/// Track ids are `<file>_<line number>`, unique within each annotation.
pub fn load_rttm<R: BufRead>(reader: R, keep_type: &str) -> Result<BTreeMap<String, Annotation>> {
    let mut annotations: BTreeMap<String, Annotation> = BTreeMap::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < MIN_FIELDS {
            return Err(EditorError::Rttm {
                line: line_number,
                reason: format!("expected at least {} fields, found {}", MIN_FIELDS, fields.len()),
            });
        }
        if fields[0] != keep_type {
            continue;
        }

        let file_id = fields[1];
        let onset = parse_seconds(fields[3], "onset", line_number)?;
        let duration = parse_seconds(fields[4], "duration", line_number)?;
        if onset < 0.0 || duration < 0.0 {
            return Err(EditorError::Rttm {
                line: line_number,
                reason: format!("negative onset or duration ({onset}, {duration})"),
            });
        }

        let annotation = annotations
            .entry(file_id.to_string())
            .or_insert_with(|| Annotation::new(Some(file_id.to_string())));
        annotation.push(
            Segment::new(onset, onset + duration),
            format!("{}_{:06}", file_id, line_number),
            fields[7],
        );
    }

    Ok(annotations)
}

/// Read an RTTM file from disk.
pub fn load_rttm_file(path: &Path, keep_type: &str) -> Result<BTreeMap<String, Annotation>> {
    let file = File::open(path)?;
    let annotations = load_rttm(BufReader::new(file), keep_type)?;
    tracing::info!(
        path = %path.display(),
        files = annotations.len(),
        "loaded RTTM"
    );
    Ok(annotations)
}

/// Write an annotation as `SPEAKER` lines. Whitespace in the uri or labels
/// is replaced with underscores so fields stay aligned.
pub fn write_rttm<W: Write>(annotation: &Annotation, mut writer: W) -> Result<()> {
    let uri = annotation
        .uri
        .as_deref()
        .map(sanitize_field)
        .unwrap_or_else(|| "<NA>".to_string());

    for track in &annotation.tracks {
        writeln!(
            writer,
            "{} {} 1 {:.3} {:.3} <NA> <NA> {} <NA> <NA>",
            DEFAULT_RTTM_TYPE,
            uri,
            track.segment.start,
            track.segment.duration(),
            sanitize_field(&track.label),
        )?;
    }
    Ok(())
}

fn parse_seconds(field: &str, name: &str, line: usize) -> Result<f64> {
    field
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| EditorError::Rttm {
            line,
            reason: format!("invalid {name} '{field}'"),
        })
}

fn sanitize_field(value: &str) -> String {
    if value.is_empty() {
        return "<NA>".to_string();
    }
    value
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SPEAKER meeting 1 0.50 1.25 <NA> <NA> alice <NA> <NA>
SPEAKER meeting 1 1.00 2.00 <NA> <NA> bob <NA> <NA>
LEXEME meeting 1 1.00 0.20 hello <NA> bob <NA> <NA>

SPEAKER call 1 3.00 0.50 <NA> <NA> carol <NA> <NA>
";

    #[test]
    fn test_load_groups_by_file() {
        let annotations = load_rttm(SAMPLE.as_bytes(), DEFAULT_RTTM_TYPE).unwrap();
        assert_eq!(annotations.len(), 2);

        let meeting = &annotations["meeting"];
        assert_eq!(meeting.uri.as_deref(), Some("meeting"));
        assert_eq!(meeting.len(), 2);
        assert_eq!(meeting.tracks[0].segment, Segment::new(0.5, 1.75));
        assert_eq!(meeting.tracks[1].label, "bob");
        assert!(meeting.has_unique_tracks());
        assert_eq!(annotations["call"].tracks[0].label, "carol");
    }

    #[test]
    fn test_keep_type_filters_lines() {
        let annotations = load_rttm(SAMPLE.as_bytes(), "LEXEME").unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations["meeting"].len(), 1);
    }

    #[test]
    fn test_malformed_lines_report_line_number() {
        let result = load_rttm("SPEAKER f 1 abc 1.0 <NA> <NA> x\n".as_bytes(), DEFAULT_RTTM_TYPE);
        assert!(matches!(result, Err(EditorError::Rttm { line: 1, .. })));

        let result = load_rttm("\nSPEAKER f 1\n".as_bytes(), DEFAULT_RTTM_TYPE);
        assert!(matches!(result, Err(EditorError::Rttm { line: 2, .. })));

        let result = load_rttm("SPEAKER f 1 1.0 -2 <NA> <NA> x\n".as_bytes(), DEFAULT_RTTM_TYPE);
        assert!(matches!(result, Err(EditorError::Rttm { .. })));
    }

    #[test]
    fn test_write_then_read() {
        let mut annotation = Annotation::new(Some("my file".to_string()));
        annotation.push(Segment::new(1.0, 2.5), "t", "speaker one");

        let mut out = Vec::new();
        write_rttm(&annotation, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "SPEAKER my_file 1 1.000 1.500 <NA> <NA> speaker_one <NA> <NA>\n"
        );

        let parsed = load_rttm(text.as_bytes(), DEFAULT_RTTM_TYPE).unwrap();
        assert_eq!(parsed["my_file"].tracks[0].label, "speaker_one");
    }
}
