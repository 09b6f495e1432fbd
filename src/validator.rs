//! EDF+ onset validation of the first annotation record.

use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;

use crate::annotations::strip_trailing_nuls;
use crate::error::{EdfError, Result};
use crate::header::FixedHeader;
use crate::layout::locate_annotation_channel;
use crate::reader::EdfReader;
use crate::types::{AnnotationLayout, AnnotationRecord, FileType, SignalHeader};
use crate::utils::read_full;

/// The two accepted encodings of a zero onset at the start of record 1
const ZERO_ONSET_PREFIXES: [&[u8]; 2] = [b"+0.", b"+0\x14"];

/// Result of checking one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub file_type: FileType,
    pub valid: bool,
    /// First annotation record, read only for EDF+ files
    pub first_annotation: Option<AnnotationRecord>,
}

impl CheckOutcome {
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// `true` if the payload starts with `+0.` or `+0\x14`
pub fn has_zero_onset(payload: &[u8]) -> bool {
    let trimmed = strip_trailing_nuls(payload);
    ZERO_ONSET_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix))
}

/// Reads the annotation payload of data record 1
pub fn read_first_annotation<R: Read + Seek>(
    reader: &mut R,
    header: &FixedHeader,
    layout: &AnnotationLayout,
) -> Result<AnnotationRecord> {
    let offset = header
        .header_length_bytes
        .checked_add(layout.annotation_offset_in_record_bytes())
        .ok_or(EdfError::LayoutOverflow)?;
    let length = usize::try_from(layout.annotation_length_bytes())
        .map_err(|_| EdfError::LayoutOverflow)?;

    reader.seek(SeekFrom::Start(offset))?;
    let mut bytes = vec![0u8; length];
    let actual = read_full(reader, &mut bytes)?;
    if actual < length {
        return Err(EdfError::ShortRead { offset, expected: length, actual });
    }

    Ok(AnnotationRecord { record_number: 1, offset, bytes })
}

/// Classifies the file and, for EDF+, checks the first onset
///
/// Plain EDF is always valid and needs no annotation signal. An EDF+ file
/// with a wrong onset yields `valid == false`, not an error.
pub fn validate<R: Read + Seek>(
    reader: &mut R,
    header: &FixedHeader,
    signals: &[SignalHeader],
) -> Result<CheckOutcome> {
    if !header.is_edf_plus() {
        debug!("not EDF+, nothing to check");
        return Ok(CheckOutcome {
            file_type: FileType::Edf,
            valid: true,
            first_annotation: None,
        });
    }

    let layout = locate_annotation_channel(signals)?;
    let first = read_first_annotation(reader, header, &layout)?;
    let valid = has_zero_onset(&first.bytes);
    debug!(
        "first annotation at byte {}: {:?}, valid: {}",
        first.offset,
        String::from_utf8_lossy(first.display_bytes()),
        valid
    );

    Ok(CheckOutcome {
        file_type: FileType::EdfPlus,
        valid,
        first_annotation: Some(first),
    })
}

/// Opens and checks a single file
pub fn check_file<P: AsRef<Path>>(path: P) -> Result<CheckOutcome> {
    EdfReader::open(path)?.check()
}

/// Per-file results of a batch check
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<(PathBuf, Result<CheckOutcome>)>,
}

impl BatchReport {
    /// Files that failed to decode or have an invalid first onset
    pub fn invalid_paths(&self) -> impl Iterator<Item = &Path> + '_ {
        self.results
            .iter()
            .filter(|(_, result)| !matches!(result, Ok(outcome) if outcome.is_valid()))
            .map(|(path, _)| path.as_path())
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid_paths().count()
    }
}

/// Checks each file independently; one bad file never stops the batch
pub fn check_files<I, P>(paths: I) -> BatchReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let results = paths
        .into_iter()
        .map(|path| {
            let path = path.as_ref().to_path_buf();
            let result = check_file(&path);
            if let Err(e) = &result {
                debug!("{}: {}", path.display(), e);
            }
            (path, result)
        })
        .collect();
    BatchReport { results }
}
