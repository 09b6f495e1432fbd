//! Extraction of raw annotation channel bytes from data records.

use std::io::{Read, Seek, SeekFrom};
use std::iter::FusedIterator;

use log::trace;

use crate::error::{EdfError, Result};
use crate::header::FixedHeader;
use crate::types::{AnnotationLayout, AnnotationRecord};
use crate::utils::read_full;

/// Checks that `[first, last]` is a non-empty range inside `[1, record_count]`
pub fn check_record_range(first: u64, last: u64, record_count: u64) -> Result<()> {
    if first > last {
        return Err(EdfError::RecordRangeInverted { first, last, record_count });
    }
    if first == 0 || last > record_count {
        return Err(EdfError::RecordOutOfRange { first, last, record_count });
    }
    Ok(())
}

/// Removes trailing NUL padding for display
///
/// A trailing `0x00` is dropped only while the last two bytes are both
/// `0x00`, so the final NUL of the padding run is kept. The input is never
/// modified.
///
/// ```rust
/// use edf_annotations::annotations::strip_trailing_nuls;
///
/// assert_eq!(strip_trailing_nuls(b"+0\x14\x14\x00\x00\x00"), b"+0\x14\x14\x00");
/// assert_eq!(strip_trailing_nuls(b"+0\x14\x14\x00"), b"+0\x14\x14\x00");
/// ```
pub fn strip_trailing_nuls(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end >= 2 && bytes[end - 2] == 0 && bytes[end - 1] == 0 {
        end -= 1;
    }
    &bytes[..end]
}

/// Lazy, forward-only reader of annotation payloads for a record range
///
/// Created positioned at the annotation block of the first requested record.
/// Each step reads one payload and then skips the non-annotation samples up to
/// the next record's annotation block. After an error the iterator is
/// exhausted.
pub struct AnnotationExtractor<R> {
    reader: R,
    next_record: u64,
    last_record: u64,
    offset: u64,
    length: usize,
    bytes_per_record: u64,
    skip: i64,
    started: bool,
    done: bool,
}

impl<R: Read + Seek> AnnotationExtractor<R> {
    /// Validates the range and seeks to the first annotation block
    ///
    /// Offsets are absolute: the data region starts right after
    /// `header.header_length_bytes`.
    pub fn new(
        mut reader: R,
        header: &FixedHeader,
        layout: &AnnotationLayout,
        first: u64,
        last: u64,
    ) -> Result<Self> {
        check_record_range(first, last, header.data_record_count)?;

        let bytes_per_record = layout.bytes_per_record();
        let length_bytes = layout.annotation_length_bytes();
        let record_offset = |record: u64| -> Option<u64> {
            (record - 1)
                .checked_mul(bytes_per_record)?
                .checked_add(header.header_length_bytes)?
                .checked_add(layout.annotation_offset_in_record_bytes())
        };

        let offset = record_offset(first).ok_or(EdfError::LayoutOverflow)?;
        record_offset(last)
            .and_then(|o| o.checked_add(length_bytes))
            .ok_or(EdfError::LayoutOverflow)?;
        let length = usize::try_from(length_bytes).map_err(|_| EdfError::LayoutOverflow)?;
        let skip = i64::try_from(bytes_per_record - length_bytes)
            .map_err(|_| EdfError::LayoutOverflow)?;

        reader.seek(SeekFrom::Start(offset))?;

        Ok(AnnotationExtractor {
            reader,
            next_record: first,
            last_record: last,
            offset,
            length,
            bytes_per_record,
            skip,
            started: false,
            done: false,
        })
    }

    fn read_next(&mut self) -> Result<AnnotationRecord> {
        if self.started {
            self.reader.seek(SeekFrom::Current(self.skip))?;
            self.offset += self.bytes_per_record;
        }
        self.started = true;

        let mut bytes = vec![0u8; self.length];
        let actual = read_full(&mut self.reader, &mut bytes)?;
        if actual < self.length {
            return Err(EdfError::ShortRead {
                offset: self.offset,
                expected: self.length,
                actual,
            });
        }

        trace!("record {} annotation at byte {}", self.next_record, self.offset);
        Ok(AnnotationRecord {
            record_number: self.next_record,
            offset: self.offset,
            bytes,
        })
    }
}

impl<R: Read + Seek> Iterator for AnnotationExtractor<R> {
    type Item = Result<AnnotationRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next_record > self.last_record {
            return None;
        }

        let item = self.read_next();
        match item {
            Ok(_) => self.next_record += 1,
            Err(_) => self.done = true,
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done || self.next_record > self.last_record {
            return (0, Some(0));
        }
        let remaining = usize::try_from(self.last_record - self.next_record + 1).ok();
        (0, remaining)
    }
}

impl<R: Read + Seek> FusedIterator for AnnotationExtractor<R> {}
