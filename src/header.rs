//! Fixed 256-byte EDF/EDF+ preamble.

use std::io::Read;
use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;

use crate::error::{EdfError, Result};
use crate::utils::{parse_positive_int, read_full, ParseWarning};
use crate::{EDF_PLUS_MARKER, FIXED_HEADER_SIZE, MAX_SIGNALS};

/// A named byte range of the fixed header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedField {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
}

impl FixedField {
    const fn new(name: &'static str, offset: usize, len: usize) -> Self {
        FixedField { name, offset, len }
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

pub const VERSION: FixedField = FixedField::new("Version", 0, 8);
pub const PATIENT_INFO: FixedField = FixedField::new("Patient info", 8, 80);
pub const RECORDING_INFO: FixedField = FixedField::new("Recording info", 88, 80);
pub const START_DATE: FixedField = FixedField::new("Start date", 168, 8);
pub const START_TIME: FixedField = FixedField::new("Start time", 176, 8);
pub const HEADER_LENGTH: FixedField = FixedField::new("Header size (bytes)", 184, 8);
pub const RESERVED: FixedField = FixedField::new("Reserved", 192, 44);
pub const DATA_RECORD_COUNT: FixedField = FixedField::new("Number of data records", 236, 8);
pub const RECORD_DURATION: FixedField = FixedField::new("Data record duration (s)", 244, 8);
pub const SIGNAL_COUNT: FixedField = FixedField::new("Number of signals", 252, 4);

/// Fixed header fields in on-disk order
pub const FIXED_FIELDS: [FixedField; 10] = [
    VERSION,
    PATIENT_INFO,
    RECORDING_INFO,
    START_DATE,
    START_TIME,
    HEADER_LENGTH,
    RESERVED,
    DATA_RECORD_COUNT,
    RECORD_DURATION,
    SIGNAL_COUNT,
];

/// Decoded fixed header
///
/// Text fields stay as raw bytes; only the three counts that drive offset
/// arithmetic are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedHeader {
    raw: [u8; FIXED_HEADER_SIZE],
    /// Fixed header plus signal header block, in bytes
    pub header_length_bytes: u64,
    pub data_record_count: u64,
    pub signal_count: usize,
    /// Number fields that were only partially numeric
    pub warnings: Vec<ParseWarning>,
}

impl FixedHeader {
    /// Decodes the fixed header from the first 256 bytes of `raw`
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < FIXED_HEADER_SIZE {
            return Err(EdfError::HeaderTooShort {
                expected: FIXED_HEADER_SIZE,
                actual: raw.len(),
            });
        }

        let mut bytes = [0u8; FIXED_HEADER_SIZE];
        bytes.copy_from_slice(&raw[..FIXED_HEADER_SIZE]);

        let mut warnings = Vec::new();
        let mut number = |field: FixedField, desc: &'static str| -> Result<u64> {
            let parsed = parse_positive_int(&bytes[field.range()], desc)?;
            if let Some(warning) = parsed.warning {
                debug!("{}", warning);
                warnings.push(warning);
            }
            Ok(parsed.value)
        };

        let header_length_bytes = number(HEADER_LENGTH, "header size")?;
        let data_record_count = number(DATA_RECORD_COUNT, "number of data records")?;
        let signal_count = number(SIGNAL_COUNT, "number of signals")?;

        if header_length_bytes < FIXED_HEADER_SIZE as u64 {
            return Err(EdfError::HeaderLengthTooSmall(header_length_bytes));
        }
        if signal_count > MAX_SIGNALS as u64 {
            return Err(EdfError::InvalidSignalCount(signal_count));
        }

        Ok(FixedHeader {
            raw: bytes,
            header_length_bytes,
            data_record_count,
            signal_count: signal_count as usize,
            warnings,
        })
    }

    /// Reads and decodes the fixed header from the start of a stream
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; FIXED_HEADER_SIZE];
        let n = read_full(reader, &mut buf)?;
        if n < FIXED_HEADER_SIZE {
            return Err(EdfError::HeaderTooShort {
                expected: FIXED_HEADER_SIZE,
                actual: n,
            });
        }
        Self::decode(&buf)
    }

    /// Raw bytes of one fixed field
    pub fn field(&self, field: FixedField) -> &[u8] {
        &self.raw[field.range()]
    }

    pub fn version(&self) -> &[u8] {
        self.field(VERSION)
    }

    pub fn patient_info(&self) -> &[u8] {
        self.field(PATIENT_INFO)
    }

    pub fn recording_info(&self) -> &[u8] {
        self.field(RECORDING_INFO)
    }

    pub fn start_date(&self) -> &[u8] {
        self.field(START_DATE)
    }

    pub fn start_time(&self) -> &[u8] {
        self.field(START_TIME)
    }

    pub fn reserved(&self) -> &[u8] {
        self.field(RESERVED)
    }

    pub fn record_duration(&self) -> &[u8] {
        self.field(RECORD_DURATION)
    }

    /// `true` when the reserved field starts with `EDF+`
    pub fn is_edf_plus(&self) -> bool {
        self.reserved().starts_with(EDF_PLUS_MARKER)
    }

    /// Length of the signal header block that follows the fixed header
    pub fn signal_block_len(&self) -> u64 {
        self.header_length_bytes - FIXED_HEADER_SIZE as u64
    }

    /// Recording start from the `dd.mm.yy` / `hh.mm.ss` fields
    ///
    /// Years use the EDF clipping rule: 85-99 map to 19xx, 00-84 to 20xx.
    /// Returns `None` if either field does not hold a valid date or time.
    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        let [day, month, yy] = dotted_triple(self.start_date())?;
        let [hour, minute, second] = dotted_triple(self.start_time())?;

        let year = if yy > 84 { 1900 + yy } else { 2000 + yy };
        let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(NaiveDateTime::new(date, time))
    }
}

// 解析 "dd.mm.yy" / "hh.mm.ss"
fn dotted_triple(raw: &[u8]) -> Option<[u32; 3]> {
    let s = std::str::from_utf8(raw).ok()?.trim();
    let mut parts = s.split('.');
    let mut out = [0u32; 3];
    for slot in out.iter_mut() {
        let part = parts.next()?;
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}
