//! Structured header listing, one entry per fixed field and per signal field.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{EdfError, Result};
use crate::header::{self, FixedField, FixedHeader, FIXED_FIELDS};
use crate::signal::{Column, SignalHeaderBlock};
use crate::utils::{parse_count, trim_field, ParseWarning};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Number(u64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry {
    pub name: &'static str,
    /// Signal index for signal header fields, `None` for fixed fields
    pub signal: Option<usize>,
    pub raw: Vec<u8>,
    /// `None` when the field could not be decoded
    pub value: Option<FieldValue>,
}

/// Every header field of a file in on-disk order
///
/// Fixed fields come first, then the signal fields column by column. Signal
/// fields are listed even when they would not decode, so damaged headers can
/// still be inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDump {
    pub fixed: Vec<DumpEntry>,
    pub signals: Vec<DumpEntry>,
    pub start_datetime: Option<NaiveDateTime>,
    pub warnings: Vec<ParseWarning>,
}

impl HeaderDump {
    pub fn new(header: &FixedHeader, block: &SignalHeaderBlock) -> Self {
        let fixed = FIXED_FIELDS
            .iter()
            .map(|&field| DumpEntry {
                name: field.name,
                signal: None,
                raw: header.field(field).to_vec(),
                value: Some(fixed_value(header, field)),
            })
            .collect();

        let mut signals = Vec::with_capacity(block.signal_count() * Column::ALL.len());
        for column in Column::ALL {
            for i in 0..block.signal_count() {
                let raw = block.field(column, i);
                let value = match column {
                    Column::SamplesPerRecord => parse_count(raw).map(FieldValue::Number),
                    _ => Some(FieldValue::Text(trim_field(raw))),
                };
                signals.push(DumpEntry {
                    name: column.name(),
                    signal: Some(i),
                    raw: raw.to_vec(),
                    value,
                });
            }
        }

        HeaderDump {
            fixed,
            signals,
            start_datetime: header.start_datetime(),
            warnings: header.warnings.clone(),
        }
    }

    /// Reads the fixed header and signal block from the start of a stream
    ///
    /// Unlike [`crate::EdfReader::open`], this does not require an annotation
    /// signal or well-formed per-signal counts.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let header = FixedHeader::read_from(reader)?;
        let block = SignalHeaderBlock::read_from(reader, &header)?;
        Ok(Self::new(&header, &block))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .map_err(|e| EdfError::FileNotFound(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::read_from(&mut BufReader::new(file))
    }

    pub fn entries(&self) -> impl Iterator<Item = &DumpEntry> + '_ {
        self.fixed.iter().chain(self.signals.iter())
    }

    /// Fields of one signal, in column order
    pub fn signal(&self, index: usize) -> impl Iterator<Item = &DumpEntry> + '_ {
        self.signals.iter().filter(move |e| e.signal == Some(index))
    }
}

fn fixed_value(fixed: &FixedHeader, field: FixedField) -> FieldValue {
    match field {
        header::HEADER_LENGTH => FieldValue::Number(fixed.header_length_bytes),
        header::DATA_RECORD_COUNT => FieldValue::Number(fixed.data_record_count),
        header::SIGNAL_COUNT => FieldValue::Number(fixed.signal_count as u64),
        _ => FieldValue::Text(trim_field(fixed.field(field))),
    }
}
