//! Columnar signal header block.
//!
//! The block that follows the fixed header is not an array of per-signal
//! records. It is ten consecutive columns, each holding one fixed-width field
//! for every signal:
//!
//! ```text
//! | label × N | transducer × N | physical dim × N | ... | reserved × N |
//! ```
//!
//! Field `i` of a column therefore lives at
//! `column_offset + i * column_width`, where `column_offset` is the running sum
//! of `N * width` over all preceding columns.

use std::io::Read;

use log::debug;

use crate::error::{EdfError, Result};
use crate::header::FixedHeader;
use crate::types::SignalHeader;
use crate::utils::{parse_count, trim_field};
use crate::SIGNAL_HEADER_BYTES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Label,
    Transducer,
    PhysicalDimension,
    PhysicalMin,
    PhysicalMax,
    DigitalMin,
    DigitalMax,
    Prefiltering,
    SamplesPerRecord,
    Reserved,
}

impl Column {
    /// Columns in on-disk order
    pub const ALL: [Column; 10] = [
        Column::Label,
        Column::Transducer,
        Column::PhysicalDimension,
        Column::PhysicalMin,
        Column::PhysicalMax,
        Column::DigitalMin,
        Column::DigitalMax,
        Column::Prefiltering,
        Column::SamplesPerRecord,
        Column::Reserved,
    ];

    /// Width in bytes of one signal's field in this column
    pub fn width(self) -> usize {
        match self {
            Column::Label => 16,
            Column::Transducer | Column::Prefiltering => 80,
            Column::Reserved => 32,
            _ => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Column::Label => "Label",
            Column::Transducer => "Transducer type",
            Column::PhysicalDimension => "Physical dimension",
            Column::PhysicalMin => "Physical minimum",
            Column::PhysicalMax => "Physical maximum",
            Column::DigitalMin => "Digital minimum",
            Column::DigitalMax => "Digital maximum",
            Column::Prefiltering => "Prefiltering",
            Column::SamplesPerRecord => "Samples per record",
            Column::Reserved => "Reserved",
        }
    }
}

/// Raw signal header block with column offsets resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalHeaderBlock {
    signal_count: usize,
    bytes: Vec<u8>,
    column_offsets: [usize; 10],
}

impl SignalHeaderBlock {
    /// Wraps an already-read block of `header_length_bytes - 256` bytes
    pub fn new(signal_count: usize, bytes: Vec<u8>) -> Result<Self> {
        let required = signal_count * SIGNAL_HEADER_BYTES;
        if bytes.len() < required {
            return Err(EdfError::SignalBlockTooSmall {
                signals: signal_count,
                required,
                actual: bytes.len(),
            });
        }

        let mut column_offsets = [0usize; 10];
        let mut running_offset = 0;
        for (slot, column) in column_offsets.iter_mut().zip(Column::ALL) {
            *slot = running_offset;
            running_offset += signal_count * column.width();
        }

        Ok(SignalHeaderBlock {
            signal_count,
            bytes,
            column_offsets,
        })
    }

    /// Reads the block that immediately follows the fixed header
    pub fn read_from<R: Read>(reader: &mut R, fixed: &FixedHeader) -> Result<Self> {
        let expected = usize::try_from(fixed.signal_block_len())
            .map_err(|_| EdfError::LayoutOverflow)?;

        let mut bytes = Vec::with_capacity(expected.min(fixed.signal_count * SIGNAL_HEADER_BYTES));
        reader.by_ref().take(expected as u64).read_to_end(&mut bytes)?;
        if bytes.len() < expected {
            return Err(EdfError::TruncatedHeader {
                expected,
                actual: bytes.len(),
            });
        }

        Self::new(fixed.signal_count, bytes)
    }

    pub fn signal_count(&self) -> usize {
        self.signal_count
    }

    /// Raw bytes of `column` for the signal at `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= signal_count()`.
    pub fn field(&self, column: Column, index: usize) -> &[u8] {
        assert!(index < self.signal_count, "signal index {} out of range", index);
        let start = self.column_offsets[column as usize] + index * column.width();
        &self.bytes[start..start + column.width()]
    }

    fn text(&self, column: Column, index: usize) -> String {
        trim_field(self.field(column, index))
    }

    /// Decodes every signal, preserving channel order
    pub fn decode(&self) -> Result<Vec<SignalHeader>> {
        let signals = (0..self.signal_count)
            .map(|i| -> Result<SignalHeader> {
                let raw_samples = self.field(Column::SamplesPerRecord, i);
                let samples_per_record = parse_count(raw_samples).ok_or_else(|| {
                    EdfError::InvalidSamplesPerRecord {
                        signal: i,
                        raw: String::from_utf8_lossy(raw_samples).into_owned(),
                    }
                })?;

                Ok(SignalHeader {
                    label: self.text(Column::Label, i),
                    transducer: self.text(Column::Transducer, i),
                    physical_dimension: self.text(Column::PhysicalDimension, i),
                    physical_min: self.text(Column::PhysicalMin, i),
                    physical_max: self.text(Column::PhysicalMax, i),
                    digital_min: self.text(Column::DigitalMin, i),
                    digital_max: self.text(Column::DigitalMax, i),
                    prefiltering: self.text(Column::Prefiltering, i),
                    samples_per_record,
                    reserved: self.text(Column::Reserved, i),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("decoded {} signal headers", signals.len());
        Ok(signals)
    }
}
