// Internal utilities for documentation and integration tests
// This file builds small raw EDF/EDF+ files byte by byte

use std::io;
use std::path::Path;

use crate::signal::Column;
use crate::{ANNOTATION_LABEL, FIXED_HEADER_SIZE, SIGNAL_HEADER_BYTES};

/// One signal of a test file
#[derive(Debug, Clone)]
pub struct TestSignal {
    pub label: String,
    pub samples_per_record: u64,
    /// Written instead of `samples_per_record` when set
    pub raw_samples: Option<String>,
}

impl TestSignal {
    pub fn new(label: &str, samples_per_record: u64) -> Self {
        TestSignal {
            label: label.to_string(),
            samples_per_record,
            raw_samples: None,
        }
    }

    pub fn annotations(samples_per_record: u64) -> Self {
        Self::new(ANNOTATION_LABEL, samples_per_record)
    }

    pub fn raw_samples(mut self, raw: &str) -> Self {
        self.raw_samples = Some(raw.to_string());
        self
    }

    fn is_annotation(&self) -> bool {
        self.label.trim() == ANNOTATION_LABEL
    }
}

/// Builder for a complete EDF/EDF+ file image
///
/// Defaults: EDF+C, signals `EEG` (100 samples) and `EDF Annotations`
/// (20 samples), 5 data records. Record `r` carries the annotation payload
/// `+{r-1}\x14\x14\x00` padded with NULs.
#[derive(Debug, Clone)]
pub struct TestFile {
    reserved: String,
    signals: Vec<TestSignal>,
    record_count: u64,
    raw_record_count: Option<String>,
    raw_header_length: Option<String>,
    payloads: Vec<(u64, Vec<u8>)>,
    truncate: usize,
}

impl TestFile {
    pub fn edf_plus() -> Self {
        TestFile {
            reserved: "EDF+C".to_string(),
            signals: vec![TestSignal::new("EEG", 100), TestSignal::annotations(20)],
            record_count: 5,
            raw_record_count: None,
            raw_header_length: None,
            payloads: Vec::new(),
            truncate: 0,
        }
    }

    /// Plain EDF: empty reserved field, same signals as [`TestFile::edf_plus`]
    pub fn edf() -> Self {
        TestFile {
            reserved: String::new(),
            ..Self::edf_plus()
        }
    }

    pub fn reserved(mut self, reserved: &str) -> Self {
        self.reserved = reserved.to_string();
        self
    }

    pub fn signals(mut self, signals: Vec<TestSignal>) -> Self {
        self.signals = signals;
        self
    }

    pub fn record_count(mut self, count: u64) -> Self {
        self.record_count = count;
        self
    }

    /// Overrides the text of the data record count field
    pub fn raw_record_count(mut self, raw: &str) -> Self {
        self.raw_record_count = Some(raw.to_string());
        self
    }

    /// Overrides the text of the header length field
    pub fn raw_header_length(mut self, raw: &str) -> Self {
        self.raw_header_length = Some(raw.to_string());
        self
    }

    /// Sets the annotation payload of 1-based record `record`
    pub fn payload(mut self, record: u64, bytes: &[u8]) -> Self {
        self.payloads.retain(|(r, _)| *r != record);
        self.payloads.push((record, bytes.to_vec()));
        self
    }

    /// Drops `bytes` bytes from the end of the file
    pub fn truncate(mut self, bytes: usize) -> Self {
        self.truncate = bytes;
        self
    }

    pub fn header_length(&self) -> usize {
        FIXED_HEADER_SIZE + self.signals.len() * SIGNAL_HEADER_BYTES
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();

        let header_length = self
            .raw_header_length
            .clone()
            .unwrap_or_else(|| self.header_length().to_string());
        let record_count = self
            .raw_record_count
            .clone()
            .unwrap_or_else(|| self.record_count.to_string());

        put(&mut out, "0", 8);
        put(&mut out, "X X X X", 80);
        put(&mut out, "Startdate 17-APR-2001 X X X", 80);
        put(&mut out, "17.04.01", 8);
        put(&mut out, "11.25.00", 8);
        put(&mut out, &header_length, 8);
        put(&mut out, &self.reserved, 44);
        put(&mut out, &record_count, 8);
        put(&mut out, "1", 8);
        put(&mut out, &self.signals.len().to_string(), 4);

        for column in Column::ALL {
            for signal in &self.signals {
                let value = match column {
                    Column::Label => signal.label.clone(),
                    Column::SamplesPerRecord => signal
                        .raw_samples
                        .clone()
                        .unwrap_or_else(|| signal.samples_per_record.to_string()),
                    Column::PhysicalMin | Column::DigitalMin => "-32768".to_string(),
                    Column::PhysicalMax | Column::DigitalMax => "32767".to_string(),
                    _ => String::new(),
                };
                put(&mut out, &value, column.width());
            }
        }

        for record in 1..=self.record_count {
            for (i, signal) in self.signals.iter().enumerate() {
                let len = (signal.samples_per_record * 2) as usize;
                if signal.is_annotation() {
                    let mut payload = self.payload_for(record);
                    payload.resize(len, 0);
                    out.extend_from_slice(&payload);
                } else {
                    out.extend((0..len).map(|b| if b % 2 == 0 { record as u8 } else { i as u8 }));
                }
            }
        }

        out.truncate(out.len().saturating_sub(self.truncate));
        out
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        std::fs::write(path, self.build())
    }

    fn payload_for(&self, record: u64) -> Vec<u8> {
        self.payloads
            .iter()
            .find(|(r, _)| *r == record)
            .map(|(_, bytes)| bytes.clone())
            .unwrap_or_else(|| format!("+{}\x14\x14\x00", record - 1).into_bytes())
    }
}

// 写入定宽 ASCII 字段（右侧补空格）
fn put(out: &mut Vec<u8>, value: &str, width: usize) {
    let mut field = value.as_bytes().to_vec();
    field.resize(width, b' ');
    out.extend_from_slice(&field);
}

/// Creates a valid EDF+ test file for documentation examples
pub fn create_simple_test_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    TestFile::edf_plus().write_to(path)
}

/// Creates an EDF+ file whose first onset is not zero
pub fn create_invalid_onset_test_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    TestFile::edf_plus().payload(1, b"+1\x14\x14\x00").write_to(path)
}

/// Creates a plain EDF test file
pub fn create_plain_edf_test_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    TestFile::edf().write_to(path)
}

/// Cleanup function to remove test files after doctests
pub fn cleanup_doctest_files() {
    let test_files = ["qs_recording.edf", "qs_bad_onset.edf", "qs_plain.edf"];

    for file in &test_files {
        let _ = std::fs::remove_file(file);
    }
}
