use crate::annotations::strip_trailing_nuls;
use crate::{ANNOTATION_LABEL, BYTES_PER_SAMPLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Edf,
    EdfPlus,
}

/// One decoded entry of the signal header table
///
/// Text fields are trimmed; the physical and digital extremes are kept as text
/// since nothing here converts samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalHeader {
    pub label: String,
    pub transducer: String,
    pub physical_dimension: String,
    pub physical_min: String,
    pub physical_max: String,
    pub digital_min: String,
    pub digital_max: String,
    pub prefiltering: String,
    pub samples_per_record: u64,
    pub reserved: String,
}

impl SignalHeader {
    pub fn is_annotation(&self) -> bool {
        self.label == ANNOTATION_LABEL
    }
}

/// Position of the annotation channel inside every data record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationLayout {
    pub annotation_index: usize,
    /// 注释信号之前所有信号的样本数之和
    pub pre_annotation_samples: u64,
    pub annotation_samples: u64,
    pub total_samples_per_record: u64,
}

impl AnnotationLayout {
    pub fn annotation_offset_in_record_bytes(&self) -> u64 {
        self.pre_annotation_samples * BYTES_PER_SAMPLE
    }

    pub fn annotation_length_bytes(&self) -> u64 {
        self.annotation_samples * BYTES_PER_SAMPLE
    }

    pub fn bytes_per_record(&self) -> u64 {
        self.total_samples_per_record * BYTES_PER_SAMPLE
    }
}

/// Raw annotation channel bytes of one data record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// 1-based data record number
    pub record_number: u64,
    /// Absolute file offset of the first annotation byte
    pub offset: u64,
    pub bytes: Vec<u8>,
}

impl AnnotationRecord {
    /// The payload with trailing NUL padding removed, for display
    pub fn display_bytes(&self) -> &[u8] {
        strip_trailing_nuls(&self.bytes)
    }
}
