use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use crate::annotations::AnnotationExtractor;
use crate::dump::HeaderDump;
use crate::error::{EdfError, Result};
use crate::header::FixedHeader;
use crate::layout::locate_annotation_channel;
use crate::signal::SignalHeaderBlock;
use crate::types::{AnnotationLayout, AnnotationRecord, FileType, SignalHeader};
use crate::validator::{self, CheckOutcome};

/// EDF/EDF+ file reader for header inspection and annotation extraction
///
/// The `EdfReader` decodes the fixed header and the signal header table once
/// when it is created and then serves the three header-level operations:
/// validity checking, header dumping and reading raw annotation bytes per data
/// record. Signal samples are never decoded.
///
/// # Examples
///
/// ## Checking the first annotation onset
///
/// ```rust
/// use edf_annotations::{EdfReader, FileType};
///
/// # // Generate test file (hidden from docs)
/// # edf_annotations::doctest_utils::create_simple_test_file("reader_check.edf")?;
/// #
/// let mut reader = EdfReader::open("reader_check.edf")?;
/// let outcome = reader.check()?;
///
/// assert_eq!(outcome.file_type, FileType::EdfPlus);
/// assert!(outcome.is_valid());
///
/// # // Cleanup (hidden from docs)
/// # std::fs::remove_file("reader_check.edf").ok();
/// # Ok::<(), edf_annotations::EdfError>(())
/// ```
///
/// ## Listing annotation payloads
///
/// ```rust
/// use edf_annotations::EdfReader;
///
/// # edf_annotations::doctest_utils::create_simple_test_file("reader_list.edf")?;
/// let mut reader = EdfReader::open("reader_list.edf")?;
///
/// for record in reader.annotations(2, 3)? {
///     let record = record?;
///     println!("{} ({}): {:?}",
///         record.record_number,
///         record.offset,
///         String::from_utf8_lossy(record.display_bytes()));
/// }
///
/// # std::fs::remove_file("reader_list.edf").ok();
/// # Ok::<(), edf_annotations::EdfError>(())
/// ```
pub struct EdfReader<R = BufReader<File>> {
    file: R,
    header: FixedHeader,
    block: SignalHeaderBlock,
    /// 按通道顺序排列的信号头
    signals: Vec<SignalHeader>,
}

impl EdfReader<BufReader<File>> {
    /// Opens an EDF or EDF+ file and decodes its header
    ///
    /// # Errors
    ///
    /// * `EdfError::FileNotFound` - The file cannot be opened
    /// * Format errors - The fixed header or the signal table is malformed
    ///
    /// The annotation signal is not required here; plain EDF files without
    /// one can still be checked and dumped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edf_annotations::{EdfError, EdfReader};
    ///
    /// match EdfReader::open("nonexistent.edf") {
    ///     Ok(_) => println!("Unexpected success"),
    ///     Err(EdfError::FileNotFound(msg)) => println!("File not found: {}", msg),
    ///     Err(e) => println!("Other error: {}", e),
    /// }
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .map_err(|e| EdfError::FileNotFound(format!("{}: {}", path.as_ref().display(), e)))?;

        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> EdfReader<R> {
    /// Decodes the header of any seekable byte stream
    pub fn new(mut file: R) -> Result<Self> {
        file.seek(SeekFrom::Start(0))?;

        let header = FixedHeader::read_from(&mut file)?;
        let block = SignalHeaderBlock::read_from(&mut file, &header)?;
        let signals = block.decode()?;

        debug!(
            "header: {} bytes, {} data records, {} signals, EDF+: {}",
            header.header_length_bytes,
            header.data_record_count,
            header.signal_count,
            header.is_edf_plus()
        );

        Ok(EdfReader {
            file,
            header,
            block,
            signals,
        })
    }

    /// Gets a reference to the decoded fixed header
    pub fn header(&self) -> &FixedHeader {
        &self.header
    }

    /// Decoded signal headers, in channel order
    pub fn signals(&self) -> &[SignalHeader] {
        &self.signals
    }

    pub fn file_type(&self) -> FileType {
        if self.header.is_edf_plus() {
            FileType::EdfPlus
        } else {
            FileType::Edf
        }
    }

    /// Locates the `EDF Annotations` signal within each data record
    pub fn annotation_layout(&self) -> Result<AnnotationLayout> {
        locate_annotation_channel(&self.signals)
    }

    /// Reads raw annotation bytes for the records `first..=last` (1-based)
    ///
    /// The returned iterator borrows the reader and reads lazily in ascending
    /// record order.
    ///
    /// # Errors
    ///
    /// * `EdfError::RecordRangeInverted` / `EdfError::RecordOutOfRange` - The
    ///   range is empty or outside `[1, data_record_count]`
    /// * `EdfError::MissingAnnotationSignal` - No annotation signal exists
    ///
    /// ```rust
    /// use edf_annotations::{EdfError, EdfReader};
    ///
    /// # edf_annotations::doctest_utils::create_simple_test_file("reader_range.edf")?;
    /// let mut reader = EdfReader::open("reader_range.edf")?;
    /// let count = reader.header().data_record_count;
    ///
    /// match reader.annotations(1, count + 1) {
    ///     Err(EdfError::RecordOutOfRange { first, last, record_count }) => {
    ///         println!("[{}, {}] is outside [1, {}]", first, last, record_count);
    ///     }
    ///     _ => unreachable!(),
    /// }
    /// # std::fs::remove_file("reader_range.edf").ok();
    /// # Ok::<(), edf_annotations::EdfError>(())
    /// ```
    pub fn annotations(&mut self, first: u64, last: u64) -> Result<AnnotationExtractor<&mut R>> {
        let layout = self.annotation_layout()?;
        AnnotationExtractor::new(&mut self.file, &self.header, &layout, first, last)
    }

    /// Reads raw annotation bytes of every data record
    pub fn all_annotations(&mut self) -> Result<AnnotationExtractor<&mut R>> {
        let last = self.header.data_record_count;
        self.annotations(1, last)
    }

    /// Reads the raw annotation bytes of a single record
    pub fn read_annotation(&mut self, record: u64) -> Result<AnnotationRecord> {
        let record_count = self.header.data_record_count;
        match self.annotations(record, record)?.next() {
            Some(result) => result,
            None => Err(EdfError::RecordOutOfRange {
                first: record,
                last: record,
                record_count,
            }),
        }
    }

    /// Classifies the file and validates the first EDF+ annotation onset
    pub fn check(&mut self) -> Result<CheckOutcome> {
        validator::validate(&mut self.file, &self.header, &self.signals)
    }

    /// Structured listing of every header field
    pub fn header_dump(&self) -> HeaderDump {
        HeaderDump::new(&self.header, &self.block)
    }

    pub fn into_inner(self) -> R {
        self.file
    }
}
