//! # EDF/EDF+ annotation toolkit for Rust
//!
//! Decodes the header of EDF and EDF+ (European Data Format) recordings,
//! locates the `EDF Annotations` signal inside every data record, and checks
//! that an EDF+ file's first annotation starts at time offset zero.
//!
//! Only header fields and the raw bytes of the annotation channel are read;
//! signal samples are never decoded.
//!
//! ## Quick Start
//!
//! ### Checking files
//!
//! ```rust
//! use edf_annotations::validator::check_files;
//! # use edf_annotations::doctest_utils;
//!
//! # doctest_utils::create_simple_test_file("qs_recording.edf")?;
//! # doctest_utils::create_invalid_onset_test_file("qs_bad_onset.edf")?;
//! # doctest_utils::create_plain_edf_test_file("qs_plain.edf")?;
//! let report = check_files(["qs_recording.edf", "qs_bad_onset.edf", "qs_plain.edf"]);
//!
//! for path in report.invalid_paths() {
//!     eprintln!("Invalid annotation offset: {}", path.display());
//! }
//! assert_eq!(report.invalid_count(), 1);
//! # doctest_utils::cleanup_doctest_files();
//! # Ok::<(), edf_annotations::EdfError>(())
//! ```
//!
//! ### Reading annotation bytes per data record
//!
//! ```rust
//! use edf_annotations::EdfReader;
//!
//! # edf_annotations::doctest_utils::create_simple_test_file("qs_annotations.edf")?;
//! let mut reader = EdfReader::open("qs_annotations.edf")?;
//! let layout = reader.annotation_layout()?;
//! println!("annotation signal #{}, {} bytes per record",
//!     layout.annotation_index, layout.annotation_length_bytes());
//!
//! for record in reader.all_annotations()? {
//!     let record = record?;
//!     println!("{} ({}): {:?}", record.record_number, record.offset, record.display_bytes());
//! }
//! # std::fs::remove_file("qs_annotations.edf").ok();
//! # Ok::<(), edf_annotations::EdfError>(())
//! ```
//!
//! ### Dumping the header
//!
//! ```rust
//! use edf_annotations::HeaderDump;
//!
//! # edf_annotations::doctest_utils::create_simple_test_file("qs_header.edf")?;
//! let dump = HeaderDump::from_path("qs_header.edf")?;
//! for entry in dump.entries() {
//!     match entry.signal {
//!         Some(i) => println!("{} for signal {}: {:?}", entry.name, i + 1, entry.raw),
//!         None => println!("{}: {:?}", entry.name, entry.raw),
//!     }
//! }
//! for warning in &dump.warnings {
//!     eprintln!("Warning: {}", warning);
//! }
//! # std::fs::remove_file("qs_header.edf").ok();
//! # Ok::<(), edf_annotations::EdfError>(())
//! ```

pub mod annotations;
pub mod dump;
pub mod error;
pub mod header;
pub mod layout;
pub mod reader;
pub mod signal;
pub mod types;
pub mod utils;
pub mod validator;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use annotations::AnnotationExtractor;
pub use dump::HeaderDump;
pub use error::{EdfError, ErrorKind, Result};
pub use header::FixedHeader;
pub use reader::EdfReader;
pub use signal::{Column, SignalHeaderBlock};
pub use types::{AnnotationLayout, AnnotationRecord, FileType, SignalHeader};
pub use utils::ParseWarning;
pub use validator::{BatchReport, CheckOutcome};

// Important constants
pub const FIXED_HEADER_SIZE: usize = 256;
/// Bytes of signal header per signal, summed over all ten columns
pub const SIGNAL_HEADER_BYTES: usize = 256;
/// Every sample, annotation bytes included, is stored as a 2-byte unit
pub const BYTES_PER_SAMPLE: u64 = 2;
pub const ANNOTATION_LABEL: &str = "EDF Annotations";
pub const EDF_PLUS_MARKER: &[u8] = b"EDF+";
pub const MAX_SIGNALS: usize = 4096;

/// Library version
///
/// ```rust
/// let version = edf_annotations::version();
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
