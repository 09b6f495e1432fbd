use log::debug;

use crate::error::{EdfError, Result};
use crate::types::{AnnotationLayout, SignalHeader};
use crate::BYTES_PER_SAMPLE;

/// Finds the `EDF Annotations` signal and its place in each data record
///
/// Exactly one annotation signal is accepted; none or several is a format
/// error. Sample sums are checked so that the derived byte quantities on
/// [`AnnotationLayout`] cannot overflow.
///
/// ```rust
/// use edf_annotations::layout::locate_annotation_channel;
/// use edf_annotations::SignalHeader;
///
/// let signal = |label: &str, samples_per_record| SignalHeader {
///     label: label.to_string(),
///     transducer: String::new(),
///     physical_dimension: String::new(),
///     physical_min: String::new(),
///     physical_max: String::new(),
///     digital_min: String::new(),
///     digital_max: String::new(),
///     prefiltering: String::new(),
///     samples_per_record,
///     reserved: String::new(),
/// };
///
/// let layout = locate_annotation_channel(&[
///     signal("EEG", 100),
///     signal("EDF Annotations", 20),
/// ])?;
/// assert_eq!(layout.annotation_index, 1);
/// assert_eq!(layout.pre_annotation_samples, 100);
/// assert_eq!(layout.annotation_samples, 20);
/// assert_eq!(layout.total_samples_per_record, 120);
/// # Ok::<(), edf_annotations::EdfError>(())
/// ```
pub fn locate_annotation_channel(signals: &[SignalHeader]) -> Result<AnnotationLayout> {
    let mut matches = signals
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_annotation())
        .map(|(i, _)| i);

    let annotation_index = matches.next().ok_or(EdfError::MissingAnnotationSignal)?;
    if let Some(second) = matches.next() {
        return Err(EdfError::DuplicateAnnotationSignal {
            first: annotation_index,
            second,
        });
    }

    let pre_annotation_samples = sum_samples(&signals[..annotation_index])?;
    let annotation_samples = signals[annotation_index].samples_per_record;
    let total_samples_per_record = sum_samples(signals)?;

    // 字节数也不能溢出
    total_samples_per_record
        .checked_mul(BYTES_PER_SAMPLE)
        .ok_or(EdfError::LayoutOverflow)?;

    let layout = AnnotationLayout {
        annotation_index,
        pre_annotation_samples,
        annotation_samples,
        total_samples_per_record,
    };
    debug!("annotation layout: {:?}", layout);
    Ok(layout)
}

fn sum_samples(signals: &[SignalHeader]) -> Result<u64> {
    signals.iter().try_fold(0u64, |acc, s| {
        acc.checked_add(s.samples_per_record)
            .ok_or(EdfError::LayoutOverflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(label: &str, samples_per_record: u64) -> SignalHeader {
        SignalHeader {
            label: label.to_string(),
            transducer: String::new(),
            physical_dimension: String::new(),
            physical_min: String::new(),
            physical_max: String::new(),
            digital_min: String::new(),
            digital_max: String::new(),
            prefiltering: String::new(),
            samples_per_record,
            reserved: String::new(),
        }
    }

    #[test]
    fn test_annotation_after_one_signal() {
        let layout = locate_annotation_channel(&[
            signal("EEG", 100),
            signal("EDF Annotations", 20),
        ])
        .unwrap();
        assert_eq!(layout.annotation_index, 1);
        assert_eq!(layout.pre_annotation_samples, 100);
        assert_eq!(layout.annotation_samples, 20);
        assert_eq!(layout.total_samples_per_record, 120);
        assert_eq!(layout.annotation_offset_in_record_bytes(), 200);
        assert_eq!(layout.bytes_per_record(), 240);
    }

    #[test]
    fn test_annotation_between_signals() {
        let layout = locate_annotation_channel(&[
            signal("EEG C3", 256),
            signal("EEG C4", 256),
            signal("EDF Annotations", 30),
            signal("ECG", 128),
        ])
        .unwrap();
        assert_eq!(layout.annotation_index, 2);
        assert_eq!(layout.pre_annotation_samples, 512);
        assert_eq!(layout.annotation_samples, 30);
        assert_eq!(layout.total_samples_per_record, 670);
    }

    #[test]
    fn test_annotation_first() {
        let layout = locate_annotation_channel(&[
            signal("EDF Annotations", 60),
            signal("EEG", 200),
        ])
        .unwrap();
        assert_eq!(layout.annotation_index, 0);
        assert_eq!(layout.pre_annotation_samples, 0);
        assert_eq!(layout.annotation_offset_in_record_bytes(), 0);
    }

    #[test]
    fn test_missing_annotation_signal() {
        let err = locate_annotation_channel(&[signal("EEG", 100), signal("ECG", 100)]).unwrap_err();
        assert!(matches!(err, EdfError::MissingAnnotationSignal));
    }

    #[test]
    fn test_label_must_match_exactly() {
        let err = locate_annotation_channel(&[signal("EDF Annotation", 10)]).unwrap_err();
        assert!(matches!(err, EdfError::MissingAnnotationSignal));
    }

    #[test]
    fn test_duplicate_annotation_signal() {
        let err = locate_annotation_channel(&[
            signal("EDF Annotations", 20),
            signal("EEG", 100),
            signal("EDF Annotations", 20),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            EdfError::DuplicateAnnotationSignal { first: 0, second: 2 }
        ));
    }

    #[test]
    fn test_sample_sum_overflow() {
        let err = locate_annotation_channel(&[
            signal("EEG", u64::MAX),
            signal("EDF Annotations", 1),
        ])
        .unwrap_err();
        assert!(matches!(err, EdfError::LayoutOverflow));

        let err = locate_annotation_channel(&[
            signal("EDF Annotations", u64::MAX / 2 + 1),
        ])
        .unwrap_err();
        assert!(matches!(err, EdfError::LayoutOverflow));
    }
}
