use edf_annotations::doctest_utils::{TestFile, TestSignal};
use edf_annotations::validator::{check_file, check_files};
use edf_annotations::{EdfError, EdfReader, ErrorKind, FileType, HeaderDump};
use std::path::PathBuf;
use tempfile::TempDir;

// 在临时目录中写入测试文件
fn write_file(dir: &TempDir, name: &str, file: &TestFile) -> PathBuf {
    let path = dir.path().join(name);
    file.write_to(&path).unwrap();
    path
}

fn multi_channel_file() -> TestFile {
    TestFile::edf_plus().signals(vec![
        TestSignal::new("EEG C3", 256),
        TestSignal::new("EEG C4", 256),
        TestSignal::annotations(30),
        TestSignal::new("ECG Lead II", 128),
    ])
}

#[test]
fn test_valid_edf_plus_first_onset() {
    let dir = TempDir::new().unwrap();
    let file = TestFile::edf_plus()
        .signals(vec![TestSignal::new("EEG", 100), TestSignal::annotations(5)])
        .payload(1, b"+0.20\x14\x14\x00\x00");
    let path = write_file(&dir, "valid.edf", &file);

    let outcome = check_file(&path).unwrap();
    assert_eq!(outcome.file_type, FileType::EdfPlus);
    assert!(outcome.is_valid());

    let first = outcome.first_annotation.unwrap();
    assert_eq!(first.record_number, 1);
    assert_eq!(first.offset, 768 + 200);
    assert_eq!(first.bytes, b"+0.20\x14\x14\x00\x00\x00");
    assert_eq!(first.display_bytes(), b"+0.20\x14\x14\x00");
}

#[test]
fn test_both_zero_onset_forms_accepted() {
    let dir = TempDir::new().unwrap();
    for (i, payload) in [&b"+0.0\x14\x14\x00"[..], &b"+0\x14\x14Start\x14\x00"[..]].iter().enumerate() {
        let path = write_file(&dir, &format!("zero_{}.edf", i), &TestFile::edf_plus().payload(1, payload));
        assert!(check_file(&path).unwrap().is_valid(), "payload {:?}", payload);
    }
}

#[test]
fn test_nonzero_first_onset_is_invalid() {
    let dir = TempDir::new().unwrap();
    let payloads: [&[u8]; 5] = [
        b"+1\x14\x14\x00",
        b"+00\x14\x14\x00",
        b"-0\x14\x14\x00",
        b"0\x14\x14\x00",
        b"",
    ];
    for (i, payload) in payloads.iter().enumerate() {
        let path = write_file(&dir, &format!("bad_{}.edf", i), &TestFile::edf_plus().payload(1, payload));
        let outcome = check_file(&path).unwrap();
        assert_eq!(outcome.file_type, FileType::EdfPlus);
        assert!(!outcome.is_valid(), "payload {:?}", payload);
    }
}

#[test]
fn test_plain_edf_is_always_valid() {
    let dir = TempDir::new().unwrap();
    let with_bad_payload = TestFile::edf().payload(1, b"garbage");
    let no_annotations = TestFile::edf().signals(vec![TestSignal::new("EEG", 100)]);

    for (name, file) in [("plain_a.edf", with_bad_payload), ("plain_b.edf", no_annotations)] {
        let outcome = check_file(write_file(&dir, name, &file)).unwrap();
        assert_eq!(outcome.file_type, FileType::Edf);
        assert!(outcome.is_valid());
        assert!(outcome.first_annotation.is_none());
    }
}

#[test]
fn test_reserved_needs_edf_plus_prefix() {
    let dir = TempDir::new().unwrap();
    let file = TestFile::edf_plus().reserved(" EDF+C").payload(1, b"+9\x14\x14\x00");
    let outcome = check_file(write_file(&dir, "shifted.edf", &file)).unwrap();
    assert_eq!(outcome.file_type, FileType::Edf);
    assert!(outcome.is_valid());

    let file = TestFile::edf_plus().reserved("EDF+D").payload(1, b"+9\x14\x14\x00");
    let outcome = check_file(write_file(&dir, "discontinuous.edf", &file)).unwrap();
    assert_eq!(outcome.file_type, FileType::EdfPlus);
    assert!(!outcome.is_valid());
}

#[test]
fn test_annotation_between_signals() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "multi.edf", &multi_channel_file());

    let mut reader = EdfReader::open(&path).unwrap();
    let layout = reader.annotation_layout().unwrap();
    assert_eq!(layout.annotation_index, 2);
    assert_eq!(layout.pre_annotation_samples, 512);
    assert_eq!(layout.annotation_samples, 30);
    assert_eq!(layout.total_samples_per_record, 670);

    let header_length = 256 * 5;
    let record = reader.read_annotation(4).unwrap();
    assert_eq!(record.offset, header_length + 3 * 1340 + 1024);
    assert_eq!(record.display_bytes(), b"+3\x14\x14\x00");
    assert!(reader.check().unwrap().is_valid());
}

#[test]
fn test_header_length_with_trailing_characters() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "garbage_tail.edf", &TestFile::edf_plus().raw_header_length("768 abc"));

    let mut reader = EdfReader::open(&path).unwrap();
    assert_eq!(reader.header().header_length_bytes, 768);
    assert_eq!(reader.header().warnings.len(), 1);
    assert_eq!(reader.header().warnings[0].value, 768);
    assert!(reader.check().unwrap().is_valid());
}

#[test]
fn test_header_length_without_digits() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "no_digits.edf", &TestFile::edf_plus().raw_header_length("abc"));

    let err = EdfReader::open(&path).err().unwrap();
    assert!(matches!(err, EdfError::InvalidNumber { field: "header size", .. }));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_zero_data_records_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "empty.edf", &TestFile::edf_plus().record_count(0));
    let err = check_file(&path).unwrap_err();
    assert!(matches!(err, EdfError::NonPositive { field: "number of data records", value: 0 }));
}

#[test]
fn test_unknown_record_count_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "recording.edf", &TestFile::edf_plus().raw_record_count("-1"));
    let err = check_file(&path).unwrap_err();
    assert!(matches!(err, EdfError::InvalidNumber { field: "number of data records", .. }));
}

#[test]
fn test_missing_annotation_signal_in_edf_plus() {
    let dir = TempDir::new().unwrap();
    let file = TestFile::edf_plus().signals(vec![TestSignal::new("EEG", 100)]);
    let err = check_file(write_file(&dir, "no_ann.edf", &file)).unwrap_err();
    assert!(matches!(err, EdfError::MissingAnnotationSignal));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_duplicate_annotation_signal_in_edf_plus() {
    let dir = TempDir::new().unwrap();
    let file = TestFile::edf_plus().signals(vec![
        TestSignal::annotations(10),
        TestSignal::new("EEG", 100),
        TestSignal::annotations(10),
    ]);
    let err = check_file(write_file(&dir, "two_ann.edf", &file)).unwrap_err();
    assert!(matches!(err, EdfError::DuplicateAnnotationSignal { first: 0, second: 2 }));
}

#[test]
fn test_truncated_signal_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cut.edf");
    std::fs::write(&path, &TestFile::edf_plus().build()[..700]).unwrap();

    let err = check_file(&path).unwrap_err();
    assert!(matches!(err, EdfError::TruncatedHeader { expected: 512, actual: 444 }));
}

#[test]
fn test_first_record_short_read() {
    let dir = TempDir::new().unwrap();
    let file = TestFile::edf_plus().record_count(1).truncate(10);
    let err = check_file(write_file(&dir, "short.edf", &file)).unwrap_err();
    assert!(matches!(err, EdfError::ShortRead { offset: 968, expected: 40, actual: 30 }));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_file_not_found() {
    let dir = TempDir::new().unwrap();
    let err = check_file(dir.path().join("missing.edf")).unwrap_err();
    assert!(matches!(err, EdfError::FileNotFound(_)));
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_batch_keeps_going_after_failures() {
    let dir = TempDir::new().unwrap();
    let good = write_file(&dir, "good.edf", &TestFile::edf_plus());
    let plain = write_file(&dir, "plain.edf", &TestFile::edf());
    let bad = write_file(&dir, "bad.edf", &TestFile::edf_plus().payload(1, b"+1\x14\x14\x00"));
    let broken = write_file(
        &dir,
        "broken.edf",
        &TestFile::edf_plus().signals(vec![TestSignal::new("EEG", 100)]),
    );

    let report = check_files([&good, &bad, &plain, &broken]);
    assert_eq!(report.results.len(), 4);
    assert_eq!(report.invalid_count(), 2);

    let invalid: Vec<_> = report.invalid_paths().collect();
    assert_eq!(invalid, vec![bad.as_path(), broken.as_path()]);
}

#[test]
fn test_header_dump_matches_reader() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "dump.edf", &multi_channel_file());

    let dump = HeaderDump::from_path(&path).unwrap();
    let reader = EdfReader::open(&path).unwrap();
    assert_eq!(dump, reader.header_dump());

    assert_eq!(dump.fixed.len(), 10);
    assert_eq!(dump.signals.len(), 40);
    let labels: Vec<_> = dump
        .signals
        .iter()
        .filter(|e| e.name == "Label")
        .map(|e| String::from_utf8_lossy(&e.raw).trim().to_string())
        .collect();
    assert_eq!(labels, vec!["EEG C3", "EEG C4", "EDF Annotations", "ECG Lead II"]);
    assert_eq!(
        dump.start_datetime.map(|t| t.to_string()),
        Some("2001-04-17 11:25:00".to_string())
    );
}
