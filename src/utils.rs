use std::fmt;
use std::io::{self, Read};

use crate::error::{EdfError, Result};

/// Value taken from a header number field that carried trailing garbage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub field: &'static str,
    pub raw: String,
    pub value: u64,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Using {} as {}. May be incorrect due to unexpected characters in {:?}",
            self.value, self.field, self.raw
        )
    }
}

/// Result of a lenient header integer parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInt {
    pub value: u64,
    pub warning: Option<ParseWarning>,
}

/// 解析头部中的正整数字段
///
/// A digit run followed only by padding spaces parses cleanly. A digit run
/// followed by anything else is accepted with a warning. Fields that do not
/// start with a digit, and values of zero, are rejected.
pub fn parse_positive_int(raw: &[u8], field: &'static str) -> Result<ParsedInt> {
    let digits = raw.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return Err(EdfError::InvalidNumber { field, raw: lossy(raw) });
    }

    let value = parse_digits(&raw[..digits])
        .ok_or_else(|| EdfError::InvalidNumber { field, raw: lossy(raw) })?;

    if value == 0 {
        return Err(EdfError::NonPositive { field, value });
    }

    let warning = if raw[digits..].iter().all(|&b| b == b' ') {
        None
    } else {
        Some(ParseWarning { field, raw: lossy(raw), value })
    };

    Ok(ParsedInt { value, warning })
}

/// 解析每记录样本数（允许前后空格，允许 0）
pub fn parse_count(raw: &[u8]) -> Option<u64> {
    let s = std::str::from_utf8(raw).ok()?.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// 移除字段前后的空格
pub fn trim_field(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).trim().to_string()
}

/// Reads until `buf` is full or the stream ends, returning the byte count
pub fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn parse_digits(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, &d| {
        acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
    })
}

fn lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
