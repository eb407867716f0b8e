// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Splitting of dictionary buffers and query lines

/// Iterates over the non-empty lines of a buffer.
///
/// A line is `[start, '\n')`, the newline itself is not part of it.
/// A trailing line without newline is yielded as well. Other bytes,
/// including `'\r'`, are kept as they are.
pub fn lines(buf: &[u8]) -> impl Iterator<Item = &[u8]> {
    buf.split(|&b| b == b'\n').filter(|line| !line.is_empty())
}

/// Removes a single trailing `'\n'`.
#[must_use]
pub fn strip_newline(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n").unwrap_or(line)
}

/// Upper bound of the number of keys in a buffer.
///
/// Counts non-empty lines, so blank lines do not inflate the table.
/// Duplicates are still counted.
#[must_use]
pub fn estimate_keys(buf: &[u8]) -> usize {
    lines(buf).count()
}

/// Number of key bytes in a buffer, that is every byte but the newlines.
#[must_use]
pub fn key_bytes(buf: &[u8]) -> usize {
    buf.len() - buf.iter().filter(|&&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn collect(buf: &[u8]) -> Vec<&[u8]> {
        lines(buf).collect()
    }

    #[test]
    fn tokenize_simple() {
        assert_eq!(
            vec![b"apple".as_slice(), b"banana".as_slice(), b"fig".as_slice()],
            collect(b"apple\nbanana\nfig\n")
        );
    }

    #[test]
    fn tokenize_unterminated_tail() {
        assert_eq!(vec![b"apple".as_slice(), b"fig".as_slice()], collect(b"apple\nfig"));
    }

    #[test]
    fn tokenize_skips_empty_lines() {
        assert_eq!(vec![b"a".as_slice(), b"b".as_slice()], collect(b"\n\na\n\n\nb\n\n"));
        assert!(collect(b"").is_empty());
        assert!(collect(b"\n").is_empty());
    }

    #[test]
    fn tokenize_keeps_carriage_return() {
        assert_eq!(vec![b"a\r".as_slice(), b" b ".as_slice()], collect(b"a\r\n b \n"));
    }

    #[test]
    fn tokenize_strip_newline() {
        assert_eq!(b"exit", strip_newline(b"exit\n"));
        assert_eq!(b"exit", strip_newline(b"exit"));
        assert_eq!(b"exit\n", strip_newline(b"exit\n\n"));
        assert_eq!(b"", strip_newline(b"\n"));
        assert_eq!(b"", strip_newline(b""));
    }

    #[test]
    fn tokenize_estimate_keys() {
        assert_eq!(0, estimate_keys(b""));
        assert_eq!(1, estimate_keys(b"a"));
        assert_eq!(1, estimate_keys(b"a\n"));
        assert_eq!(2, estimate_keys(b"a\nb"));
        assert_eq!(2, estimate_keys(b"a\n\nb\n"));
        assert_eq!(1, estimate_keys(b"\n\n\n\na\n\n\n"));
        assert_eq!(0, estimate_keys(b"\n\n\n"));
    }

    #[test]
    fn tokenize_key_bytes() {
        assert_eq!(0, key_bytes(b""));
        assert_eq!(0, key_bytes(b"\n\n"));
        assert_eq!(4, key_bytes(b"ab\n\ncd"));
    }
}
