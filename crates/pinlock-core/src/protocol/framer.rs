//! Incremental newline deframer for the inbound byte stream.
//!
//! # Why a buffer is needed
//!
//! A byte stream gives no guarantee that one `read()` returns exactly one
//! line.  A read may stop in the middle of a command, or deliver the tail of
//! one command together with two more.  [`LineFramer`] therefore appends every
//! chunk to an accumulator and only hands out a line once its `\n` has
//! arrived.  Whatever follows the last `\n` stays buffered for the next call.
//!
//! The output is independent of how the stream was chunked: feeding
//! `b"AUTH:1234\nCMD:LOCK\n"` in one call or byte-by-byte yields the same two
//! lines.

use thiserror::Error;
use tracing::trace;

/// Errors produced while extracting lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// A line grew past the configured maximum before its terminator arrived.
    #[error("line exceeds {max} bytes ({buffered} buffered without a terminator)")]
    FrameTooLong { buffered: usize, max: usize },
}

/// Line-delimited deframer bound to a single session.
///
/// Lines are split on `\n`; a single trailing `\r` is stripped so `\r\n`
/// clients decode identically.  Zero-length lines are dropped.
#[derive(Debug, Default)]
pub struct LineFramer {
    accumulator: Vec<u8>,
    /// Prefix of `accumulator` already scanned and known to hold no `\n`.
    scanned: usize,
    max_line_length: Option<usize>,
}

impl LineFramer {
    /// Creates a framer with unbounded accumulation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a framer that rejects any line longer than `max` bytes
    /// (terminator excluded).
    pub fn with_max_line_length(max: usize) -> Self {
        Self {
            max_line_length: Some(max),
            ..Self::default()
        }
    }

    /// Appends `bytes` and returns the complete lines now available.
    ///
    /// The returned iterator is lazy: lines are cut out of the accumulator as
    /// it is advanced.  Dropping it early leaves the remaining lines buffered;
    /// they come out of the next `feed` call (which may pass an empty slice).
    ///
    /// With a maximum configured, an oversized line yields one
    /// [`FrameError::FrameTooLong`] and the iterator ends.  The offending
    /// bytes stay buffered.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pinlock_core::LineFramer;
    ///
    /// let mut framer = LineFramer::new();
    /// assert_eq!(framer.feed(b"AUTH:48").count(), 0);
    ///
    /// let lines: Vec<String> = framer.feed(b"21\r\n").map(Result::unwrap).collect();
    /// assert_eq!(lines, vec!["AUTH:4821".to_string()]);
    /// ```
    pub fn feed(&mut self, bytes: &[u8]) -> Lines<'_> {
        self.accumulator.extend_from_slice(bytes);
        Lines {
            framer: self,
            finished: false,
        }
    }

    /// Bytes received but not yet resolved into a line.
    pub fn buffered(&self) -> &[u8] {
        &self.accumulator
    }

    /// Cuts the next line (possibly empty) out of the accumulator.
    fn take_line(&mut self) -> Option<Result<String, FrameError>> {
        let offset = self.accumulator[self.scanned..]
            .iter()
            .position(|&b| b == b'\n');

        let Some(offset) = offset else {
            self.scanned = self.accumulator.len();
            return self.check_partial().map(Err);
        };

        let newline = self.scanned + offset;
        let mut end = newline;
        if end > 0 && self.accumulator[end - 1] == b'\r' {
            end -= 1;
        }

        if let Some(max) = self.max_line_length {
            if end > max {
                return Some(Err(FrameError::FrameTooLong { buffered: end, max }));
            }
        }

        let line = String::from_utf8_lossy(&self.accumulator[..end]).into_owned();
        self.accumulator.drain(..=newline);
        self.scanned = 0;
        Some(Ok(line))
    }

    fn check_partial(&self) -> Option<FrameError> {
        let max = self.max_line_length?;
        // A trailing '\r' may still turn out to be part of a "\r\n".
        let mut pending = self.accumulator.len();
        if self.accumulator.last() == Some(&b'\r') {
            pending -= 1;
        }
        (pending > max).then_some(FrameError::FrameTooLong {
            buffered: pending,
            max,
        })
    }
}

/// Lazy sequence of lines returned by [`LineFramer::feed`].
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
    finished: bool,
}

impl Iterator for Lines<'_> {
    type Item = Result<String, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            match self.framer.take_line() {
                Some(Ok(line)) if line.is_empty() => {
                    trace!("dropping empty line");
                }
                Some(Ok(line)) => return Some(Ok(line)),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(framer: &mut LineFramer, bytes: &[u8]) -> Vec<String> {
        framer
            .feed(bytes)
            .collect::<Result<Vec<_>, _>>()
            .expect("unbounded framer never fails")
    }

    #[test]
    fn test_single_complete_line_is_emitted() {
        let mut framer = LineFramer::new();
        assert_eq!(lines(&mut framer, b"CMD:LOCK\n"), vec!["CMD:LOCK"]);
        assert!(framer.buffered().is_empty());
    }

    #[test]
    fn test_partial_line_stays_buffered_until_terminator() {
        // Arrange
        let mut framer = LineFramer::new();

        // Act
        let first = lines(&mut framer, b"AUTH:12");
        let second = lines(&mut framer, b"34\n");

        // Assert
        assert!(first.is_empty());
        assert_eq!(second, vec!["AUTH:1234"]);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk_keep_order() {
        let mut framer = LineFramer::new();
        let out = lines(&mut framer, b"AUTH:1111\nCMD:LOCK\nCMD:UNLOCK:9");
        assert_eq!(out, vec!["AUTH:1111", "CMD:LOCK"]);
        assert_eq!(framer.buffered(), b"CMD:UNLOCK:9");
    }

    #[test]
    fn test_crlf_is_stripped() {
        let mut framer = LineFramer::new();
        assert_eq!(lines(&mut framer, b"CMD:LOCK\r\n"), vec!["CMD:LOCK"]);
    }

    #[test]
    fn test_crlf_split_between_chunks_is_stripped() {
        let mut framer = LineFramer::new();
        assert!(lines(&mut framer, b"CMD:LOCK\r").is_empty());
        assert_eq!(lines(&mut framer, b"\n"), vec!["CMD:LOCK"]);
    }

    #[test]
    fn test_only_one_carriage_return_is_stripped() {
        let mut framer = LineFramer::new();
        assert_eq!(lines(&mut framer, b"X\r\r\n"), vec!["X\r"]);
    }

    #[test]
    fn test_empty_lines_are_dropped() {
        let mut framer = LineFramer::new();
        let out = lines(&mut framer, b"\n\r\n\nCMD:LOCK\n\n");
        assert_eq!(out, vec!["CMD:LOCK"]);
        assert!(framer.buffered().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut framer = LineFramer::new();
        let out = lines(&mut framer, b"AUTH:\xFF\n");
        assert_eq!(out, vec!["AUTH:\u{FFFD}"]);
    }

    #[test]
    fn test_dropping_iterator_early_keeps_remaining_lines() {
        // Arrange
        let mut framer = LineFramer::new();

        // Act – take only the first line
        let first = framer.feed(b"A\nB\n").next();
        let rest = lines(&mut framer, b"");

        // Assert
        assert_eq!(first, Some(Ok("A".to_string())));
        assert_eq!(rest, vec!["B"]);
    }

    #[test]
    fn test_unbounded_framer_accumulates_long_lines() {
        let mut framer = LineFramer::new();
        let long = vec![b'x'; 64 * 1024];
        assert!(lines(&mut framer, &long).is_empty());
        assert_eq!(framer.buffered().len(), long.len());
        let out = lines(&mut framer, b"\n");
        assert_eq!(out[0].len(), long.len());
    }

    #[test]
    fn test_max_line_length_rejects_partial_overflow() {
        // Arrange
        let mut framer = LineFramer::with_max_line_length(8);

        // Act
        let result: Vec<_> = framer.feed(b"123456789").collect();

        // Assert
        assert_eq!(
            result,
            vec![Err(FrameError::FrameTooLong { buffered: 9, max: 8 })]
        );
    }

    #[test]
    fn test_max_line_length_rejects_complete_overflow() {
        let mut framer = LineFramer::with_max_line_length(4);
        let result: Vec<_> = framer.feed(b"OK\nTOOLONG\nX\n").collect();
        assert_eq!(
            result,
            vec![
                Ok("OK".to_string()),
                Err(FrameError::FrameTooLong { buffered: 7, max: 4 }),
            ]
        );
    }

    #[test]
    fn test_max_line_length_allows_exact_fit_with_crlf() {
        let mut framer = LineFramer::with_max_line_length(4);
        assert_eq!(lines(&mut framer, b"ABCD\r"), Vec::<String>::new());
        assert_eq!(lines(&mut framer, b"\n"), vec!["ABCD"]);
    }

    #[test]
    fn test_no_bytes_lost_between_lines_and_buffer() {
        // Arrange
        let input = b"AUTH:4821\r\nCMD:LOCK\nCMD:UNLO";
        let mut framer = LineFramer::new();

        // Act
        let out = lines(&mut framer, input);

        // Assert – lines + delimiters + remainder reconstruct the input
        let mut rebuilt = Vec::new();
        rebuilt.extend_from_slice(out[0].as_bytes());
        rebuilt.extend_from_slice(b"\r\n");
        rebuilt.extend_from_slice(out[1].as_bytes());
        rebuilt.push(b'\n');
        rebuilt.extend_from_slice(framer.buffered());
        assert_eq!(rebuilt, input);
    }
}
