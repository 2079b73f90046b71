//! Integration tests for the pinlock-core wire protocol.
//!
//! These drive raw client bytes through the public framer and command parser
//! together, and check the host reply formats a client would parse.

use pinlock_core::{Authenticator, Command, FrameError, HostMessage, LineFramer, Pin};
use proptest::prelude::*;

/// Feeds `chunks` one after another and returns every line produced.
fn frame_chunks<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> (Vec<String>, Vec<u8>) {
    let mut framer = LineFramer::new();
    let mut lines = Vec::new();
    for chunk in chunks {
        for line in framer.feed(chunk) {
            lines.push(line.expect("unbounded framer never fails"));
        }
    }
    (lines, framer.buffered().to_vec())
}

fn decode(bytes: &[u8]) -> Vec<Command> {
    let (lines, _) = frame_chunks([bytes]);
    lines.iter().map(|l| Command::parse(l)).collect()
}

// ── Example-based ─────────────────────────────────────────────────────────────

#[test]
fn test_typical_client_session_decodes_in_order() {
    // Arrange
    let wire = b"AUTH:4820\nAUTH:4821\nCMD:LOCK\nCMD:UNLOCK:4821\nPING\n";

    // Act
    let commands = decode(wire);

    // Assert
    assert_eq!(
        commands,
        vec![
            Command::Auth("4820".into()),
            Command::Auth("4821".into()),
            Command::LockRequest,
            Command::UnlockRequest("4821".into()),
            Command::Unrecognized("PING".into()),
        ]
    );
}

#[test]
fn test_crlf_and_lf_clients_decode_identically() {
    let lf = decode(b"AUTH:4821\nCMD:LOCK\nCMD:UNLOCK:1234\n");
    let crlf = decode(b"AUTH:4821\r\nCMD:LOCK\r\nCMD:UNLOCK:1234\r\n");
    assert_eq!(lf, crlf);
}

#[test]
fn test_auth_payload_checked_against_session_pin() {
    // Arrange
    let auth = Authenticator::with_pin(Pin::new(4821).expect("valid pin"));

    // Act
    let results: Vec<bool> = decode(b"AUTH:4820\nAUTH:4821\nAUTH: 4821\n")
        .into_iter()
        .map(|cmd| match cmd {
            Command::Auth(candidate) => auth.verify(&candidate),
            other => panic!("unexpected {other:?}"),
        })
        .collect();

    // Assert
    assert_eq!(results, vec![false, true, false]);
}

#[test]
fn test_host_replies_parse_back_on_the_client_side() {
    for msg in [
        HostMessage::AuthOk,
        HostMessage::AuthFail,
        HostMessage::metrics(37, 62),
    ] {
        let line = msg.to_line();
        let (lines, rest) = frame_chunks([line.as_bytes()]);
        assert!(rest.is_empty());
        assert_eq!(HostMessage::parse(&lines[0]), Ok(msg));
    }
}

#[test]
fn test_bounded_framer_reports_oversized_line() {
    // Arrange
    let mut framer = LineFramer::with_max_line_length(16);

    // Act
    let results: Vec<_> = framer.feed(b"AUTH:1234\nAUTH:12345678901234567890").collect();

    // Assert
    assert_eq!(results[0], Ok("AUTH:1234".to_string()));
    assert!(matches!(
        results[1],
        Err(FrameError::FrameTooLong { max: 16, .. })
    ));
    assert_eq!(results.len(), 2);
}

// ── Properties ────────────────────────────────────────────────────────────────

/// Bytes biased towards protocol text, newlines and carriage returns.
fn wire_bytes() -> impl Strategy<Value = Vec<u8>> {
    let byte = prop_oneof![
        6 => prop::sample::select(b"AUTH:CMD:LOCKUNLOCK0123456789 ".to_vec()),
        2 => Just(b'\n'),
        1 => Just(b'\r'),
        1 => any::<u8>(),
    ];
    prop::collection::vec(byte, 0..256)
}

/// Splits `bytes` at the given cut points (taken modulo the length).
fn split_at_cuts(bytes: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    if bytes.is_empty() {
        return vec![Vec::new()];
    }
    let mut points: Vec<usize> = cuts.iter().map(|c| c % bytes.len()).collect();
    points.push(0);
    points.push(bytes.len());
    points.sort_unstable();
    points.dedup();
    points
        .windows(2)
        .map(|w| bytes[w[0]..w[1]].to_vec())
        .collect()
}

proptest! {
    /// Framing does not depend on where the transport cut the stream.
    #[test]
    fn prop_framing_is_chunk_boundary_independent(
        bytes in wire_bytes(),
        cuts in prop::collection::vec(any::<usize>(), 0..16)
    ) {
        let whole = frame_chunks([bytes.as_slice()]);
        let chunks = split_at_cuts(&bytes, &cuts);
        let pieces = frame_chunks(chunks.iter().map(Vec::as_slice));
        prop_assert_eq!(whole, pieces);
    }

    /// Byte-at-a-time delivery gives the same lines as one big read.
    #[test]
    fn prop_byte_at_a_time_matches_single_feed(bytes in wire_bytes()) {
        let whole = frame_chunks([bytes.as_slice()]);
        let single = frame_chunks(bytes.chunks(1));
        prop_assert_eq!(whole, single);
    }

    /// Appending '\r' before each terminator never changes the decoded command.
    #[test]
    fn prop_crlf_equivalent_to_lf(
        lines in prop::collection::vec("[A-Z:0-9]{1,12}", 1..8)
    ) {
        let lf: String = lines.iter().map(|l| format!("{l}\n")).collect();
        let crlf: String = lines.iter().map(|l| format!("{l}\r\n")).collect();
        prop_assert_eq!(decode(lf.as_bytes()), decode(crlf.as_bytes()));
    }

    /// Nothing is lost: lines, their terminators and the remainder account
    /// for every input byte when the input holds no '\r' and no empty lines.
    #[test]
    fn prop_no_bytes_lost(
        lines in prop::collection::vec("[A-Z:0-9]{1,12}", 0..8),
        tail in "[A-Z:0-9]{0,12}"
    ) {
        let mut input: Vec<u8> = Vec::new();
        for l in &lines {
            input.extend_from_slice(l.as_bytes());
            input.push(b'\n');
        }
        input.extend_from_slice(tail.as_bytes());

        let (out, rest) = frame_chunks([input.as_slice()]);
        prop_assert_eq!(&out, &lines);
        prop_assert_eq!(rest, tail.into_bytes());
    }

    /// Every PIN drawn renders as exactly four digits and verifies against itself.
    #[test]
    fn prop_pin_verifies_its_own_rendering(value in 1000u16..=9999) {
        let pin = Pin::new(value).expect("in range");
        let auth = Authenticator::with_pin(pin);
        prop_assert_eq!(pin.to_string().len(), 4);
        prop_assert!(auth.verify(&value.to_string()));
    }
}
