use pretty_assertions::assert_eq;

use super::SourceCursor;
use crate::testing::{ChunkedStream, FailingStream, SilentStream};
use crate::{ByteStream, DiagnosticLog, Position};

type Step = (char, Position);

/// Decode `input` to the end, recording each character with its position.
fn scan<S: ByteStream>(input: S) -> (Vec<Step>, DiagnosticLog) {
    let mut cursor = SourceCursor::new(input, DiagnosticLog::new());
    let mut steps = Vec::new();
    loop {
        cursor.advance();
        let Some(ch) = cursor.ch() else { break };
        steps.push((ch, cursor.pos()));
    }
    (steps, cursor.into_sink())
}

fn at(ch: char, line: u32, col: u32) -> Step {
    (ch, Position::new(line, col))
}

fn cursor(input: &[u8]) -> SourceCursor<&[u8], DiagnosticLog> {
    SourceCursor::new(input, DiagnosticLog::new())
}

// === Initial State ===

#[test]
fn fresh_cursor_stages_blank_of_width_zero() {
    let cursor = cursor(b"x");
    assert_eq!(cursor.ch(), Some(' '));
    assert_eq!(cursor.width(), 0);
    assert_eq!(cursor.pos(), Position::new(1, 1));
    assert!(!cursor.in_segment());
}

#[test]
fn empty_input_is_immediately_eof() {
    let (steps, log) = scan(&b""[..]);
    assert!(steps.is_empty());
    assert!(log.is_empty());
}

// === Positions ===

#[test]
fn lines_and_columns() {
    let (steps, log) = scan(&b"ab\nc"[..]);
    assert_eq!(
        steps,
        vec![at('a', 1, 1), at('b', 1, 2), at('\n', 1, 3), at('c', 2, 1)]
    );
    assert!(log.is_empty());
}

#[test]
fn consecutive_newlines() {
    let (steps, _) = scan(&b"\n\nx"[..]);
    assert_eq!(steps, vec![at('\n', 1, 1), at('\n', 2, 1), at('x', 3, 1)]);
}

#[test]
fn columns_count_bytes() {
    let (steps, log) = scan("é€x".as_bytes());
    assert_eq!(steps, vec![at('é', 1, 1), at('€', 1, 3), at('x', 1, 6)]);
    assert!(log.is_empty());
}

#[test]
fn eof_position_follows_last_character() {
    let mut cursor = cursor(b"a\n");
    cursor.advance();
    cursor.advance();
    cursor.advance();
    assert!(cursor.is_eof());
    assert_eq!(cursor.width(), 0);
    assert_eq!(cursor.pos(), Position::new(2, 1));
}

#[test]
fn eof_is_stable() {
    let mut cursor = cursor(b"z");
    cursor.advance();
    cursor.advance();
    let pos = cursor.pos();
    for _ in 0..3 {
        cursor.advance();
        assert_eq!(cursor.ch(), None);
        assert_eq!(cursor.pos(), pos);
    }
    assert!(cursor.sink().is_empty());
}

// === Recoverable Errors ===

#[test]
fn nul_is_reported_and_skipped() {
    let (steps, log) = scan(&b"a\0b"[..]);
    assert_eq!(steps, vec![at('a', 1, 1), at('b', 1, 3)]);
    let diags: Vec<String> = log.iter().map(ToString::to_string).collect();
    assert_eq!(diags, vec!["1:2: invalid NUL character"]);
}

#[test]
fn leading_nul() {
    let (steps, log) = scan(&b"\0x"[..]);
    assert_eq!(steps, vec![at('x', 1, 2)]);
    assert_eq!(log.messages(), vec!["invalid NUL character"]);
}

#[test]
fn invalid_lead_byte_is_reported_and_skipped() {
    let (steps, log) = scan(&b"a\xFFb"[..]);
    assert_eq!(steps, vec![at('a', 1, 1), at('b', 1, 3)]);
    assert_eq!(log.messages(), vec!["invalid UTF-8 encoding"]);
    assert_eq!(log.iter().next().map(|d| d.pos), Some(Position::new(1, 2)));
}

#[test]
fn each_invalid_byte_is_reported() {
    let (steps, log) = scan(&b"\x80\x80!"[..]);
    assert_eq!(steps, vec![at('!', 1, 3)]);
    assert_eq!(log.len(), 2);
}

#[test]
fn truncated_sequence_at_eof() {
    // first two bytes of a three-byte character
    let (steps, log) = scan(&b"a\xE2\x82"[..]);
    assert_eq!(steps, vec![at('a', 1, 1)]);
    let positions: Vec<Position> = log.iter().map(|d| d.pos).collect();
    assert_eq!(positions, vec![Position::new(1, 2), Position::new(1, 3)]);
}

#[test]
fn literal_replacement_character_is_kept() {
    let (steps, log) = scan("\u{FFFD}".as_bytes());
    assert_eq!(steps, vec![at('\u{FFFD}', 1, 1)]);
    assert!(log.is_empty());
}

// === Byte-Order Marks ===

#[test]
fn leading_bom_is_silently_dropped() {
    let (steps, log) = scan("\u{FEFF}ab".as_bytes());
    assert_eq!(steps, vec![at('a', 1, 4), at('b', 1, 5)]);
    assert!(log.is_empty());
}

#[test]
fn interior_bom_is_reported_and_dropped() {
    let (steps, log) = scan("ab\u{FEFF}c".as_bytes());
    assert_eq!(steps, vec![at('a', 1, 1), at('b', 1, 2), at('c', 1, 6)]);
    let diags: Vec<String> = log.iter().map(ToString::to_string).collect();
    assert_eq!(diags, vec!["1:3: invalid BOM in the middle of the file"]);
}

#[test]
fn bom_at_start_of_later_line_is_reported() {
    let (steps, log) = scan("x\n\u{FEFF}y".as_bytes());
    assert_eq!(steps, vec![at('x', 1, 1), at('\n', 1, 2), at('y', 2, 4)]);
    assert_eq!(log.len(), 1);
    assert_eq!(log.iter().next().map(|d| d.pos), Some(Position::new(2, 1)));
}

#[test]
fn second_leading_bom_is_reported() {
    let (steps, log) = scan("\u{FEFF}\u{FEFF}k".as_bytes());
    assert_eq!(steps, vec![at('k', 1, 7)]);
    assert_eq!(log.messages(), vec!["invalid BOM in the middle of the file"]);
}

// === Input Failures ===

#[test]
fn silent_input_is_reported_once() {
    let stream = SilentStream::default();
    let reads = stream.reads.clone();
    let mut cursor = SourceCursor::new(stream, DiagnosticLog::new());

    cursor.advance();
    assert!(cursor.is_eof());
    assert_eq!(reads.get(), 10);

    for _ in 0..5 {
        cursor.advance();
    }
    assert_eq!(reads.get(), 10, "no reads after the stream gave up");

    let diags: Vec<String> = cursor.sink().iter().map(ToString::to_string).collect();
    assert_eq!(
        diags,
        vec!["1:1: I/O error: multiple Read calls return no data or error"]
    );
}

#[test]
fn read_failure_ends_input_after_one_report() {
    let stream = FailingStream::new(*b"ab", "disk on fire");
    let reads = stream.reads.clone();
    let (steps, log) = scan(stream);

    assert_eq!(steps, vec![at('a', 1, 1), at('b', 1, 2)]);
    let diags: Vec<String> = log.iter().map(ToString::to_string).collect();
    assert_eq!(diags, vec!["1:3: I/O error: disk on fire"]);
    assert_eq!(reads.get(), 2);
}

#[test]
fn closure_sink_receives_line_col_message() {
    let mut seen = Vec::new();
    {
        let mut cursor = SourceCursor::new(&b"\n\0"[..], |line: u32, col: u32, msg: &str| {
            seen.push(format!("{line}/{col}/{msg}"));
        });
        while {
            cursor.advance();
            !cursor.is_eof()
        } {}
    }
    assert_eq!(seen, vec!["2/1/invalid NUL character"]);
}

// === Refill Boundaries ===

#[test]
fn multibyte_characters_split_across_reads() {
    let text = "héllo wörld €";
    let (steps, log) = scan(ChunkedStream::new(text.as_bytes(), 1));
    let chars: String = steps.iter().map(|(ch, _)| *ch).collect();
    assert_eq!(chars, text);
    assert!(log.is_empty());
}

#[test]
fn large_input_without_segments() {
    let text: String = (0..20_000).map(|i| if i % 80 == 79 { '\n' } else { 'x' }).collect();
    let (steps, log) = scan(ChunkedStream::new(text.as_bytes(), 333));
    assert_eq!(steps.len(), text.len());
    assert_eq!(steps.last().map(|(_, pos)| *pos), Some(Position::new(250, 80)));
    assert!(log.is_empty());
}

// === Segments ===

#[test]
fn segment_excludes_current_character() {
    let mut cursor = cursor(b"foo bar");
    cursor.advance();
    cursor.start_segment();
    for _ in 0..3 {
        cursor.advance();
    }
    assert_eq!(cursor.ch(), Some(' '));
    assert_eq!(cursor.segment_text(), b"foo");
}

#[test]
fn segment_started_and_read_immediately_is_empty() {
    let mut cursor = cursor(b"q");
    cursor.advance();
    cursor.start_segment();
    assert_eq!(cursor.segment_text(), b"");
}

#[test]
fn segment_runs_to_eof() {
    let mut cursor = cursor("ident€".as_bytes());
    cursor.advance();
    cursor.start_segment();
    while !cursor.is_eof() {
        cursor.advance();
    }
    assert_eq!(cursor.segment_text(), "ident€".as_bytes());
}

#[test]
fn segment_keeps_skipped_bytes() {
    let mut cursor = cursor(b"a\0b;");
    cursor.advance();
    cursor.start_segment();
    cursor.advance();
    cursor.advance();
    assert_eq!(cursor.ch(), Some(';'));
    assert_eq!(cursor.segment_text(), b"a\0b");
}

#[test]
fn stop_segment_deactivates() {
    let mut cursor = cursor(b"ab");
    cursor.advance();
    cursor.start_segment();
    assert!(cursor.in_segment());
    cursor.stop_segment();
    assert!(!cursor.in_segment());
}

#[test]
#[should_panic(expected = "no active segment")]
fn segment_text_without_segment_panics() {
    let mut cursor = cursor(b"ab");
    cursor.advance();
    let _ = cursor.segment_text();
}

#[test]
fn segment_survives_buffer_growth() {
    let text: Vec<u8> = (0..50_000).map(|i| b'a' + (i % 26) as u8).collect();
    let mut cursor = SourceCursor::new(ChunkedStream::new(text.clone(), 1000), DiagnosticLog::new());
    cursor.advance();
    cursor.start_segment();
    while !cursor.is_eof() {
        cursor.advance();
    }
    assert_eq!(cursor.segment_text(), &text[..]);
}

#[test]
fn segment_survives_buffer_shift() {
    // consume most of the first buffer load before starting the segment
    let text: Vec<u8> = (0..6000).map(|i| b'0' + (i % 10) as u8).collect();
    let mut cursor = SourceCursor::new(&text[..], DiagnosticLog::new());
    for _ in 0..4000 {
        cursor.advance();
    }
    cursor.start_segment();
    for _ in 0..200 {
        cursor.advance();
    }
    assert_eq!(cursor.segment_text(), &text[3999..4199]);
}

// === Rewind ===

#[test]
fn rewind_undoes_one_character_of_lookahead() {
    let mut cursor = cursor(b"a.b");
    cursor.advance();
    cursor.advance();
    assert_eq!(cursor.ch(), Some('.'));
    cursor.start_segment();
    cursor.advance();
    assert_eq!(cursor.ch(), Some('b'));

    cursor.rewind();
    assert_eq!(cursor.ch(), Some('.'));
    assert_eq!(cursor.pos(), Position::new(1, 2));

    cursor.advance();
    assert_eq!(cursor.ch(), Some('b'));
    assert_eq!(cursor.pos(), Position::new(1, 3));
}

#[test]
fn rewind_two_characters() {
    let mut cursor = cursor(b"x..y");
    cursor.advance();
    cursor.advance();
    cursor.start_segment();
    cursor.advance();
    cursor.advance();
    assert_eq!(cursor.ch(), Some('y'));
    assert_eq!(cursor.segment_text(), b"..");

    cursor.rewind();
    assert_eq!(cursor.ch(), Some('.'));
    assert_eq!(cursor.pos(), Position::new(1, 2));
    assert_eq!(cursor.segment_text(), b"");
}

#[test]
fn rewind_at_line_start() {
    let mut cursor = cursor(b"q\n.x");
    for _ in 0..3 {
        cursor.advance();
    }
    cursor.start_segment();
    cursor.advance();
    cursor.rewind();
    assert_eq!(cursor.ch(), Some('.'));
    assert_eq!(cursor.pos(), Position::new(2, 1));
}

#[test]
fn rewind_with_newline_staged() {
    let mut cursor = cursor(b".\nz");
    cursor.advance();
    cursor.start_segment();
    cursor.advance();
    assert_eq!(cursor.ch(), Some('\n'));

    cursor.rewind();
    assert_eq!(cursor.ch(), Some('.'));
    assert_eq!(cursor.pos(), Position::new(1, 1));

    cursor.advance();
    cursor.advance();
    assert_eq!(cursor.ch(), Some('z'));
    assert_eq!(cursor.pos(), Position::new(2, 1));
}

#[test]
fn rewind_from_eof() {
    let mut cursor = cursor(b"ab");
    cursor.advance();
    cursor.start_segment();
    cursor.advance();
    cursor.advance();
    assert!(cursor.is_eof());

    cursor.rewind();
    assert_eq!(cursor.ch(), Some('a'));
    assert_eq!(cursor.pos(), Position::new(1, 1));
}

#[test]
fn rewind_over_multibyte_character() {
    let mut cursor = cursor("é.".as_bytes());
    cursor.advance();
    cursor.start_segment();
    cursor.advance();
    cursor.rewind();
    assert_eq!(cursor.ch(), Some('é'));
    assert_eq!(cursor.width(), 2);
    assert_eq!(cursor.pos(), Position::new(1, 1));
}

#[test]
#[should_panic(expected = "no active segment")]
fn rewind_without_segment_panics() {
    let mut cursor = cursor(b"ab");
    cursor.advance();
    cursor.rewind();
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "rewound segment contains a newline")]
fn rewind_across_newline_panics_in_debug() {
    let mut cursor = cursor(b"a\nb");
    cursor.advance();
    cursor.start_segment();
    cursor.advance();
    cursor.advance();
    cursor.rewind();
}

// === Property tests ===

mod proptest_cursor {
    use proptest::prelude::*;

    use super::{scan, SourceCursor};
    use crate::testing::ChunkedStream;
    use crate::{DiagnosticLog, Position};

    /// Expected positions for plain ASCII input.
    fn reference_positions(text: &str) -> Vec<(char, Position)> {
        let (mut line, mut col) = (1, 1);
        let mut out = Vec::new();
        for ch in text.chars() {
            out.push((ch, Position::new(line, col)));
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        out
    }

    proptest! {
        #[test]
        fn ascii_round_trips_with_positions(
            text in "[ -~\n]{0,300}",
            chunk in 1usize..64,
        ) {
            let (steps, log) = scan(ChunkedStream::new(text.as_bytes(), chunk));
            prop_assert_eq!(steps, reference_positions(&text));
            prop_assert!(log.is_empty());
        }

        #[test]
        fn segment_returns_consumed_bytes(
            text in "[a-z0-9 ]{1,200}",
            split in any::<prop::sample::Index>(),
            take in any::<prop::sample::Index>(),
        ) {
            let start = split.index(text.len());
            let n = take.index(text.len() - start + 1);
            let mut cursor = SourceCursor::new(text.as_bytes(), DiagnosticLog::new());
            for _ in 0..=start {
                cursor.advance();
            }
            cursor.start_segment();
            for _ in 0..n {
                cursor.advance();
            }
            prop_assert_eq!(cursor.segment_text(), &text.as_bytes()[start..start + n]);
        }

        #[test]
        fn rewind_restores_character_and_position(
            text in "[a-z.]{2,100}",
            at in any::<prop::sample::Index>(),
        ) {
            let k = at.index(text.len() - 1);
            let mut cursor = SourceCursor::new(text.as_bytes(), DiagnosticLog::new());
            for _ in 0..=k {
                cursor.advance();
            }
            let before = (cursor.ch(), cursor.pos());
            cursor.start_segment();
            cursor.advance();
            let next = (cursor.ch(), cursor.pos());

            cursor.rewind();
            prop_assert_eq!((cursor.ch(), cursor.pos()), before);
            cursor.advance();
            prop_assert_eq!((cursor.ch(), cursor.pos()), next);
        }
    }
}
