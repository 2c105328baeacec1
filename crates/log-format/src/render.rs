//! Frame-to-text rendering

use crate::line::LogLine;
use can_source::CanFrame;
use std::fmt::Write;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Render one frame into a log line
///
/// Format: `(<timestamp %.6f>) can <id %03X>#<payload as uppercase hex
/// pairs>` plus a trailing newline. When the fixed line capacity would be
/// exceeded the hex sequence is truncated at a pair boundary; the newline
/// is always preserved.
pub fn render_frame(frame: &CanFrame) -> LogLine {
    let mut line = LogLine::new();

    // The prefix fits for any 29-bit id; overflow would only truncate
    let _ = write!(line, "({:.6}) can {:03X}#", frame.timestamp, frame.id);

    for &byte in frame.payload() {
        // Keep room for the pair and the newline
        if line.remaining() < 3 {
            break;
        }
        line.push_byte(HEX[(byte >> 4) as usize]);
        line.push_byte(HEX[(byte & 0x0F) as usize]);
    }

    line.terminate();
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LINE_CAPACITY;
    use proptest::prelude::*;

    fn frame_at(id: u32, payload: &[u8], timestamp: f64) -> CanFrame {
        let mut frame = CanFrame::new(id, payload);
        frame.timestamp = timestamp;
        frame
    }

    #[test]
    fn test_reference_line() {
        let frame = frame_at(0x1A3, &[0x01, 0x02, 0xFF], 1755839945.123456);
        let line = render_frame(&frame);
        assert_eq!(line.as_str(), "(1755839945.123456) can 1A3#0102FF\n");
    }

    #[test]
    fn test_single_byte_payload() {
        let frame = frame_at(0x010, &[0xAA], 1755839945.000001);
        let line = render_frame(&frame);
        assert_eq!(line.as_str(), "(1755839945.000001) can 010#AA\n");
    }

    #[test]
    fn test_full_payload_truncates_at_pair_boundary() {
        let frame = frame_at(0x1A3, &[0xFF; 8], 1755839945.123456);
        let line = render_frame(&frame);

        assert!(line.len() <= LINE_CAPACITY);
        assert_eq!(line.as_bytes().last(), Some(&b'\n'));

        // Hex section must hold whole pairs only
        let text = line.as_str().trim_end_matches('\n');
        let hex = text.split('#').nth(1).unwrap();
        assert_eq!(hex.len() % 2, 0);
        assert_eq!(hex, "FFFFFFFF"); // 4 of 8 bytes fit at this timestamp width
    }

    #[test]
    fn test_extended_id_renders_wide() {
        let frame = frame_at(0x1FFF_FFFF, &[0x01], 1755839945.123456);
        let line = render_frame(&frame);
        assert!(line.as_str().contains("can 1FFFFFFF#"));
        assert_eq!(line.as_bytes().last(), Some(&b'\n'));
    }

    #[test]
    fn test_short_id_zero_padded() {
        let frame = frame_at(0x1, &[0x01], 1755839945.123456);
        let line = render_frame(&frame);
        assert!(line.as_str().contains("can 001#"));
    }

    proptest! {
        #[test]
        fn prop_line_invariants(
            id in 0u32..=0x1FFF_FFFF,
            payload in proptest::collection::vec(any::<u8>(), 0..=8),
            timestamp in 0.0f64..4_000_000_000.0,
        ) {
            let frame = frame_at(id, &payload, timestamp);
            let line = render_frame(&frame);

            // Never exceeds capacity, always a single trailing newline
            prop_assert!(line.len() <= LINE_CAPACITY);
            prop_assert_eq!(line.as_bytes().last(), Some(&b'\n'));
            prop_assert_eq!(
                line.as_bytes().iter().filter(|&&b| b == b'\n').count(),
                1
            );

            // Hex payload is truncated at pair boundaries only
            let text = line.as_str().trim_end_matches('\n');
            let hex = text.split('#').nth(1).unwrap_or("");
            prop_assert_eq!(hex.len() % 2, 0);
            prop_assert!(hex.len() / 2 <= payload.len());
        }
    }
}
