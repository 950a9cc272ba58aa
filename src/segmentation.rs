// Long-message segmentation (Section 4.9 / Design Note "Global mutable state").
//
// A UCS-2 payload longer than 140 bytes is split into chunks of at most 134
// bytes, each one prefixed with a 6-byte GSM User Data Header that lets the
// handset concatenate the segments back together. The UDH reference byte is
// process-wide; it is represented here as a single atomic counter with a
// defined wraparound at 256, rather than the cyclic channel-based generator
// the design note flags as unwanted coupling.

use std::sync::atomic::{AtomicU8, Ordering};

/// Single-segment threshold and per-segment chunk size, in bytes of UCS-2 payload.
const SINGLE_SEGMENT_MAX: usize = 140;
const CHUNK_SIZE: usize = 134;
const UDH_LEN: usize = 6;

static UDH_REFERENCE: AtomicU8 = AtomicU8::new(0);

fn next_udh_reference() -> u8 {
    UDH_REFERENCE.fetch_add(1, Ordering::Relaxed)
}

/// One outgoing wire segment: a 6-byte UDH followed by its chunk of UCS-2 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub bytes: Vec<u8>,
    pub reference: u8,
    pub sequence: u8,
    pub total: u8,
}

/// Splits a UCS-2 (big-endian) payload into wire segments.
///
/// If `payload` is 140 bytes or fewer, returns a single segment with no UDH
/// prefix. Otherwise returns `ceil(len / 134)` segments, each headed by
/// `05 00 03 <ref> <total> <seq>` with a shared reference byte.
pub fn segment_ucs2(payload: &[u8]) -> Vec<Segment> {
    if payload.len() <= SINGLE_SEGMENT_MAX {
        return vec![Segment {
            bytes: payload.to_vec(),
            reference: 0,
            sequence: 1,
            total: 1,
        }];
    }

    let total = payload.len().div_ceil(CHUNK_SIZE) as u8;
    let reference = next_udh_reference();

    payload
        .chunks(CHUNK_SIZE)
        .enumerate()
        .map(|(index, chunk)| {
            let sequence = (index + 1) as u8;
            let mut bytes = Vec::with_capacity(UDH_LEN + chunk.len());
            bytes.extend_from_slice(&[0x05, 0x00, 0x03, reference, total, sequence]);
            bytes.extend_from_slice(chunk);
            Segment {
                bytes,
                reference,
                sequence,
                total,
            }
        })
        .collect()
}

/// Splits UTF-8 text into UCS-2 wire segments in one step.
pub fn segment_text(text: &str) -> Vec<Segment> {
    segment_ucs2(&crate::text::utf8_to_ucs2(text))
}

/// True if `segments` carries more than one piece and therefore needs the
/// esm_class UDH flag and data_coding UCS-2 set on every outgoing submit_sm.
pub fn is_concatenated(segments: &[Segment]) -> bool {
    segments.len() > 1
}
