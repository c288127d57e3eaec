//! Raw transaction decoding for pasted base64 blobs
//!
//! A pasted blob is either a fully signed transaction
//! (`[num_sigs][sig; num_sigs][message]`) or a bare message. The two are told
//! apart by checking that the signature count prefix agrees with the
//! required-signatures field of the message header that would follow it.
//! This is a heuristic: a corrupted buffer can pass the check by accident.
//! The result feeds the inspector page only.

use anyhow::{anyhow, bail, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD as B64};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::types::DecodedTransaction;

/// Smallest plausible message: header (3) + account count (1) + fee payer
/// (32) + recent blockhash (32) + instruction count (1)
pub const MIN_MESSAGE_LENGTH: usize = 3 + 1 + 32 + 32 + 1;

pub const SIGNATURE_LENGTH: usize = 64;

const VERSION_PREFIX_MASK: u8 = 0x7f;

/// Decoder for unpadded input with trailing bits ignored. Padding is
/// stripped beforehand by [`decode_base64`].
const FORGIVING_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageVersion {
    Legacy,
    V(u8),
}

/// Read the message version from the first byte of a serialized message.
///
/// A set high bit marks a versioned message. An empty slice reads as
/// version 0, so a header that would start past the end of the buffer is
/// treated as versioned.
pub fn message_version(message: &[u8]) -> MessageVersion {
    match message.first() {
        Some(&prefix) if prefix & VERSION_PREFIX_MASK == prefix => MessageVersion::Legacy,
        Some(&prefix) => MessageVersion::V(prefix & VERSION_PREFIX_MASK),
        None => MessageVersion::V(0),
    }
}

/// Cheap alphabet check done before attempting a full decode
pub fn looks_like_base64(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=' || is_b64_space(b)
        })
}

fn is_b64_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

/// Decode base64 the way `atob` does: ASCII whitespace is dropped first,
/// then one or two trailing `=` only when the length is a multiple of 4.
/// Any other `=` is an error.
pub fn decode_base64(s: &str) -> Result<Vec<u8>> {
    let compact: String = s.chars().filter(|c| !c.is_ascii() || !is_b64_space(*c as u8)).collect();
    let unpadded = if compact.len() % 4 == 0 {
        compact
            .strip_suffix("==")
            .or_else(|| compact.strip_suffix('='))
            .unwrap_or(compact.as_str())
    } else {
        compact.as_str()
    };
    FORGIVING_B64
        .decode(unpadded.as_bytes())
        .map_err(|e| anyhow!("base64: {e}"))
}

/// Decode a base64 string into a transaction or bare message
pub fn decode_transaction_from_base64(input: &str) -> Option<DecodedTransaction> {
    match decode_base64(input) {
        Ok(buffer) => decode_transaction(&buffer, input),
        Err(e) => {
            log::debug!("not a transaction blob: {e}");
            None
        }
    }
}

/// Decode raw bytes. `original` is returned untouched as the message when
/// the buffer does not carry a self-consistent signature section.
pub fn decode_transaction(buffer: &[u8], original: &str) -> Option<DecodedTransaction> {
    match split_signatures(buffer) {
        Ok(Some((signatures, message))) => Some(DecodedTransaction {
            message: B64.encode(message),
            signatures: Some(signatures),
        }),
        Ok(None) => Some(DecodedTransaction {
            message: original.to_string(),
            signatures: None,
        }),
        Err(e) => {
            log::debug!("transaction decode rejected: {e}");
            None
        }
    }
}

/// `Ok(None)` means the buffer should be read as a bare message
fn split_signatures(buffer: &[u8]) -> Result<Option<(Vec<String>, &[u8])>> {
    if buffer.len() < MIN_MESSAGE_LENGTH {
        bail!(
            "buffer too short: {} bytes, need at least {MIN_MESSAGE_LENGTH}",
            buffer.len()
        );
    }

    // Single-byte compact length; counts >= 0x80 are not handled.
    let num_signatures = buffer[0];
    let required_offset = 1 + num_signatures as usize * SIGNATURE_LENGTH;

    let message = buffer.get(required_offset..).unwrap_or(&[]);
    let version_offset = match message_version(message) {
        MessageVersion::Legacy => 0,
        MessageVersion::V(_) => 1,
    };

    let required_signatures = buffer.get(required_offset + version_offset).copied();
    if required_signatures != Some(num_signatures) {
        return Ok(None);
    }

    let mut offset = 1;
    let mut signatures = Vec::with_capacity(num_signatures as usize);
    for _ in 0..num_signatures {
        let sig = buffer
            .get(offset..offset + SIGNATURE_LENGTH)
            .ok_or_else(|| anyhow!("signature at offset {offset} runs past the buffer"))?;
        signatures.push(bs58::encode(sig).into_string());
        offset += SIGNATURE_LENGTH;
    }

    Ok(Some((signatures, &buffer[offset..])))
}
