// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fingerprint digests.
//!
//! Browsers submit canvas, WebGL and font signals already reduced to a short
//! hex token. The reduction here is the same 31-multiplier checksum the
//! collection page runs in JavaScript, so any digest in a submitted record
//! can be re-derived on the server from the raw signal.
//!
//! The digest is a display and coarse deduplication token. It is not
//! collision resistant and must not be used to identify anyone.

/// Reduce `signal` to a lowercase hex digest.
///
/// Works over UTF-16 code units, the way `String.prototype.charCodeAt` sees
/// the string, with a wrapping 32-bit signed accumulator. The result is the
/// magnitude of the accumulator, so `"0"` for the empty string and
/// `"80000000"` when the accumulator lands on `i32::MIN`.
pub fn reduce(signal: &str) -> String {
    let acc = signal
        .encode_utf16()
        .fold(0i32, |acc, unit| {
            // (acc << 5) - acc + unit, in 32-bit two's complement
            (acc << 5).wrapping_sub(acc).wrapping_add(i32::from(unit))
        });
    format!("{:x}", acc.unsigned_abs())
}

/// Digest of a canvas capture, given its encoded data URL.
pub fn canvas_digest(data_url: &str) -> String {
    reduce(data_url)
}

/// Digest of WebGL capability strings (vendor, renderer, extensions, ...),
/// joined in the order supplied.
pub fn webgl_digest<S: AsRef<str>>(parts: &[S]) -> String {
    let joined: Vec<&str> = parts.iter().map(AsRef::as_ref).collect();
    reduce(&joined.join("|"))
}

/// Digest of the detected font list. Input order does not matter; names are
/// ordered by UTF-16 code units like `Array.prototype.sort`.
pub fn font_digest<S: AsRef<str>>(fonts: &[S]) -> String {
    let mut sorted: Vec<&str> = fonts.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
    reduce(&sorted.join(","))
}
