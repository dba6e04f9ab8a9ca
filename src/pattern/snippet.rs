//! C source snippet for embedding the expected digest in firmware

use super::Sha256Digest;
use std::fmt::Write;

/// Render the firmware-side constant, pattern generator and compare function
/// for a `size`-byte pattern hashing to `expected`.
pub fn render_c_snippet(expected: &Sha256Digest, size: usize) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "/* Expected SHA256 hash for {} test data */", describe_size(size));
    let _ = writeln!(out, "#define EXPECTED_SHA256_HASH \\");
    let _ = writeln!(out, "    \"{}\"", expected.to_hex());
    out.push('\n');

    out.push_str(
        "/* Test data generation function */
static void generate_test_data(uint8_t *buf, size_t len, size_t offset)
{
    for (size_t i = 0; i < len; i++) {
        buf[i] = (uint8_t)((offset + i) & 0xFF);
    }
}

/* Verification function */
static int verify_sha256_hash(const char *computed_hash)
{
    return strcmp(computed_hash, EXPECTED_SHA256_HASH) == 0 ? 0 : -1;
}
",
    );

    out
}

fn describe_size(size: usize) -> String {
    if size >= 1024 && size % 1024 == 0 {
        format!("{}KB", size / 1024)
    } else {
        format!("{}-byte", size)
    }
}
