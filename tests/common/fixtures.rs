//! Deterministic test data

/// `len` bytes cycling through 0..=255
#[allow(dead_code)]
pub fn byte_ramp(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 256) as u8).collect()
}

/// A text file whose first line is a banner of 70 slashes, like a source file
/// header, followed by `lines` numbered lines
#[allow(dead_code)]
pub fn banner_text(name: &str, lines: usize) -> String {
    let mut text = "/".repeat(70);
    text.push('\n');
    text.push_str(&format!("//  {name}\n"));
    for i in 0..lines {
        text.push_str(&format!("line {i:05}: the quick brown fox jumps over the lazy dog\n"));
    }
    text
}
