//! Transcript file reading with transparent `.zst` decompression.

/// Upper bound for a decompressed transcript.
const MAX_DECOMPRESSED_BYTES: usize = 256 * 1024 * 1024;

/// Read text file with automatic .zst decompression detection.
///
/// A leading UTF-8 BOM is stripped.
///
/// # Example
///
/// ```rust,no_run
/// # use handscope_cli::io_utils::read_text_auto;
/// let plain = read_text_auto("session.txt").unwrap();
/// let compressed = read_text_auto("session.txt.zst").unwrap();
/// ```
pub fn read_text_auto(path: &str) -> Result<String, String> {
    let mut content = if path.ends_with(".zst") {
        let comp = std::fs::read(path).map_err(|e| format!("{}: {}", path, e))?;
        let dec = zstd::bulk::decompress(&comp, MAX_DECOMPRESSED_BYTES)
            .map_err(|e| format!("{}: {}", path, e))?;
        String::from_utf8(dec).map_err(|_| format!("{}: not valid UTF-8 text", path))?
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?
    };
    strip_utf8_bom(&mut content);
    Ok(content)
}

fn strip_utf8_bom(s: &mut String) {
    const UTF8_BOM: &str = "\u{feff}";
    if s.starts_with(UTF8_BOM) {
        s.drain(..UTF8_BOM.len());
    }
}
