//! UI helper functions for terminal output formatting.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_errors_and_warnings() {
        let mut buf = Vec::new();
        write_error(&mut buf, "input required").unwrap();
        display_warning(&mut buf, "no hands found").unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Error: input required\nWARNING: no hands found\n"
        );
    }
}
