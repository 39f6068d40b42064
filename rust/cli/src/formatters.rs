//! Plain-text rendering of analysis results.

use handscope_engine::PositionGroupFrequencies;

/// Renders one row per group with aligned columns.
///
/// ```rust
/// use handscope_cli::formatters::format_frequency_table;
/// use handscope_engine::PositionGroupFrequencies;
///
/// let table = format_frequency_table(&PositionGroupFrequencies::default());
/// assert!(table.starts_with("GROUP"));
/// ```
pub fn format_frequency_table(frequencies: &PositionGroupFrequencies) -> String {
    let mut out = format!("{:<6} {:>6} {:>6} {:>8}\n", "GROUP", "OPPS", "RAISES", "FREQ");
    for group in frequencies.iter() {
        out.push_str(&format!(
            "{:<6} {:>6} {:>6} {:>7.1}%\n",
            group.label, group.opportunities, group.raises, group.frequency
        ));
    }
    out
}
