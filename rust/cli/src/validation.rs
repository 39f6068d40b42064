//! Range checks for `rfi` filter arguments.

use handscope_engine::Filters;

/// Checks that every bound is finite and non-negative and that each lower
/// bound does not exceed its upper bound.
///
/// # Example
///
/// ```rust
/// # use handscope_cli::validation::validate_filters;
/// use handscope_engine::Filters;
///
/// assert!(validate_filters(&Filters::default()).is_ok());
/// let inverted = Filters { min_bb: 50.0, ..Filters::default() };
/// assert!(validate_filters(&inverted).is_err());
/// ```
pub fn validate_filters(filters: &Filters) -> Result<(), String> {
    for (name, value) in [
        ("min-bb", filters.min_bb),
        ("max-bb", filters.max_bb),
        ("min-bet-bb", filters.min_bet_bb),
        ("max-bet-bb", filters.max_bet_bb),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("--{} must be a non-negative number, got {}", name, value));
        }
    }
    if filters.min_bb > filters.max_bb {
        return Err("--min-bb must not exceed --max-bb".into());
    }
    if filters.min_bet_bb > filters.max_bet_bb {
        return Err("--min-bet-bb must not exceed --max-bet-bb".into());
    }
    if filters.min_seat > filters.max_seat {
        return Err("--min-seat must not exceed --max-seat".into());
    }
    Ok(())
}
