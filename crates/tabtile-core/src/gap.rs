//! Tile gap derivation

/// Gap used in minimal mode when the user has not picked one.
pub const MINIMAL_MODE_GAP_SIZE: f64 = 2.0;

/// Effective gap between tiles.
///
/// Minimal mode tightens the default gap to `minimal_default`; an explicit
/// setting always wins and is passed on untouched, and outside minimal mode
/// an unset gap stays unset so the layout engine applies its own default.
pub fn effective_gap_size(
    minimal_mode: bool,
    configured: Option<f64>,
    minimal_default: f64,
) -> Option<f64> {
    match configured {
        None if minimal_mode => Some(minimal_default),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(minimal_mode: bool, configured: Option<f64>) -> Option<f64> {
        effective_gap_size(minimal_mode, configured, MINIMAL_MODE_GAP_SIZE)
    }

    #[test]
    fn test_effective_gap_size() {
        assert_eq!(gap(true, None), Some(2.0));
        assert_eq!(gap(true, Some(8.0)), Some(8.0));
        assert_eq!(gap(false, None), None);
        assert_eq!(gap(false, Some(5.0)), Some(5.0));
    }

    #[test]
    fn test_configured_gap_is_verbatim() {
        assert_eq!(gap(true, Some(2.4)), Some(2.4));
        assert_eq!(gap(true, Some(0.4)), Some(0.4));
        assert_eq!(gap(true, Some(0.0)), Some(0.0));
        assert_eq!(gap(true, Some(-1.0)), Some(-1.0));
        assert_eq!(gap(false, Some(-1.0)), Some(-1.0));
    }

    #[test]
    fn test_minimal_default_is_configurable() {
        assert_eq!(effective_gap_size(true, None, 4.0), Some(4.0));
        assert_eq!(effective_gap_size(false, None, 4.0), None);
        assert_eq!(effective_gap_size(true, Some(1.0), 4.0), Some(1.0));
    }
}
