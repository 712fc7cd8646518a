//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `tariffs` exit codes.
//! Scripts rely on them, so a code never changes meaning once shipped.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain     | Description                                   |
//! |---------|------------|-----------------------------------------------|
//! | 0       | Universal  | Success                                       |
//! | 1       | Universal  | General error (unspecified)                   |
//! | 2       | Universal  | CLI usage error (bad args, unreadable rate)   |
//! | 3-9     | config     | Configuration could not be loaded or is bad   |
//! | 60-69   | verify     | Coverage checks                               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or input that cannot be interpreted.
/// clap's own argument errors also exit with 2.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Config (3-9)
// =============================================================================

/// Config file missing (when given explicitly), unparseable or invalid,
/// or an environment override holds a bad value.
pub const EXIT_CONFIG: u8 = 3;

// =============================================================================
// Verify (60-69)
// =============================================================================

/// At least one checked country resolved to "No Data".
pub const EXIT_VERIFY_FAILED: u8 = 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_CONFIG, EXIT_VERIFY_FAILED];
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }
}
