//! Build-time configuration for the template engine
//!
//! None of these values can be changed at runtime. Rebuild the crate to
//! change the grammar markers or the engine limits.

/// Placeholder delimiter, opening and closing
pub const DELIMITER: &str = "@@";

/// Prefix marking a comment line when it appears at column 1
pub const IGNORE_PREFIX: &str = "%%";

/// Maximum length of a placeholder identifier, delimiters excluded
pub const MAX_PLACEHOLDER_LENGTH: usize = 32;

/// Maximum number of placeholder expansions open at the same time
pub const MAX_NESTING_LEVEL: usize = 100;

/// Initial capacity of the output buffer in bytes
pub const OUTPUT_SIZE_INITIAL: usize = 4 * 1024;

/// Minimum number of bytes the output buffer grows by
pub const OUTPUT_SIZE_INCREMENT: usize = 4 * 1024;

/// Context stack capacity used when zero is requested
pub const DEFAULT_STACK_SIZE: usize = 100;

/// Absolute ceiling on the number of frames a context stack may hold
pub const MAXIMUM_STACK_SIZE: usize = u32::MAX as usize;

/// The compiled-in placeholder delimiter. Factory setting is `@@`.
pub fn delimiter() -> &'static str {
    DELIMITER
}

/// The compiled-in comment line prefix. Factory setting is `%%`.
pub fn ignore_prefix() -> &'static str {
    IGNORE_PREFIX
}

/// The compiled-in maximum identifier length. Factory setting is 32.
pub fn max_placeholder_length() -> usize {
    MAX_PLACEHOLDER_LENGTH
}

/// The compiled-in maximum nesting level. Factory setting is 100.
pub fn max_nesting_level() -> usize {
    MAX_NESTING_LEVEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_settings() {
        assert_eq!(delimiter(), "@@");
        assert_eq!(ignore_prefix(), "%%");
        assert_eq!(max_placeholder_length(), 32);
        assert_eq!(max_nesting_level(), 100);
    }

    #[test]
    fn test_stack_can_hold_every_nesting_level() {
        assert!(DEFAULT_STACK_SIZE >= MAX_NESTING_LEVEL);
        assert!(MAXIMUM_STACK_SIZE >= DEFAULT_STACK_SIZE);
    }
}
