//! CLI Exit Code Registry
//!
//! Single source of truth for `meddebt` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad args, unknown built-in list)            |
//! | 3    | Invalid session config (parse or validation failure)     |
//! | 4    | Runtime error (unreadable input, unwritable output)      |
//! | 5    | Partial: session finished but one or more runs failed    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown names.
pub const EXIT_USAGE: u8 = 2;

/// Config could not be parsed or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// IO failure reading tables/term files or writing outputs, or an engine
/// error that stopped the whole session.
pub const EXIT_RUNTIME: u8 = 4;

/// Every collection ran, but at least one run or labeled table failed.
/// Reports and outputs for the successful runs were still produced.
pub const EXIT_PARTIAL: u8 = 5;
