/// Contains constant values which are used as arguments to commands and in log messages.
pub mod constants;

/// Contains the error handling tooling.
pub mod error;

/// Contains macros.
pub(crate) mod macros;
