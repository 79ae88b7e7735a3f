//! Macro for implementing Display and FromStr for unit enums
//!
//! Used for small state enums that appear in logs and configuration.
//!
//! # Example
//!
//! ```rust
//! use finalizer_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum DrainMode {
//!     Drain,
//!     Discard,
//! }
//!
//! impl_domain_status_conversions!(DrainMode {
//!     Drain => "drain",
//!     Discard => "discard",
//! });
//!
//! assert_eq!(DrainMode::Drain.to_string(), "drain");
//! assert_eq!("DISCARD".parse::<DrainMode>(), Ok(DrainMode::Discard));
//! ```

/// Implements Display and FromStr traits for unit enums
///
/// Display writes the mapped lowercase string. FromStr parses it back
/// case-insensitively and reports the enum name on failure.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
