//! Macro for implementing Display and FromStr for status enums
//!
//! Remote services report lifecycle states as loosely-cased strings; this
//! macro gives a status enum one canonical lowercase rendering and a
//! case-insensitive parser.
//!
//! # Example
//!
//! ```rust
//! use casesync_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ReviewState {
//!     Draft,
//!     Approved,
//! }
//!
//! impl_domain_status_conversions!(ReviewState {
//!     Draft => "draft",
//!     Approved => "approved",
//! });
//!
//! assert_eq!(ReviewState::Approved.to_string(), "approved");
//! assert_eq!("DRAFT".parse::<ReviewState>().unwrap(), ReviewState::Draft);
//! ```

/// Implements Display and FromStr traits for status enums
///
/// - Display writes the mapped string
/// - FromStr lowercases its input before matching and names the enum in the
///   error message
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
