//! # IDLENUM Big-Number Core
//!
//! Tapered big-number arithmetic for idle-game economies.
//!
//! Currency magnitudes in an idle game blow past every native numeric type
//! within hours of play. [`BigNumber`] stores such values as
//! `mantissa * 10^exponent` with the mantissa held inside a fixed
//! significant-digit window, and renormalizes after every operation. The
//! design trades exactness for constant-size values: digits that fall out
//! of the window are gone, deliberately and silently.
//!
//! ## Design Principles
//!
//! 1. **One core, two precisions** - a single generic implementation over
//!    the [`Real`] backing primitive; [`BigDecimal`] carries 15 significant
//!    digits on an exact decimal, [`BigDouble`] carries 12 on an `f64`.
//! 2. **Pure operations** - arithmetic never mutates an operand; every
//!    result is a freshly normalized value.
//! 3. **Errors are values** - fallible operations return
//!    [`NumericResult`]; operator forms degrade the way a game loop wants
//!    (divide by zero hands back the dividend) and warn through `tracing`.
//! 4. **Strings are contracts** - plain digit strings, `d.ddE+n`
//!    scientific notation, and the open-ended K/M/B/T/AA/... magnitude
//!    suffixes parse and render bit-exactly.
//!
//! ## Example
//!
//! ```rust,ignore
//! use idlenum::BigDecimal;
//!
//! let gold: BigDecimal = "1.5AA".parse()?;         // 1.5 * 10^15
//! let interest = gold * 2i64 + 500_000i64;
//! assert_eq!(interest.to_suffix_string(), "3AA");
//! assert_eq!(interest.to_scientific_string(), "3E+15");
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod arith;
mod convert;
pub mod error;
pub mod format;
pub mod real;
pub mod value;

pub use error::{NumericError, NumericResult};
pub use format::{exponent_to_unit, unit_to_exponent};
pub use real::Real;
pub use value::{BigDecimal, BigDouble, BigNumber};
