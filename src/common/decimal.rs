// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Fixed-point codec between [`Decimal`] values and the on-chain
//! (mantissa, scale, neg) triple.
//!
//! The program stores decimals as an unsigned 128-bit mantissa with a small
//! non-negative scale. Encoding truncates toward zero to at most
//! [`MAX_FRACTIONAL_DIGITS`] fractional digits; this precision loss is the
//! defined storage policy, not an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::FeedError,
    snapshot::{FieldMap, FieldValue},
};

/// Maximum fractional digits representable by the on-chain triple.
pub const MAX_FRACTIONAL_DIGITS: u32 = 9;

/// The on-chain fixed-point representation of a decimal value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerDecimal {
    /// Unsigned mantissa digits.
    pub mantissa: u128,
    /// Number of fractional digits (never negative in the target domain).
    pub scale: u8,
    /// Whether the encoded value is negative.
    pub neg: bool,
}

impl LedgerDecimal {
    /// Creates a new [`LedgerDecimal`] from raw parts.
    pub fn new(mantissa: u128, scale: u8, neg: bool) -> Self {
        Self {
            mantissa,
            scale,
            neg,
        }
    }

    /// Encodes a decimal value into its on-chain triple.
    ///
    /// Values with more than [`MAX_FRACTIONAL_DIGITS`] fractional digits are
    /// truncated toward zero; trailing zero digits are normalized away so the
    /// scale is the minimal number of fractional digits needed.
    pub fn from_decimal(value: Decimal) -> Self {
        let truncated = value.trunc_with_scale(MAX_FRACTIONAL_DIGITS).normalize();
        let mantissa = truncated.mantissa().unsigned_abs();
        Self {
            mantissa,
            scale: truncated.scale() as u8,
            neg: truncated.is_sign_negative() && mantissa != 0,
        }
    }

    /// Decodes the triple back into a decimal value (`mantissa / 10^scale`,
    /// negated when `neg`).
    ///
    /// # Errors
    ///
    /// Returns an error if the mantissa exceeds the local numeric range. The
    /// remote domain is 128-bit; out-of-range reads are surfaced rather than
    /// silently truncated.
    pub fn to_decimal(&self) -> Result<Decimal, FeedError> {
        let mantissa = i128::try_from(self.mantissa).map_err(|_| {
            FeedError::decode(format!(
                "mantissa {} exceeds representable decimal range",
                self.mantissa
            ))
        })?;
        let mut value = Decimal::try_from_i128_with_scale(mantissa, u32::from(self.scale))
            .map_err(|e| {
                FeedError::decode(format!(
                    "cannot represent mantissa {} at scale {}: {e}",
                    self.mantissa, self.scale
                ))
            })?;
        if self.neg {
            value.set_sign_negative(true);
        }
        Ok(value)
    }

    /// Constructs a triple from an externally supplied field map.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::MissingField`] if any of `mantissa`, `scale` or
    /// `neg` is absent, or a decode error if a field has the wrong shape.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, FeedError> {
        let mantissa = match fields
            .get("mantissa")
            .ok_or_else(|| FeedError::missing_field("mantissa"))?
        {
            FieldValue::Number(n) => u128::from(*n),
            FieldValue::Text(s) => s
                .parse::<u128>()
                .map_err(|e| FeedError::decode(format!("invalid mantissa `{s}`: {e}")))?,
            other => {
                return Err(FeedError::decode(format!(
                    "unexpected mantissa encoding: {other:?}"
                )));
            }
        };
        let scale = fields
            .get("scale")
            .ok_or_else(|| FeedError::missing_field("scale"))?
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(|| FeedError::decode("invalid scale encoding"))?;
        let neg = fields
            .get("neg")
            .ok_or_else(|| FeedError::missing_field("neg"))?
            .as_bool()
            .ok_or_else(|| FeedError::decode("invalid neg encoding"))?;
        Ok(Self {
            mantissa,
            scale,
            neg,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
