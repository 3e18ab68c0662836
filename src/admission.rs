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

//! Update-admission decision: is a candidate observation different enough
//! (or the stored value old enough) to justify publishing an update?
//!
//! The variance test normalizes the ratio of stored to candidate value with
//! a two-step reciprocal. The exact two-step form is load-bearing: its
//! behavior at extreme same-sign magnitude ratios is part of the program's
//! observable contract and must not be simplified to a relative-difference
//! formula.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{error::FeedError, snapshot::Snapshot};

/// The aggregate state consulted by the admission decision, decoded from an
/// aggregator snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdmissionState {
    /// The currently stored aggregate value.
    pub latest_value: Decimal,
    /// Unix seconds of the last accepted update.
    pub latest_timestamp: u64,
    /// Seconds after which an update is published regardless of magnitude.
    pub force_report_period: u64,
    /// Minimum proportional change required outside the force window.
    pub variance_threshold: Decimal,
}

impl AdmissionState {
    /// Decodes the admission inputs from a materialized aggregator snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is absent or malformed.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, FeedError> {
        let update_data = Snapshot::new(snapshot.get_map("update_data")?.clone());
        Ok(Self {
            latest_value: update_data.get_decimal("latest_result")?.to_decimal()?,
            latest_timestamp: update_data.get_u64("latest_timestamp")?,
            force_report_period: snapshot.get_u64("force_report_period")?,
            variance_threshold: snapshot.get_decimal("variance_threshold")?.to_decimal()?,
        })
    }
}

/// Decides whether `candidate`, observed at `now_secs`, should be published.
///
/// Returns `true` when the force-report period has elapsed, when the value
/// crossed zero, or when the proportional change exceeds the variance
/// threshold.
///
/// # Errors
///
/// Returns [`FeedError::Numeric`] if a ratio cannot be computed (division by
/// zero or overflow); callers own the policy for that case.
pub fn should_report(
    candidate: Decimal,
    now_secs: u64,
    state: &AdmissionState,
) -> Result<bool, FeedError> {
    if state
        .latest_timestamp
        .saturating_add(state.force_report_period)
        < now_secs
    {
        return Ok(true);
    }

    let mut ratio = checked_div(state.latest_value, candidate)?;
    if ratio.abs() > Decimal::ONE {
        ratio = checked_div(candidate, state.latest_value)?;
    }
    // Percentage variance is not meaningful across a zero crossing.
    if ratio < Decimal::ZERO {
        return Ok(true);
    }
    let change = Decimal::ONE - ratio;
    Ok(change > state.variance_threshold)
}

/// Current wall-clock time as unix seconds, for use as `now_secs`.
pub fn unix_now_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

fn checked_div(numerator: Decimal, denominator: Decimal) -> Result<Decimal, FeedError> {
    numerator.checked_div(denominator).ok_or_else(|| {
        FeedError::numeric(format!("cannot compute {numerator} / {denominator}"))
    })
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
