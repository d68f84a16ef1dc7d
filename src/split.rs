// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Cost distribution engine.
//!
//! [`compute`] splits a total amount among participants according to a
//! [`SplitKind`]:
//!
//! - **Equal**: everyone pays the same share; the first participant absorbs
//!   the rounding residual so the shares sum back to the total.
//! - **Percentage**: each participant pays a caller-supplied percentage of
//!   the total; the percentages must sum to exactly 100.00.
//! - **Fixed**: each participant has a nominal contribution; contributions
//!   are scaled proportionally onto the actual total (e.g. after a
//!   discount), and must at least cover it.
//!
//! The computation is pure and stateless: no I/O, no shared state, safe to
//! call from any number of threads at once.
//!
//! # Example
//!
//! ```
//! use billsplit_rs::{SplitKind, UserId, split};
//! use rust_decimal_macros::dec;
//!
//! let users = [UserId(1), UserId(2), UserId(3)];
//! let result = split::compute(SplitKind::Equal, dec!(100.00), &users, None).unwrap();
//!
//! assert_eq!(result.amount(&UserId(1)), Some(dec!(33.34)));
//! assert_eq!(result.amount(&UserId(2)), Some(dec!(33.33)));
//! assert_eq!(result.total(), dec!(100.00));
//! ```

use crate::base::UserId;
use crate::error::DistributionError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Money amounts are rounded to currency minor units (cents).
///
/// `round_dp` uses banker's rounding, which is also what the two-decimal
/// amounts in stored bills use.
const MONEY_PRECISION: u32 = 2;

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Distribution mode selector.
///
/// Parsed from user-facing strings (`"equal"`, `"percentage"`, `"fixed"`)
/// at the input boundary; inside the engine it is dispatched with a plain
/// `match`, so adding a mode means adding a variant and one arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    Equal,
    Percentage,
    Fixed,
}

impl SplitKind {
    /// Whether this mode requires per-participant parameters.
    pub fn requires_params(&self) -> bool {
        !matches!(self, SplitKind::Equal)
    }
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SplitKind::Equal => "equal",
            SplitKind::Percentage => "percentage",
            SplitKind::Fixed => "fixed",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SplitKind {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "equal" => Ok(SplitKind::Equal),
            "percentage" => Ok(SplitKind::Percentage),
            "fixed" => Ok(SplitKind::Fixed),
            _ => Err(DistributionError::UnknownMode(s.to_string())),
        }
    }
}

/// Result of a distribution: one owed amount per requested participant,
/// in the caller's order.
///
/// Order is part of the contract. Equal mode gives the rounding residual to
/// the first participant, so `[3, 1, 2]` and `[1, 2, 3]` produce different
/// mappings for the same total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Distribution {
    shares: Vec<(UserId, Decimal)>,
}

impl Distribution {
    fn with_capacity(capacity: usize) -> Self {
        Distribution {
            shares: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, user_id: UserId, amount: Decimal) {
        self.shares.push((user_id, amount));
    }

    /// Amount owed by a participant, or `None` if they were not part of
    /// this distribution.
    pub fn amount(&self, user_id: &UserId) -> Option<Decimal> {
        self.shares
            .iter()
            .find(|(user, _)| user == user_id)
            .map(|(_, amount)| *amount)
    }

    /// Sum of all owed amounts.
    pub fn total(&self) -> Decimal {
        self.shares.iter().map(|(_, amount)| *amount).sum()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Iterates shares in the participant order given to [`compute`].
    pub fn iter(&self) -> impl Iterator<Item = (UserId, Decimal)> + '_ {
        self.shares.iter().copied()
    }
}

impl IntoIterator for Distribution {
    type Item = (UserId, Decimal);
    type IntoIter = std::vec::IntoIter<(UserId, Decimal)>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.into_iter()
    }
}

/// Splits `total_amount` among `participants` according to `kind`.
///
/// `params` maps each participant to their percentage share (Percentage
/// mode) or nominal fixed contribution (Fixed mode). Equal mode ignores it.
/// An empty map counts as absent.
///
/// # Errors
///
/// - [`DistributionError::InvalidAmount`] - Total or a parameter value is negative.
/// - [`DistributionError::InvalidParticipants`] - Empty or duplicated participant list.
/// - [`DistributionError::MissingParameters`] - Mode requires params, none given.
/// - [`DistributionError::MissingParticipantParameter`] - A participant has no param entry.
/// - [`DistributionError::PercentageSumInvalid`] - Percentages do not sum to 100.00.
/// - [`DistributionError::InsufficientFixedTotal`] - Fixed amounts cannot cover the total.
pub fn compute(
    kind: SplitKind,
    total_amount: Decimal,
    participants: &[UserId],
    params: Option<&HashMap<UserId, Decimal>>,
) -> Result<Distribution, DistributionError> {
    if total_amount < Decimal::ZERO {
        return Err(DistributionError::InvalidAmount);
    }
    validate_participants(participants)?;

    match kind {
        SplitKind::Equal => Ok(split_equal(total_amount, participants)),
        SplitKind::Percentage => {
            let shares = require_params(participants, params)?;
            split_percentage(total_amount, participants, &shares)
        }
        SplitKind::Fixed => {
            let amounts = require_params(participants, params)?;
            split_fixed(total_amount, participants, &amounts)
        }
    }
}

fn validate_participants(participants: &[UserId]) -> Result<(), DistributionError> {
    if participants.is_empty() {
        return Err(DistributionError::InvalidParticipants);
    }

    let mut seen = HashSet::with_capacity(participants.len());
    for user_id in participants {
        if !seen.insert(user_id) {
            return Err(DistributionError::InvalidParticipants);
        }
    }
    Ok(())
}

/// Extracts one parameter value per participant, in participant order.
fn require_params(
    participants: &[UserId],
    params: Option<&HashMap<UserId, Decimal>>,
) -> Result<Vec<Decimal>, DistributionError> {
    let params = match params {
        Some(map) if !map.is_empty() => map,
        _ => return Err(DistributionError::MissingParameters),
    };

    let mut values = Vec::with_capacity(participants.len());
    for user_id in participants {
        let value = params
            .get(user_id)
            .copied()
            .ok_or(DistributionError::MissingParticipantParameter(*user_id))?;
        if value < Decimal::ZERO {
            return Err(DistributionError::InvalidAmount);
        }
        values.push(value);
    }
    Ok(values)
}

/// Equal split: everyone pays `round(total / n)`.
///
/// Equal division can leave a residual cent (100.00 / 3 = 33.33 each,
/// leaving 0.01). The residual is added entirely to the first participant,
/// never spread over several.
fn split_equal(total_amount: Decimal, participants: &[UserId]) -> Distribution {
    let count = Decimal::from(participants.len() as u64);
    let share = (total_amount / count).round_dp(MONEY_PRECISION);

    let distributed = share * count;
    let residual = (total_amount - distributed).round_dp(MONEY_PRECISION);

    let mut result = Distribution::with_capacity(participants.len());
    for (i, user_id) in participants.iter().enumerate() {
        let amount = if i == 0 { share + residual } else { share };
        result.push(*user_id, amount);
    }
    result
}

/// Percentage split: each participant pays `round(pct / 100 * total)`.
///
/// Per-participant rounding is independent: the summed result can drift a
/// cent away from the total (unlike Equal, there is no residual
/// compensation). Callers relying on exact sums should use Equal or Fixed
/// with covering amounts; see the regression test exercising the drift.
fn split_percentage(
    total_amount: Decimal,
    participants: &[UserId],
    percentages: &[Decimal],
) -> Result<Distribution, DistributionError> {
    let total_percentage: Decimal = percentages.iter().sum();
    if total_percentage.round_dp(MONEY_PRECISION) != ONE_HUNDRED {
        return Err(DistributionError::PercentageSumInvalid(total_percentage));
    }

    let mut result = Distribution::with_capacity(participants.len());
    for (user_id, &percentage) in participants.iter().zip(percentages) {
        let amount = (percentage / ONE_HUNDRED * total_amount).round_dp(MONEY_PRECISION);
        result.push(*user_id, amount);
    }
    Ok(result)
}

/// Fixed split: nominal contributions scaled proportionally onto the total.
///
/// Each participant pays `round(fixed / total_fixed * total)`. When the
/// nominal amounts already sum to the total this returns them unchanged;
/// when they sum to more (a discount applied after the fact) everyone is
/// scaled down by the same factor.
fn split_fixed(
    total_amount: Decimal,
    participants: &[UserId],
    fixed_amounts: &[Decimal],
) -> Result<Distribution, DistributionError> {
    let total_fixed: Decimal = fixed_amounts.iter().sum();
    if total_fixed.round_dp(MONEY_PRECISION) < total_amount.round_dp(MONEY_PRECISION) {
        return Err(DistributionError::InsufficientFixedTotal {
            fixed: total_fixed,
            total: total_amount,
        });
    }

    let mut result = Distribution::with_capacity(participants.len());
    for (user_id, &fixed) in participants.iter().zip(fixed_amounts) {
        // total_fixed can only be zero when the total is zero as well;
        // everyone then owes nothing and the division is skipped.
        let amount = if total_fixed.is_zero() {
            Decimal::ZERO
        } else {
            (fixed / total_fixed * total_amount).round_dp(MONEY_PRECISION)
        };
        result.push(*user_id, amount);
    }
    Ok(result)
}
