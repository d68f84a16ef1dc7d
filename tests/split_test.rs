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

//! Distribution engine public API tests.

use billsplit_rs::{DistributionError, SplitKind, UserId, split};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn users(ids: &[u32]) -> Vec<UserId> {
    ids.iter().copied().map(UserId).collect()
}

fn params(entries: &[(u32, Decimal)]) -> HashMap<UserId, Decimal> {
    entries.iter().map(|(id, value)| (UserId(*id), *value)).collect()
}

// =============================================================================
// Equal Mode
// =============================================================================

#[test]
fn equal_split_exact_division() {
    let result = split::compute(SplitKind::Equal, dec!(300.00), &users(&[1, 2, 3]), None).unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.amount(&UserId(1)), Some(dec!(100.00)));
    assert_eq!(result.amount(&UserId(2)), Some(dec!(100.00)));
    assert_eq!(result.amount(&UserId(3)), Some(dec!(100.00)));
    assert_eq!(result.total(), dec!(300.00));
}

#[test]
fn equal_split_first_participant_absorbs_residual() {
    let result = split::compute(SplitKind::Equal, dec!(100.00), &users(&[1, 2, 3]), None).unwrap();

    assert_eq!(result.amount(&UserId(1)), Some(dec!(33.34)));
    assert_eq!(result.amount(&UserId(2)), Some(dec!(33.33)));
    assert_eq!(result.amount(&UserId(3)), Some(dec!(33.33)));
    assert_eq!(result.total(), dec!(100.00));
}

#[test]
fn equal_split_residual_follows_order_not_identifier() {
    let result = split::compute(SplitKind::Equal, dec!(100.00), &users(&[3, 1, 2]), None).unwrap();

    // First-listed participant gets the extra cent, whatever their ID
    assert_eq!(result.amount(&UserId(3)), Some(dec!(33.34)));
    assert_eq!(result.amount(&UserId(1)), Some(dec!(33.33)));
    assert_eq!(result.amount(&UserId(2)), Some(dec!(33.33)));

    let order: Vec<UserId> = result.iter().map(|(user, _)| user).collect();
    assert_eq!(order, users(&[3, 1, 2]));
}

#[test]
fn equal_split_ignores_params() {
    let extra = params(&[(1, dec!(50)), (2, dec!(50))]);
    let result =
        split::compute(SplitKind::Equal, dec!(80.00), &users(&[1, 2]), Some(&extra)).unwrap();

    assert_eq!(result.amount(&UserId(1)), Some(dec!(40.00)));
    assert_eq!(result.amount(&UserId(2)), Some(dec!(40.00)));
}

#[test]
fn equal_split_zero_total() {
    let result = split::compute(SplitKind::Equal, dec!(0.00), &users(&[1, 2]), None).unwrap();

    assert_eq!(result.amount(&UserId(1)), Some(Decimal::ZERO));
    assert_eq!(result.amount(&UserId(2)), Some(Decimal::ZERO));
    assert_eq!(result.total(), Decimal::ZERO);
}

// =============================================================================
// Percentage Mode
// =============================================================================

#[test]
fn percentage_split_basic() {
    let shares = params(&[(1, dec!(50)), (2, dec!(30)), (3, dec!(20))]);
    let result =
        split::compute(SplitKind::Percentage, dec!(200.00), &users(&[1, 2, 3]), Some(&shares))
            .unwrap();

    assert_eq!(result.amount(&UserId(1)), Some(dec!(100.00)));
    assert_eq!(result.amount(&UserId(2)), Some(dec!(60.00)));
    assert_eq!(result.amount(&UserId(3)), Some(dec!(40.00)));
    assert_eq!(result.total(), dec!(200.00));
}

#[test]
fn percentage_split_fractional_shares() {
    let shares = params(&[(1, dec!(12.5)), (2, dec!(87.5))]);
    let result =
        split::compute(SplitKind::Percentage, dec!(80.00), &users(&[1, 2]), Some(&shares)).unwrap();

    assert_eq!(result.amount(&UserId(1)), Some(dec!(10.00)));
    assert_eq!(result.amount(&UserId(2)), Some(dec!(70.00)));
}

#[test]
fn percentage_sum_below_100_rejected() {
    let shares = params(&[(1, dec!(50)), (2, dec!(30)), (3, dec!(19.99))]);
    let result =
        split::compute(SplitKind::Percentage, dec!(200.00), &users(&[1, 2, 3]), Some(&shares));

    assert_eq!(result, Err(DistributionError::PercentageSumInvalid(dec!(99.99))));
}

#[test]
fn percentage_sum_above_100_rejected() {
    let shares = params(&[(1, dec!(50)), (2, dec!(30)), (3, dec!(20.01))]);
    let result =
        split::compute(SplitKind::Percentage, dec!(200.00), &users(&[1, 2, 3]), Some(&shares));

    assert_eq!(result, Err(DistributionError::PercentageSumInvalid(dec!(100.01))));
}

#[test]
fn percentage_sum_check_rounds_to_two_decimals() {
    // 33.333 + 33.333 + 33.334 = 100.000 -> passes the rounded check
    let shares = params(&[(1, dec!(33.333)), (2, dec!(33.333)), (3, dec!(33.334))]);
    let result =
        split::compute(SplitKind::Percentage, dec!(90.00), &users(&[1, 2, 3]), Some(&shares))
            .unwrap();

    assert_eq!(result.total(), dec!(90.00));
}

/// Regression: percentage rounding is independent per participant, so the
/// sum can drift a cent away from the total. Intentional - do not "fix"
/// by rebalancing.
#[test]
fn percentage_split_can_drift_by_a_cent() {
    let shares = params(&[(1, dec!(50)), (2, dec!(25)), (3, dec!(25))]);
    let result =
        split::compute(SplitKind::Percentage, dec!(0.01), &users(&[1, 2, 3]), Some(&shares))
            .unwrap();

    // 0.005 and 0.0025 all round down to zero: the cent vanishes
    assert_eq!(result.amount(&UserId(1)), Some(dec!(0.00)));
    assert_eq!(result.amount(&UserId(2)), Some(dec!(0.00)));
    assert_eq!(result.amount(&UserId(3)), Some(dec!(0.00)));
    assert_eq!(result.total(), dec!(0.00));
}

#[test]
fn percentage_requires_params() {
    let result = split::compute(SplitKind::Percentage, dec!(100.00), &users(&[1, 2]), None);
    assert_eq!(result, Err(DistributionError::MissingParameters));

    // An empty map counts as absent
    let empty = HashMap::new();
    let result = split::compute(SplitKind::Percentage, dec!(100.00), &users(&[1, 2]), Some(&empty));
    assert_eq!(result, Err(DistributionError::MissingParameters));
}

#[test]
fn percentage_requires_entry_per_participant() {
    let shares = params(&[(1, dec!(60)), (2, dec!(40))]);
    let result =
        split::compute(SplitKind::Percentage, dec!(100.00), &users(&[1, 2, 3]), Some(&shares));

    assert_eq!(result, Err(DistributionError::MissingParticipantParameter(UserId(3))));
}

#[test]
fn percentage_rejects_negative_share() {
    let shares = params(&[(1, dec!(-10)), (2, dec!(60)), (3, dec!(50))]);
    let result =
        split::compute(SplitKind::Percentage, dec!(100.00), &users(&[1, 2, 3]), Some(&shares));

    assert_eq!(result, Err(DistributionError::InvalidAmount));
}

// =============================================================================
// Fixed Mode
// =============================================================================

#[test]
fn fixed_split_exact_match_returns_nominal_amounts() {
    let amounts = params(&[(1, dec!(100.00)), (2, dec!(150.00)), (3, dec!(130.00))]);
    let result =
        split::compute(SplitKind::Fixed, dec!(380.00), &users(&[1, 2, 3]), Some(&amounts)).unwrap();

    assert_eq!(result.amount(&UserId(1)), Some(dec!(100.00)));
    assert_eq!(result.amount(&UserId(2)), Some(dec!(150.00)));
    assert_eq!(result.amount(&UserId(3)), Some(dec!(130.00)));
    assert_eq!(result.total(), dec!(380.00));
}

#[test]
fn fixed_split_scales_down_proportionally() {
    // Nominal contributions sum to 300 but the bill is 270 (e.g. a discount)
    let amounts = params(&[(1, dec!(100)), (2, dec!(150)), (3, dec!(50))]);
    let result =
        split::compute(SplitKind::Fixed, dec!(270.00), &users(&[1, 2, 3]), Some(&amounts)).unwrap();

    assert_eq!(result.amount(&UserId(1)), Some(dec!(90.00)));
    assert_eq!(result.amount(&UserId(2)), Some(dec!(135.00)));
    assert_eq!(result.amount(&UserId(3)), Some(dec!(45.00)));
    assert_eq!(result.total(), dec!(270.00));
}

#[test]
fn fixed_split_insufficient_total_rejected() {
    let amounts = params(&[(1, dec!(100)), (2, dec!(100))]);
    let result = split::compute(SplitKind::Fixed, dec!(300.00), &users(&[1, 2]), Some(&amounts));

    assert_eq!(
        result,
        Err(DistributionError::InsufficientFixedTotal {
            fixed: dec!(200),
            total: dec!(300.00),
        })
    );
}

#[test]
fn fixed_split_requires_entry_per_participant() {
    let amounts = params(&[(1, dec!(100))]);
    let result = split::compute(SplitKind::Fixed, dec!(100.00), &users(&[1, 2]), Some(&amounts));

    assert_eq!(result, Err(DistributionError::MissingParticipantParameter(UserId(2))));
}

#[test]
fn fixed_split_rejects_negative_amount() {
    let amounts = params(&[(1, dec!(-50)), (2, dec!(200))]);
    let result = split::compute(SplitKind::Fixed, dec!(100.00), &users(&[1, 2]), Some(&amounts));

    assert_eq!(result, Err(DistributionError::InvalidAmount));
}

#[test]
fn fixed_split_zero_total_with_zero_amounts() {
    let amounts = params(&[(1, dec!(0)), (2, dec!(0))]);
    let result =
        split::compute(SplitKind::Fixed, dec!(0.00), &users(&[1, 2]), Some(&amounts)).unwrap();

    assert_eq!(result.amount(&UserId(1)), Some(Decimal::ZERO));
    assert_eq!(result.amount(&UserId(2)), Some(Decimal::ZERO));
}

// =============================================================================
// Common Guarantees
// =============================================================================

#[test]
fn negative_total_rejected_in_every_mode() {
    let participants = users(&[1]);
    let entries = params(&[(1, dec!(100))]);

    for kind in [SplitKind::Equal, SplitKind::Percentage, SplitKind::Fixed] {
        let result = split::compute(kind, dec!(-1.00), &participants, Some(&entries));
        assert_eq!(result, Err(DistributionError::InvalidAmount), "mode {kind}");
    }
}

#[test]
fn empty_participants_rejected_in_every_mode() {
    let entries = params(&[(1, dec!(100))]);

    for kind in [SplitKind::Equal, SplitKind::Percentage, SplitKind::Fixed] {
        let result = split::compute(kind, dec!(100.00), &[], Some(&entries));
        assert_eq!(result, Err(DistributionError::InvalidParticipants), "mode {kind}");
    }
}

#[test]
fn duplicate_participants_rejected() {
    let result = split::compute(SplitKind::Equal, dec!(100.00), &users(&[1, 2, 1]), None);
    assert_eq!(result, Err(DistributionError::InvalidParticipants));
}

#[test]
fn single_participant_gets_full_total_in_every_mode() {
    let participants = users(&[7]);

    let equal = split::compute(SplitKind::Equal, dec!(123.45), &participants, None).unwrap();
    assert_eq!(equal.amount(&UserId(7)), Some(dec!(123.45)));

    let pct = params(&[(7, dec!(100))]);
    let percentage =
        split::compute(SplitKind::Percentage, dec!(123.45), &participants, Some(&pct)).unwrap();
    assert_eq!(percentage.amount(&UserId(7)), Some(dec!(123.45)));

    let amounts = params(&[(7, dec!(200.00))]);
    let fixed =
        split::compute(SplitKind::Fixed, dec!(123.45), &participants, Some(&amounts)).unwrap();
    assert_eq!(fixed.amount(&UserId(7)), Some(dec!(123.45)));
}

#[test]
fn compute_is_idempotent() {
    let shares = params(&[(1, dec!(50)), (2, dec!(30)), (3, dec!(20))]);
    let participants = users(&[1, 2, 3]);

    let first =
        split::compute(SplitKind::Percentage, dec!(200.00), &participants, Some(&shares)).unwrap();
    let second =
        split::compute(SplitKind::Percentage, dec!(200.00), &participants, Some(&shares)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn result_order_matches_caller_order() {
    let amounts = params(&[(5, dec!(10)), (9, dec!(20)), (2, dec!(30))]);
    let result =
        split::compute(SplitKind::Fixed, dec!(60.00), &users(&[5, 9, 2]), Some(&amounts)).unwrap();

    let order: Vec<UserId> = result.iter().map(|(user, _)| user).collect();
    assert_eq!(order, users(&[5, 9, 2]));
}
