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

//! Error types for cost distribution and bill management.

use crate::base::{BillId, UserId};
use crate::validator::ValidationError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Cost distribution errors.
///
/// All variants are caller input errors: they are reported synchronously,
/// never retried, and no partial result is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributionError {
    /// An amount is negative (total or a per-participant parameter)
    #[error("amount cannot be negative")]
    InvalidAmount,

    /// Participant list is empty or contains duplicates
    #[error("must have at least one participant, without duplicates")]
    InvalidParticipants,

    /// Mode requires distribution parameters, none were given
    #[error("distribution parameters are required for this mode")]
    MissingParameters,

    /// A requested participant has no entry in the parameters
    #[error("no parameter entry for participant {0}")]
    MissingParticipantParameter(UserId),

    /// Percentage shares do not sum to 100.00
    #[error("percentage shares must sum to 100.00 (got {0})")]
    PercentageSumInvalid(Decimal),

    /// Fixed amounts sum to less than the total
    #[error("fixed amounts ({fixed}) cannot cover total amount ({total})")]
    InsufficientFixedTotal { fixed: Decimal, total: Decimal },

    /// Mode identifier not recognized
    #[error("unknown distribution mode '{0}'")]
    UnknownMode(String),
}

/// Bill service errors.
///
/// Wraps validation and distribution failures and adds lookup failures
/// from the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Bill data failed validation
    #[error("validation failed: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<ValidationError>),

    /// Referenced bill does not exist
    #[error("bill {0} not found")]
    BillNotFound(BillId),

    /// Distribution computation failed
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}
