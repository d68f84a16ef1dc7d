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

//! Bill input validation.
//!
//! Collects every problem with a [`NewBill`] instead of failing on the
//! first one, so the caller can present all field errors at once. Category
//! and status validity is already enforced by the enums; what remains here
//! are the constraints the type system cannot express.

use crate::bill::NewBill;
use rust_decimal::Decimal;
use std::fmt;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validator for bill creation data.
#[derive(Debug, Default, Clone, Copy)]
pub struct BillValidator;

impl BillValidator {
    /// Titles longer than this are rejected.
    pub const MAX_TITLE_LEN: usize = 255;

    pub fn new() -> Self {
        Self
    }

    /// Returns every validation failure in `bill`; empty means valid.
    ///
    /// Creation is stricter than the distribution engine: a bill must have
    /// a strictly positive amount, while the engine accepts a zero total.
    pub fn validate(&self, bill: &NewBill) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let title = bill.title.trim();
        if title.is_empty() {
            errors.push(ValidationError::new("title", "title is required"));
        } else if title.chars().count() > Self::MAX_TITLE_LEN {
            errors.push(ValidationError::new(
                "title",
                format!("title cannot exceed {} characters", Self::MAX_TITLE_LEN),
            ));
        }

        if bill.amount <= Decimal::ZERO {
            errors.push(ValidationError::new("amount", "amount must be greater than zero"));
        }

        if bill.is_recurring && bill.frequency.is_none() {
            errors.push(ValidationError::new(
                "frequency",
                "frequency is required for recurring bills",
            ));
        }

        errors
    }

    pub fn is_valid(&self, bill: &NewBill) -> bool {
        self.validate(bill).is_empty()
    }
}
