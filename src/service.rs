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

//! Bill management service.
//!
//! Coordinates the validator, the store, and the distribution engine.
//! Validation and calculation are delegated; this layer only sequences them
//! and translates lookups into [`ServiceError`]s.

use crate::base::{BillId, HouseholdId, UserId};
use crate::bill::{Bill, NewBill, PaymentStatus, ShareRecord};
use crate::error::ServiceError;
use crate::split::{self, Distribution, SplitKind};
use crate::store::BillStore;
use crate::validator::BillValidator;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Service for managing bills and splitting their costs.
pub struct BillService {
    store: Arc<BillStore>,
    validator: BillValidator,
}

impl BillService {
    pub fn new(store: Arc<BillStore>) -> Self {
        Self {
            store,
            validator: BillValidator::new(),
        }
    }

    /// Validates and stores a new bill.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`] with every failed field check.
    pub fn create_bill(&self, new: NewBill) -> Result<BillId, ServiceError> {
        let errors = self.validator.validate(&new);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        Ok(self.store.create(new))
    }

    pub fn bill(&self, bill_id: BillId) -> Result<Arc<Bill>, ServiceError> {
        self.store.get(&bill_id).ok_or(ServiceError::BillNotFound(bill_id))
    }

    pub fn household_bills(&self, household_id: HouseholdId) -> Vec<Arc<Bill>> {
        self.store.find_by_household(household_id)
    }

    pub fn pending_bills(&self, user_id: UserId) -> Vec<Arc<Bill>> {
        self.store.find_pending_bills(user_id)
    }

    /// Splits a stored bill's amount among `participants` and persists the
    /// resulting shares.
    ///
    /// The computation itself is pure; only the persisted shares make this
    /// call observable. Splitting again replaces the previous distribution.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::BillNotFound`] - `bill_id` does not exist.
    /// - [`ServiceError::Distribution`] - the engine rejected the input
    ///   (see [`DistributionError`](crate::DistributionError)).
    pub fn split_bill(
        &self,
        bill_id: BillId,
        kind: SplitKind,
        participants: &[UserId],
        params: Option<&HashMap<UserId, Decimal>>,
    ) -> Result<Distribution, ServiceError> {
        let bill = self.bill(bill_id)?;
        let distribution = split::compute(kind, bill.amount(), participants, params)?;
        self.store.save_distribution(bill_id, kind, &distribution);
        Ok(distribution)
    }

    /// Saved shares of a bill; empty if it was never split.
    pub fn distribution(&self, bill_id: BillId) -> Result<Vec<ShareRecord>, ServiceError> {
        if !self.store.contains(&bill_id) {
            return Err(ServiceError::BillNotFound(bill_id));
        }
        Ok(self.store.distribution(&bill_id).unwrap_or_default())
    }

    pub fn update_status(&self, bill_id: BillId, status: PaymentStatus) -> Result<(), ServiceError> {
        if self.store.update_status(&bill_id, status) {
            Ok(())
        } else {
            Err(ServiceError::BillNotFound(bill_id))
        }
    }

    /// Marks one participant's share as settled. Returns whether a share
    /// was actually updated.
    pub fn mark_share_paid(&self, bill_id: BillId, user_id: UserId) -> Result<bool, ServiceError> {
        if !self.store.contains(&bill_id) {
            return Err(ServiceError::BillNotFound(bill_id));
        }
        Ok(self.store.mark_share_paid(&bill_id, user_id))
    }

    pub fn delete_bill(&self, bill_id: BillId) -> Result<(), ServiceError> {
        if self.store.delete(&bill_id) {
            Ok(())
        } else {
            Err(ServiceError::BillNotFound(bill_id))
        }
    }
}
