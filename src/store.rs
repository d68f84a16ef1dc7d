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

//! In-memory bill store.
//!
//! Uses [`DashMap`] for concurrent access to bills and saved distributions,
//! plus a creation-order index so listings are deterministic. Listing
//! methods return newest-first, matching how households review recent
//! expenses.

use crate::base::{BillId, HouseholdId, UserId};
use crate::bill::{Bill, NewBill, PaymentStatus, ShareRecord, ShareStatus};
use crate::split::{Distribution, SplitKind};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Concurrent in-memory store for bills and their distributions.
///
/// Bills are handed out as `Arc<Bill>` so callers can keep references while
/// the store keeps serving lookups; the bill's own mutex guards status
/// transitions.
#[derive(Debug)]
pub struct BillStore {
    /// Bills indexed by ID.
    bills: DashMap<BillId, Arc<Bill>>,
    /// Saved per-participant shares, keyed by the distributed bill.
    shares: DashMap<BillId, Vec<ShareRecord>>,
    /// Bill IDs in creation order, for deterministic listings.
    order: Mutex<Vec<BillId>>,
    /// Next bill ID to allocate.
    next_id: AtomicU32,
}

impl BillStore {
    /// Creates an empty store. IDs start at 1.
    pub fn new() -> Self {
        Self {
            bills: DashMap::new(),
            shares: DashMap::new(),
            order: Mutex::new(Vec::new()),
            next_id: AtomicU32::new(1),
        }
    }

    /// Stores a new bill and returns its allocated ID.
    pub fn create(&self, new: NewBill) -> BillId {
        let bill_id = BillId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.bills.insert(bill_id, Arc::new(Bill::new(bill_id, new)));
        self.order.lock().push(bill_id);
        bill_id
    }

    pub fn get(&self, bill_id: &BillId) -> Option<Arc<Bill>> {
        self.bills.get(bill_id).map(|entry| Arc::clone(&entry))
    }

    pub fn contains(&self, bill_id: &BillId) -> bool {
        self.bills.contains_key(bill_id)
    }

    /// All bills, newest first.
    pub fn find_all(&self) -> Vec<Arc<Bill>> {
        self.collect_ordered(|_| true)
    }

    /// All bills of a household, newest first.
    pub fn find_by_household(&self, household_id: HouseholdId) -> Vec<Arc<Bill>> {
        self.collect_ordered(|bill| bill.household_id() == household_id)
    }

    /// Bills on which `user_id` still has an unsettled share, ordered by
    /// due date (undated bills first).
    pub fn find_pending_bills(&self, user_id: UserId) -> Vec<Arc<Bill>> {
        let mut pending: Vec<Arc<Bill>> = self
            .order
            .lock()
            .iter()
            .filter_map(|bill_id| self.get(bill_id))
            .filter(|bill| self.has_pending_share(&bill.id(), user_id))
            .collect();
        pending.sort_by(|a, b| a.due_date().cmp(&b.due_date()));
        pending
    }

    /// Updates a bill's payment status. Returns false if the bill is gone.
    pub fn update_status(&self, bill_id: &BillId, status: PaymentStatus) -> bool {
        match self.get(bill_id) {
            Some(bill) => {
                bill.set_status(status);
                true
            }
            None => false,
        }
    }

    /// Removes a bill together with its saved distribution.
    pub fn delete(&self, bill_id: &BillId) -> bool {
        let removed = self.bills.remove(bill_id).is_some();
        if removed {
            self.shares.remove(bill_id);
            self.order.lock().retain(|id| id != bill_id);
        }
        removed
    }

    /// Persists a computed distribution as pending shares, replacing any
    /// earlier distribution of the same bill.
    pub fn save_distribution(&self, bill_id: BillId, kind: SplitKind, distribution: &Distribution) {
        let records: Vec<ShareRecord> = distribution
            .iter()
            .map(|(user_id, amount)| ShareRecord {
                user_id,
                amount,
                kind,
                status: ShareStatus::Pending,
            })
            .collect();
        self.shares.insert(bill_id, records);
    }

    /// Saved shares of a bill, in distribution order.
    pub fn distribution(&self, bill_id: &BillId) -> Option<Vec<ShareRecord>> {
        self.shares.get(bill_id).map(|entry| entry.value().clone())
    }

    /// Marks one participant's share as settled. Returns false if the bill
    /// has no distribution or the user no share in it.
    pub fn mark_share_paid(&self, bill_id: &BillId, user_id: UserId) -> bool {
        let Some(mut records) = self.shares.get_mut(bill_id) else {
            return false;
        };
        match records.iter_mut().find(|share| share.user_id == user_id) {
            Some(share) => {
                share.status = ShareStatus::Paid;
                true
            }
            None => false,
        }
    }

    fn has_pending_share(&self, bill_id: &BillId, user_id: UserId) -> bool {
        self.shares
            .get(bill_id)
            .is_some_and(|records| {
                records
                    .iter()
                    .any(|share| share.user_id == user_id && share.status == ShareStatus::Pending)
            })
    }

    fn collect_ordered(&self, keep: impl Fn(&Bill) -> bool) -> Vec<Arc<Bill>> {
        self.order
            .lock()
            .iter()
            .rev()
            .filter_map(|bill_id| self.get(bill_id))
            .filter(|bill| keep(bill))
            .collect()
    }
}

impl Default for BillStore {
    fn default() -> Self {
        Self::new()
    }
}
