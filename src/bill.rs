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

//! Bill entities.
//!
//! A [`Bill`] is created from caller-supplied [`NewBill`] data after
//! validation. Everything on it is immutable except the payment status,
//! which transitions `Pending` -> `Paid` or `Pending` -> `Overdue` while
//! the bill is shared behind an `Arc` in the store.
//!
//! # Example
//!
//! ```
//! use billsplit_rs::{Bill, BillCategory, BillId, HouseholdId, NewBill, UserId};
//! use rust_decimal_macros::dec;
//!
//! let bill = Bill::new(BillId(1), NewBill {
//!     household_id: HouseholdId(1),
//!     payer_id: UserId(1),
//!     title: "Rent".to_string(),
//!     amount: dec!(300.00),
//!     category: BillCategory::Rent,
//!     is_recurring: false,
//!     frequency: None,
//!     due_date: None,
//! });
//! assert!(bill.is_pending());
//! ```

use crate::base::{BillId, HouseholdId, UserId};
use crate::split::SplitKind;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bill expense category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillCategory {
    Rent,
    Utilities,
    Food,
    #[default]
    Other,
}

impl fmt::Display for BillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BillCategory::Rent => "rent",
            BillCategory::Utilities => "utilities",
            BillCategory::Food => "food",
            BillCategory::Other => "other",
        };
        write!(f, "{name}")
    }
}

impl FromStr for BillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rent" => Ok(BillCategory::Rent),
            "utilities" => Ok(BillCategory::Utilities),
            "food" => Ok(BillCategory::Food),
            "other" => Ok(BillCategory::Other),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}

/// Recurrence frequency for recurring bills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Monthly,
    Weekly,
    OneTime,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Monthly => "monthly",
            Frequency::Weekly => "weekly",
            Frequency::OneTime => "one-time",
        };
        write!(f, "{name}")
    }
}

/// Payment status of a whole bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        };
        write!(f, "{name}")
    }
}

/// Settlement status of one participant's share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareStatus {
    Pending,
    Paid,
}

/// Caller-supplied data for creating a bill.
///
/// Validated by [`BillValidator`](crate::BillValidator) before the store
/// accepts it. `frequency` is only meaningful when `is_recurring` is set;
/// the validator enforces that pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBill {
    pub household_id: HouseholdId,
    pub payer_id: UserId,
    pub title: String,
    pub amount: Decimal,
    pub category: BillCategory,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    /// ISO `YYYY-MM-DD`, as entered by the user.
    pub due_date: Option<String>,
}

/// One participant's persisted slice of a distributed bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareRecord {
    pub user_id: UserId,
    pub amount: Decimal,
    /// Mode that produced this share.
    pub kind: SplitKind,
    pub status: ShareStatus,
}

/// A stored bill.
///
/// The payment status lives behind a mutex so it can transition while the
/// bill is shared; all other fields are fixed at creation.
#[derive(Debug)]
pub struct Bill {
    bill_id: BillId,
    household_id: HouseholdId,
    payer_id: UserId,
    title: String,
    amount: Decimal,
    category: BillCategory,
    is_recurring: bool,
    frequency: Option<Frequency>,
    due_date: Option<String>,
    status: Mutex<PaymentStatus>,
}

impl Bill {
    /// Money fields serialize with two decimal places (currency minor units).
    const MONEY_PRECISION: u32 = 2;

    pub fn new(bill_id: BillId, new: NewBill) -> Self {
        Self {
            bill_id,
            household_id: new.household_id,
            payer_id: new.payer_id,
            title: new.title,
            amount: new.amount,
            category: new.category,
            is_recurring: new.is_recurring,
            frequency: new.frequency,
            due_date: new.due_date,
            status: Mutex::new(PaymentStatus::Pending),
        }
    }

    pub fn id(&self) -> BillId {
        self.bill_id
    }

    pub fn household_id(&self) -> HouseholdId {
        self.household_id
    }

    pub fn payer_id(&self) -> UserId {
        self.payer_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> BillCategory {
        self.category
    }

    pub fn is_recurring(&self) -> bool {
        self.is_recurring
    }

    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    pub fn due_date(&self) -> Option<&str> {
        self.due_date.as_deref()
    }

    pub fn status(&self) -> PaymentStatus {
        *self.status.lock()
    }

    pub fn is_paid(&self) -> bool {
        self.status() == PaymentStatus::Paid
    }

    pub fn is_pending(&self) -> bool {
        self.status() == PaymentStatus::Pending
    }

    pub fn is_overdue(&self) -> bool {
        self.status() == PaymentStatus::Overdue
    }

    pub(crate) fn set_status(&self, status: PaymentStatus) {
        *self.status.lock() = status;
    }
}

impl Serialize for Bill {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Bill", 10)?;
        state.serialize_field("bill", &self.bill_id)?;
        state.serialize_field("household", &self.household_id)?;
        state.serialize_field("payer", &self.payer_id)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("amount", &self.amount.round_dp(Self::MONEY_PRECISION))?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("recurring", &self.is_recurring)?;
        state.serialize_field("frequency", &self.frequency)?;
        state.serialize_field("due_date", &self.due_date)?;
        state.serialize_field("status", &self.status())?;
        state.end()
    }
}
