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

//! # Billsplit
//!
//! This library splits household bills among participants using
//! interchangeable cost distribution modes: equal shares, percentage
//! shares, and proportionally scaled fixed contributions.
//!
//! ## Core Components
//!
//! - [`split::compute`]: The distribution engine - a pure function from
//!   (mode, total, participants, params) to per-participant owed amounts
//! - [`BillService`]: Coordinates validation, storage, and distribution
//! - [`BillStore`]: Concurrent in-memory store for bills and saved shares
//! - [`DistributionError`]: Error taxonomy for rejected split inputs
//!
//! ## Example
//!
//! ```
//! use billsplit_rs::{SplitKind, UserId, split};
//! use rust_decimal_macros::dec;
//!
//! // Split 300.00 equally among three housemates
//! let users = [UserId(1), UserId(2), UserId(3)];
//! let result = split::compute(SplitKind::Equal, dec!(300.00), &users, None).unwrap();
//!
//! assert_eq!(result.amount(&UserId(2)), Some(dec!(100.00)));
//! assert_eq!(result.total(), dec!(300.00));
//! ```
//!
//! ## Thread Safety
//!
//! The engine is stateless and side-effect free, so independent callers
//! can compute distributions concurrently without coordination. The store
//! serializes its own writes internally.

mod base;
pub mod bill;
pub mod error;
mod service;
pub mod split;
mod store;
mod validator;

pub use base::{BillId, HouseholdId, UserId};
pub use bill::{
    Bill, BillCategory, Frequency, NewBill, PaymentStatus, ShareRecord, ShareStatus,
};
pub use error::{DistributionError, ServiceError};
pub use service::BillService;
pub use split::{Distribution, SplitKind, compute};
pub use store::BillStore;
pub use validator::{BillValidator, ValidationError};
