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

use billsplit_rs::{
    BillCategory, BillService, BillStore, HouseholdId, NewBill, SplitKind, UserId,
};
use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Billsplit - Split household bill CSV files
///
/// Reads bills from a CSV file, splits each one among its participants,
/// and outputs the per-participant shares to stdout.
#[derive(Parser, Debug)]
#[command(name = "billsplit-rs")]
#[command(about = "Splits household bills from a CSV file", long_about = None)]
struct Args {
    /// Path to CSV file with bills
    ///
    /// Expected format: household,payer,title,amount,category,mode,participants,params
    /// Example: cargo run -- bills.csv > shares.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Open input file
    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    // Split bills from CSV and write shares to stdout
    if let Err(e) = process_bills(BufReader::new(file), std::io::stdout()) {
        eprintln!("Error processing bills: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `household, payer, title, amount, category, mode, participants, params`
/// - `participants`: `|`-separated user IDs, e.g. `1|2|3`
/// - `params`: `|`-separated `user:value` pairs, e.g. `1:50|2:30|3:20`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    household: u32,
    payer: u32,
    title: String,
    amount: Decimal,
    #[serde(default)]
    category: Option<String>,
    mode: String,
    participants: String,
    #[serde(default)]
    params: Option<String>,
}

impl CsvRecord {
    /// Converts the record into bill data.
    ///
    /// Returns `None` for an unknown category, treated like any other
    /// malformed row.
    fn into_new_bill(self) -> Option<(NewBill, String, String, Option<String>)> {
        let category = match self.category.as_deref() {
            Some(name) if !name.is_empty() => name.parse().ok()?,
            _ => BillCategory::default(),
        };
        let bill = NewBill {
            household_id: HouseholdId(self.household),
            payer_id: UserId(self.payer),
            title: self.title,
            amount: self.amount,
            category,
            is_recurring: false,
            frequency: None,
            due_date: None,
        };
        Some((bill, self.mode, self.participants, self.params))
    }
}

/// Output row: one participant's share of one bill.
#[derive(Debug, Serialize)]
struct ShareRow {
    bill: u32,
    user: u32,
    amount: Decimal,
}

/// Parses `1|2|3` into user IDs. Returns `None` on any malformed entry.
fn parse_participants(raw: &str) -> Option<Vec<UserId>> {
    raw.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u32>().ok().map(UserId))
        .collect()
}

/// Parses `1:50|2:30` into per-participant parameters.
fn parse_params(raw: &str) -> Option<HashMap<UserId, Decimal>> {
    raw.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (user, value) = part.split_once(':')?;
            let user_id = UserId(user.trim().parse().ok()?);
            let value = value.trim().parse::<Decimal>().ok()?;
            Some((user_id, value))
        })
        .collect()
}

/// Splits bills from a CSV reader and writes share rows to `output`.
///
/// Uses streaming parsing, so input size is bounded only by the number of
/// bills kept in the in-memory store. Malformed rows are silently skipped;
/// rows the validator or the distribution engine rejects are reported on
/// stderr and processing continues.
///
/// # CSV Format
///
/// Expected columns: `household, payer, title, amount, category, mode, participants, params`
///
/// # Example
///
/// ```csv
/// household,payer,title,amount,category,mode,participants,params
/// 1,1,Rent,300.00,rent,equal,1|2|3,
/// 1,2,Dinner,200.00,food,percentage,1|2|3,1:50|2:30|3:20
/// ```
fn process_bills<R: Read, W: Write>(input: R, output: W) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(BillStore::new());
    let service = BillService::new(Arc::clone(&store));

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);
    let mut writer = Writer::from_writer(output);

    for result in reader.deserialize::<CsvRecord>() {
        // Skip malformed rows
        let Ok(record) = result else { continue };
        let Some((new_bill, mode, participants, params)) = record.into_new_bill() else {
            continue;
        };
        let Some(participants) = parse_participants(&participants) else {
            continue;
        };
        let params = match params.as_deref() {
            Some(raw) if !raw.is_empty() => match parse_params(raw) {
                Some(map) => Some(map),
                None => continue,
            },
            _ => None,
        };

        let kind = match mode.parse::<SplitKind>() {
            Ok(kind) => kind,
            Err(e) => {
                eprintln!("Skipping bill '{}': {}", new_bill.title, e);
                continue;
            }
        };

        let title = new_bill.title.clone();
        let bill_id = match service.create_bill(new_bill) {
            Ok(bill_id) => bill_id,
            Err(e) => {
                eprintln!("Skipping bill '{}': {}", title, e);
                continue;
            }
        };

        match service.split_bill(bill_id, kind, &participants, params.as_ref()) {
            Ok(distribution) => {
                for (user_id, amount) in distribution.iter() {
                    writer.serialize(ShareRow {
                        bill: bill_id.0,
                        user: user_id.0,
                        amount,
                    })?;
                }
            }
            Err(e) => eprintln!("Cannot split bill '{}': {}", title, e),
        }
    }

    writer.flush()?;
    Ok(())
}
