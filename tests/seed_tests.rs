// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finpanel::commands::seed;
use finpanel::db;
use finpanel::store::{self, TransactionFilter};

#[test]
fn seeds_an_empty_database_once() {
    let mut conn = db::open_in_memory().unwrap();
    assert_eq!(seed::seed(&mut conn).unwrap(), (2, 5));
    assert_eq!(store::list_cards(&conn).unwrap().len(), 2);
    let txs = store::list_transactions(&conn, &TransactionFilter::default()).unwrap();
    assert_eq!(txs.len(), 5);
    assert_eq!(txs[0].description, "Freelance");

    let err = seed::seed(&mut conn).unwrap_err();
    assert!(err.to_string().contains("already has records"));
    assert_eq!(store::count_transactions(&conn).unwrap(), 5);
}

#[test]
fn demo_records_are_valid() {
    for c in seed::demo_cards() {
        c.validate().unwrap();
    }
    for t in seed::demo_transactions().unwrap() {
        t.validate().unwrap();
    }
}
