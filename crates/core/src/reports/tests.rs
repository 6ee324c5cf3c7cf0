//! Tests for the aggregation view.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trustfund_shared::types::{AcademicYearId, CourseId, StudentId, TrustId, TrustTransactionId};

use super::filter::{DateRange, TransactionFilter};
use super::service::ReportService;
use crate::directory::Course;
use crate::ledger::{LedgerError, StudentAssignment, TransactionKind, Trust, TrustTransaction};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn course(name: &str) -> Course {
    Course {
        id: CourseId::new(),
        name: name.to_string(),
    }
}

fn trust(name: &str) -> Trust {
    Trust {
        id: TrustId::new(),
        name: name.to_string(),
        balance: Decimal::ZERO,
        details: None,
        created_at: at(1, 0),
        updated_at: at(1, 0),
    }
}

fn inflow(trust_id: TrustId, amount: Decimal, created_at: DateTime<Utc>) -> TrustTransaction {
    TrustTransaction {
        id: TrustTransactionId::new(),
        trust_id,
        kind: TransactionKind::Inflow,
        amount,
        balance_after: amount,
        notes: None,
        assignment: None,
        created_at,
    }
}

fn outflow(
    trust_id: TrustId,
    course_id: Option<CourseId>,
    amount: Decimal,
    created_at: DateTime<Utc>,
) -> TrustTransaction {
    TrustTransaction {
        id: TrustTransactionId::new(),
        trust_id,
        kind: TransactionKind::Outflow,
        amount,
        balance_after: Decimal::ZERO,
        notes: None,
        assignment: Some(StudentAssignment {
            student_id: StudentId::new(),
            academic_year_id: AcademicYearId::new(),
            course_id,
            academic_year_session: Some("2025-26".to_string()),
            fees_type: "Tuition".to_string(),
        }),
        created_at,
    }
}

#[test]
fn test_date_range_includes_whole_end_day() {
    let range = DateRange::new(Some(date(5)), Some(date(5))).unwrap();
    assert!(range.contains(at(5, 0)));
    assert!(range.contains(Utc.with_ymd_and_hms(2026, 3, 5, 23, 59, 59).unwrap()));
    assert!(!range.contains(at(6, 0)));
    assert!(!range.contains(Utc.with_ymd_and_hms(2026, 3, 4, 23, 59, 59).unwrap()));
}

#[test]
fn test_inverted_date_range_rejected() {
    let err = DateRange::new(Some(date(9)), Some(date(2))).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidDateRange { .. }));
}

#[test]
fn test_open_ended_ranges() {
    let from_only = DateRange::new(Some(date(5)), None).unwrap();
    assert!(from_only.contains(at(28, 12)));
    assert!(!from_only.contains(at(4, 12)));

    let unbounded = DateRange::unbounded();
    assert!(unbounded.is_unbounded());
    assert!(unbounded.contains(at(1, 0)));
}

#[test]
fn test_filter_sorts_newest_first() {
    let trust_id = TrustId::new();
    let txs = vec![
        inflow(trust_id, dec!(100), at(2, 9)),
        inflow(trust_id, dec!(200), at(4, 9)),
        inflow(trust_id, dec!(300), at(3, 9)),
    ];

    let listed = ReportService::filter_transactions(&txs, &TransactionFilter::new());
    let amounts: Vec<Decimal> = listed.iter().map(|tx| tx.amount).collect();
    assert_eq!(amounts, vec![dec!(200), dec!(300), dec!(100)]);
}

#[test]
fn test_filter_by_trust_course_and_kind() {
    let alumni = TrustId::new();
    let merit = TrustId::new();
    let physics = CourseId::new();
    let txs = vec![
        inflow(alumni, dec!(5000), at(2, 9)),
        outflow(alumni, Some(physics), dec!(2000), at(3, 9)),
        outflow(merit, Some(physics), dec!(700), at(3, 10)),
        outflow(alumni, Some(CourseId::new()), dec!(300), at(3, 11)),
    ];

    let filter = TransactionFilter::new()
        .for_trust(alumni)
        .for_course(physics)
        .of_kind(TransactionKind::Outflow);
    let listed = ReportService::filter_transactions(&txs, &filter);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].amount, dec!(2000));
}

#[test]
fn test_summarize_by_course_excludes_orphans_and_inflows() {
    let trust_id = TrustId::new();
    let physics = course("BSc Physics");
    let commerce = course("BCom");
    let txs = vec![
        inflow(trust_id, dec!(9000), at(2, 9)),
        outflow(trust_id, Some(physics.id), dec!(2000), at(3, 9)),
        outflow(trust_id, Some(physics.id), dec!(500), at(4, 9)),
        outflow(trust_id, Some(commerce.id), dec!(1200), at(4, 10)),
        outflow(trust_id, Some(CourseId::new()), dec!(999), at(4, 11)),
        outflow(trust_id, None, dec!(1), at(4, 12)),
    ];
    let courses = vec![physics.clone(), commerce.clone()];

    let summary = ReportService::summarize_by_course(&txs, &TransactionFilter::new(), &courses);
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].course_name, "BCom");
    assert_eq!(summary[0].total_outflow, dec!(1200));
    assert_eq!(summary[1].course_id, physics.id);
    assert_eq!(summary[1].total_outflow, dec!(2500));
    assert_eq!(summary[1].transaction_count, 2);

    // Orphans still appear in the unfiltered list.
    assert_eq!(
        ReportService::filter_transactions(&txs, &TransactionFilter::new()).len(),
        6
    );
}

#[test]
fn test_date_filter_excluding_everything_yields_empty_views() {
    let trust_id = TrustId::new();
    let physics = course("BSc Physics");
    let txs = vec![
        inflow(trust_id, dec!(5000), at(2, 9)),
        outflow(trust_id, Some(physics.id), dec!(2000), at(3, 9)),
    ];
    let filter = TransactionFilter::new().within(
        DateRange::new(Some(date(20)), Some(date(25))).unwrap(),
    );

    assert!(ReportService::filter_transactions(&txs, &filter).is_empty());
    assert!(ReportService::summarize_by_course(&txs, &filter, &[physics]).is_empty());
    assert!(ReportService::daily_totals(&txs, &filter).is_empty());
}

#[test]
fn test_detail_for_course() {
    let trust_id = TrustId::new();
    let physics = course("BSc Physics");
    let txs = vec![
        outflow(trust_id, Some(physics.id), dec!(2000), at(3, 9)),
        outflow(trust_id, Some(physics.id), dec!(500), at(5, 9)),
        outflow(trust_id, Some(CourseId::new()), dec!(300), at(5, 10)),
    ];

    let detail = ReportService::detail_for_course(&txs, &physics, &TransactionFilter::new());
    assert_eq!(detail.course_name, "BSc Physics");
    assert_eq!(detail.total_outflow, dec!(2500));
    assert_eq!(detail.transactions.len(), 2);
    assert_eq!(detail.transactions[0].amount, dec!(500));
}

#[test]
fn test_summarize_by_trust_includes_idle_trusts() {
    let alumni = trust("Alumni Fund");
    let merit = trust("Merit Fund");
    let txs = vec![
        inflow(alumni.id, dec!(5000), at(2, 9)),
        outflow(alumni.id, None, dec!(2000), at(3, 9)),
    ];

    let summary = ReportService::summarize_by_trust(
        &txs,
        &TransactionFilter::new(),
        &[merit.clone(), alumni.clone()],
    );
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].trust_id, alumni.id);
    assert_eq!(summary[0].net, dec!(3000));
    assert_eq!(summary[0].transaction_count, 2);
    assert_eq!(summary[1].trust_id, merit.id);
    assert_eq!(summary[1].transaction_count, 0);
}

#[test]
fn test_daily_totals_newest_day_first() {
    let trust_id = TrustId::new();
    let txs = vec![
        inflow(trust_id, dec!(100), at(2, 9)),
        inflow(trust_id, dec!(50), at(2, 18)),
        outflow(trust_id, None, dec!(30), at(4, 9)),
    ];

    let days = ReportService::daily_totals(&txs, &TransactionFilter::new());
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].date, date(4));
    assert_eq!(days[0].total_outflow, dec!(30));
    assert_eq!(days[1].date, date(2));
    assert_eq!(days[1].total_inflow, dec!(150));
    assert_eq!(days[1].transaction_count, 2);
}

#[test]
fn test_totals_saturate_instead_of_overflowing() {
    let trust_id = TrustId::new();
    let txs = vec![
        inflow(trust_id, Decimal::MAX, at(2, 9)),
        inflow(trust_id, Decimal::MAX, at(2, 10)),
    ];

    let totals = ReportService::totals(&txs);
    assert_eq!(totals.total_inflow, Decimal::MAX);
    assert_eq!(totals.net, Decimal::MAX);
    assert_eq!(totals.transaction_count, 2);
}

/// Strategy for a list of (is_outflow, cents, day) triples.
fn log_strategy() -> impl Strategy<Value = Vec<(bool, i64, u32)>> {
    prop::collection::vec((any::<bool>(), 1i64..1_000_000i64, 1u32..29u32), 0..50)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Course totals never exceed total outflow, and the daily view sums to
    /// the same totals as the whole list.
    #[test]
    fn prop_aggregates_agree(entries in log_strategy()) {
        let trust_id = TrustId::new();
        let physics = course("BSc Physics");
        let txs: Vec<TrustTransaction> = entries
            .iter()
            .map(|&(is_outflow, cents, day)| {
                let amount = Decimal::new(cents, 2);
                if is_outflow {
                    outflow(trust_id, Some(physics.id), amount, at(day, 12))
                } else {
                    inflow(trust_id, amount, at(day, 12))
                }
            })
            .collect();
        let filter = TransactionFilter::new();

        let totals = ReportService::totals(&txs);
        let courses =
            ReportService::summarize_by_course(&txs, &filter, std::slice::from_ref(&physics));
        let course_total: Decimal = courses.iter().map(|c| c.total_outflow).sum();
        prop_assert_eq!(course_total, totals.total_outflow);

        let days = ReportService::daily_totals(&txs, &filter);
        let daily_in: Decimal = days.iter().map(|d| d.total_inflow).sum();
        let daily_out: Decimal = days.iter().map(|d| d.total_outflow).sum();
        prop_assert_eq!(daily_in, totals.total_inflow);
        prop_assert_eq!(daily_out, totals.total_outflow);
        prop_assert!(days.windows(2).all(|w| w[0].date > w[1].date));
    }

    /// Filtering never invents transactions and always returns newest first.
    #[test]
    fn prop_filter_is_subset_sorted(
        entries in log_strategy(),
        from in 1u32..29u32,
        len in 0u32..10u32,
    ) {
        let trust_id = TrustId::new();
        let txs: Vec<TrustTransaction> = entries
            .iter()
            .map(|&(_, cents, day)| inflow(trust_id, Decimal::new(cents, 2), at(day, 12)))
            .collect();
        let to = (from + len).min(28);
        let filter = TransactionFilter::new()
            .within(DateRange::new(Some(date(from)), Some(date(to))).unwrap());

        let listed = ReportService::filter_transactions(&txs, &filter);
        let expected = entries.iter().filter(|&&(_, _, day)| day >= from && day <= to).count();
        prop_assert_eq!(listed.len(), expected);
        prop_assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}
