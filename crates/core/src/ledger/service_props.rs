//! Behavioural and property tests for `LedgerService` over the in-memory
//! store and directory.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use trustfund_shared::types::{
    AcademicYearId, CourseId, MAX_AMOUNT, PageRequest, StudentId, TrustId,
};

use super::balance::running_balances_consistent;
use super::error::LedgerError;
use super::memory::MemoryLedgerStore;
use super::service::LedgerService;
use super::types::{InflowInput, OutflowInput, TransactionKind};
use crate::clock::ManualClock;
use crate::directory::MemoryDirectory;
use crate::reports::{DateRange, TransactionFilter};

struct Fixture {
    service: LedgerService,
    student: StudentId,
    year: AcademicYearId,
    course: CourseId,
    other_student: StudentId,
}

fn fixture() -> Fixture {
    let mut directory = MemoryDirectory::new();
    let course = directory.add_course("BSc Physics");
    let student = directory.add_student("Asha Verma", "PHY-001");
    let other_student = directory.add_student("Ravi Kumar", "PHY-002");
    let year = directory.enroll(student, course, "2025-26");

    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
    ));
    let service = LedgerService::new(
        Arc::new(MemoryLedgerStore::with_clock(clock)),
        Arc::new(directory),
    );
    Fixture {
        service,
        student,
        year,
        course,
        other_student,
    }
}

fn inflow(trust_id: TrustId, amount: Decimal) -> InflowInput {
    InflowInput {
        trust_id,
        amount,
        notes: None,
    }
}

fn outflow(f: &Fixture, trust_id: TrustId, amount: Decimal) -> OutflowInput {
    OutflowInput {
        trust_id: Some(trust_id),
        student_id: Some(f.student),
        academic_year_id: Some(f.year),
        amount,
        fees_type: Some("Tuition".to_string()),
        notes: None,
    }
}

#[tokio::test]
async fn test_create_trust_then_inflow() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    assert_eq!(trust.balance, Decimal::ZERO);

    let tx = f.service.apply_inflow(inflow(trust.id, dec!(5000))).await.unwrap();
    assert_eq!(tx.kind, TransactionKind::Inflow);
    assert_eq!(tx.amount, dec!(5000));
    assert!(tx.assignment.is_none());

    assert_eq!(f.service.get_trust(trust.id).await.unwrap().balance, dec!(5000));
    let listed = f
        .service
        .list_transactions(&TransactionFilter::new(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.meta.total, 1);
}

#[tokio::test]
async fn test_outflow_assigns_to_course() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.apply_inflow(inflow(trust.id, dec!(5000))).await.unwrap();

    let tx = f
        .service
        .apply_outflow(outflow(&f, trust.id, dec!(2000)))
        .await
        .unwrap();
    let assignment = tx.assignment.as_ref().unwrap();
    assert_eq!(assignment.student_id, f.student);
    assert_eq!(assignment.course_id, Some(f.course));
    assert_eq!(assignment.academic_year_session.as_deref(), Some("2025-26"));
    assert_eq!(tx.balance_after, dec!(3000));

    assert_eq!(f.service.get_trust(trust.id).await.unwrap().balance, dec!(3000));
    let summary = f.service.course_summary(&TransactionFilter::new()).await.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].course_id, f.course);
    assert_eq!(summary[0].total_outflow, dec!(2000));
}

#[tokio::test]
async fn test_overdraw_rejected_and_nothing_recorded() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.apply_inflow(inflow(trust.id, dec!(3000))).await.unwrap();

    let err = f
        .service
        .apply_outflow(outflow(&f, trust.id, dec!(5000)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
    assert_eq!(err.shortfall(), Some(dec!(2000)));

    assert_eq!(f.service.get_trust(trust.id).await.unwrap().balance, dec!(3000));
    let listed = f
        .service
        .list_transactions(&TransactionFilter::new(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.meta.total, 1);
}

#[tokio::test]
async fn test_date_filter_excluding_everything() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.apply_inflow(inflow(trust.id, dec!(5000))).await.unwrap();
    f.service
        .apply_outflow(outflow(&f, trust.id, dec!(2000)))
        .await
        .unwrap();

    let filter = TransactionFilter::new().within(
        DateRange::new(
            NaiveDate::from_ymd_opt(2030, 1, 1),
            NaiveDate::from_ymd_opt(2030, 1, 31),
        )
        .unwrap(),
    );
    let listed = f
        .service
        .list_transactions(&filter, PageRequest::default())
        .await
        .unwrap();
    assert!(listed.data.is_empty());
    assert!(f.service.course_summary(&filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_outflow_equal_to_balance_succeeds() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.apply_inflow(inflow(trust.id, dec!(750.25))).await.unwrap();

    let tx = f
        .service
        .apply_outflow(outflow(&f, trust.id, dec!(750.25)))
        .await
        .unwrap();
    assert_eq!(tx.balance_after, Decimal::ZERO);
}

#[tokio::test]
async fn test_outflow_missing_fields() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();

    let err = f
        .service
        .apply_outflow(OutflowInput {
            trust_id: None,
            ..outflow(&f, trust.id, dec!(10))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::MissingRequiredField("trust_id")));

    let err = f
        .service
        .apply_outflow(OutflowInput {
            fees_type: Some("  ".into()),
            ..outflow(&f, trust.id, dec!(10))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::MissingRequiredField("fees_type")));
}

#[tokio::test]
async fn test_outflow_dangling_references() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.apply_inflow(inflow(trust.id, dec!(100))).await.unwrap();

    let err = f
        .service
        .apply_outflow(outflow(&f, TrustId::new(), dec!(10)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::TrustNotFound(_)));

    let err = f
        .service
        .apply_outflow(OutflowInput {
            student_id: Some(StudentId::new()),
            ..outflow(&f, trust.id, dec!(10))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::StudentNotFound(_)));

    // Enrollment belongs to a different student.
    let err = f
        .service
        .apply_outflow(OutflowInput {
            student_id: Some(f.other_student),
            ..outflow(&f, trust.id, dec!(10))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::EnrollmentNotFound { .. }));
    assert_eq!(f.service.get_trust(trust.id).await.unwrap().balance, dec!(100));
}

#[tokio::test]
async fn test_invalid_amounts_rejected() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();

    for amount in [dec!(0), dec!(-1), dec!(0.001)] {
        let err = f.service.apply_inflow(inflow(trust.id, amount)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)), "{amount}");
    }
    let err = f.service.apply_inflow(inflow(TrustId::new(), dec!(5))).await.unwrap_err();
    assert!(matches!(err, LedgerError::TrustNotFound(_)));
}

#[tokio::test]
async fn test_blank_trust_name_rejected() {
    let f = fixture();
    let err = f.service.create_trust("   ", None).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTrustName));
    assert!(f.service.list_trusts().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_outflows_only_one_wins() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.apply_inflow(inflow(trust.id, dec!(100))).await.unwrap();

    let first = {
        let service = f.service.clone();
        let input = outflow(&f, trust.id, dec!(60));
        tokio::spawn(async move { service.apply_outflow(input).await })
    };
    let second = {
        let service = f.service.clone();
        let input = outflow(&f, trust.id, dec!(60));
        tokio::spawn(async move { service.apply_outflow(input).await })
    };
    let results = [first.await.unwrap(), second.await.unwrap()];

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(LedgerError::InsufficientBalance { available, .. }) if *available == dec!(40)
    )));
    assert_eq!(f.service.get_trust(trust.id).await.unwrap().balance, dec!(40));
    assert!(f.service.reconcile_trust(trust.id).await.unwrap().is_consistent());
}

#[tokio::test]
async fn test_many_concurrent_outflows_never_overdraw() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.apply_inflow(inflow(trust.id, dec!(1000))).await.unwrap();

    let attempts = (0..25).map(|_| {
        let service = f.service.clone();
        let input = outflow(&f, trust.id, dec!(75));
        async move { service.apply_outflow(input).await }
    });
    let results = futures::future::join_all(attempts).await;

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 13);
    assert_eq!(f.service.get_trust(trust.id).await.unwrap().balance, dec!(25));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interleaved_commits_reconcile() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.apply_inflow(inflow(trust.id, dec!(500))).await.unwrap();

    let handles: Vec<_> = (0..40)
        .map(|i| {
            let service = f.service.clone();
            let trust_id = trust.id;
            let input = outflow(&f, trust_id, dec!(45));
            tokio::spawn(async move {
                if i % 2 == 0 {
                    service.apply_inflow(inflow(trust_id, dec!(30))).await
                } else {
                    service.apply_outflow(input).await
                }
            })
        })
        .collect();
    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert!(results.iter().all(|r| matches!(
        r,
        Ok(_) | Err(LedgerError::InsufficientBalance { .. })
    )));

    let report = f.service.reconcile_trust(trust.id).await.unwrap();
    assert!(report.is_consistent());
    assert_eq!(
        report.transaction_count,
        1 + results.iter().filter(|r| r.is_ok()).count()
    );

    let mut history = f
        .service
        .list_transactions(
            &TransactionFilter::new().for_trust(trust.id),
            PageRequest::new(1, 100),
        )
        .await
        .unwrap()
        .data;
    history.reverse();
    assert!(running_balances_consistent(&history));
    assert_eq!(
        history.last().map(|tx| tx.balance_after),
        Some(report.recorded_balance)
    );
}

#[tokio::test]
async fn test_largest_amount_and_balance_limit() {
    let f = fixture();
    let trust = f.service.create_trust("Endowment", None).await.unwrap();

    let tx = f
        .service
        .apply_inflow(inflow(trust.id, MAX_AMOUNT))
        .await
        .unwrap();
    assert_eq!(tx.balance_after, dec!(999999999999.99));

    let err = f
        .service
        .apply_inflow(inflow(trust.id, dec!(0.01)))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::BalanceLimitExceeded { .. }));
    assert_eq!(err.http_status_code(), 400);

    let err = f
        .service
        .apply_inflow(inflow(trust.id, Decimal::MAX))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    assert_eq!(f.service.get_trust(trust.id).await.unwrap().balance, MAX_AMOUNT);
    let report = f.service.reconcile_trust(trust.id).await.unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.transaction_count, 1);

    // The full balance can still be assigned out.
    let tx = f
        .service
        .apply_outflow(outflow(&f, trust.id, MAX_AMOUNT))
        .await
        .unwrap();
    assert_eq!(tx.balance_after, Decimal::ZERO);
}

#[tokio::test]
async fn test_course_detail_and_unknown_course() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.apply_inflow(inflow(trust.id, dec!(500))).await.unwrap();
    f.service.apply_outflow(outflow(&f, trust.id, dec!(120))).await.unwrap();
    f.service.apply_outflow(outflow(&f, trust.id, dec!(80))).await.unwrap();

    let detail = f
        .service
        .course_detail(f.course, &TransactionFilter::new())
        .await
        .unwrap();
    assert_eq!(detail.total_outflow, dec!(200));
    assert_eq!(detail.transactions.len(), 2);
    assert!(detail.transactions[0].created_at > detail.transactions[1].created_at);

    let err = f
        .service
        .course_detail(CourseId::new(), &TransactionFilter::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::CourseNotFound(_)));
}

#[tokio::test]
async fn test_list_transactions_paginates_newest_first() {
    let f = fixture();
    let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();
    for amount in [dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)] {
        f.service.apply_inflow(inflow(trust.id, amount)).await.unwrap();
    }

    let page = f
        .service
        .list_transactions(&TransactionFilter::new(), PageRequest::new(2, 2))
        .await
        .unwrap();
    assert_eq!(page.meta.total, 5);
    assert_eq!(page.meta.total_pages, 3);
    let amounts: Vec<Decimal> = page.data.iter().map(|tx| tx.amount).collect();
    assert_eq!(amounts, vec![dec!(3), dec!(2)]);
}

#[tokio::test]
async fn test_inverted_range_rejected() {
    let f = fixture();
    let filter = TransactionFilter {
        date_range: DateRange {
            from: NaiveDate::from_ymd_opt(2026, 5, 1),
            to: NaiveDate::from_ymd_opt(2026, 4, 1),
        },
        ..TransactionFilter::new()
    };
    let err = f.service.daily_totals(&filter).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidDateRange { .. }));
}

#[tokio::test]
async fn test_trust_summary_and_search() {
    let f = fixture();
    let alumni = f.service.create_trust("Alumni Fund", None).await.unwrap();
    f.service.create_trust("Merit Fund", Some("scholarships".into())).await.unwrap();
    f.service.apply_inflow(inflow(alumni.id, dec!(900))).await.unwrap();
    f.service.apply_outflow(outflow(&f, alumni.id, dec!(400))).await.unwrap();

    let summary = f.service.trust_summary(&TransactionFilter::new()).await.unwrap();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].trust_name, "Alumni Fund");
    assert_eq!(summary[0].net, dec!(500));
    assert_eq!(summary[1].transaction_count, 0);

    let students = f.service.search_students("asha", 10).await.unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].id, f.student);
}

/// Strategy for signed requests in cents: positive values are inflows,
/// negative values are outflow attempts.
fn requests_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(prop_oneof![1i64..200_000i64, -200_000i64..-1i64], 1..25)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// After any sequence of requests the stored balance equals accepted
    /// inflows minus accepted outflows, is never negative, every outflow
    /// carries its student references and no inflow does.
    #[test]
    fn prop_balance_matches_history(requests in requests_strategy()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let f = fixture();
            let trust = f.service.create_trust("Alumni Fund", None).await.unwrap();

            for cents in requests {
                let amount = Decimal::new(cents.abs(), 2);
                let before = f.service.get_trust(trust.id).await.unwrap().balance;
                let result = if cents > 0 {
                    f.service.apply_inflow(inflow(trust.id, amount)).await
                } else {
                    f.service.apply_outflow(outflow(&f, trust.id, amount)).await
                };
                let after = f.service.get_trust(trust.id).await.unwrap().balance;
                match result {
                    Ok(tx) => {
                        prop_assert_eq!(after, tx.balance_after);
                    }
                    Err(LedgerError::InsufficientBalance { .. }) => {
                        prop_assert!(amount > before);
                        prop_assert_eq!(after, before);
                    }
                    Err(other) => {
                        prop_assert!(false, "unexpected error: {:?}", other);
                    }
                }
                prop_assert!(after >= Decimal::ZERO);
            }

            let report = f.service.reconcile_trust(trust.id).await.unwrap();
            prop_assert!(report.is_consistent());

            let all = f
                .service
                .list_transactions(&TransactionFilter::new(), PageRequest::new(1, 1000))
                .await
                .unwrap();
            for tx in &all.data {
                prop_assert!(tx.amount > Decimal::ZERO);
                prop_assert_eq!(tx.is_outflow(), tx.assignment.is_some());
            }
            Ok(())
        })?;
    }
}
