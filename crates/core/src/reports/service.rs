//! Report generation service.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use trustfund_shared::types::{CourseId, TrustId, sum_money};

use super::filter::TransactionFilter;
use super::types::{CourseDetail, CourseSummary, DailyTotal, LedgerTotals, TrustSummary};
use crate::directory::Course;
use crate::ledger::{TransactionKind, Trust, TrustTransaction};

/// Service for aggregating the transaction log.
///
/// Every function is pure over the slice it is given.
pub struct ReportService;

impl ReportService {
    /// Returns the transactions matching `filter`, newest first.
    ///
    /// Ties on `created_at` are broken by the time-ordered ID.
    #[must_use]
    pub fn filter_transactions(
        transactions: &[TrustTransaction],
        filter: &TransactionFilter,
    ) -> Vec<TrustTransaction> {
        let mut matched: Vec<TrustTransaction> = transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        Self::sort_newest_first(&mut matched);
        matched
    }

    /// Sorts transactions newest first.
    pub fn sort_newest_first(transactions: &mut [TrustTransaction]) {
        transactions.sort_by_key(|tx| Reverse((tx.created_at, tx.id)));
    }

    /// Sums outflows per course, ordered by course name.
    ///
    /// Only outflows whose course is in `courses` count. Courses without a
    /// matching outflow are left out.
    #[must_use]
    pub fn summarize_by_course(
        transactions: &[TrustTransaction],
        filter: &TransactionFilter,
        courses: &[Course],
    ) -> Vec<CourseSummary> {
        let names: HashMap<CourseId, &str> =
            courses.iter().map(|c| (c.id, c.name.as_str())).collect();
        let mut totals: HashMap<CourseId, (Decimal, usize)> = HashMap::new();

        for tx in transactions
            .iter()
            .filter(|tx| tx.is_outflow() && filter.matches(tx))
        {
            let Some(course_id) = tx.course_id().filter(|id| names.contains_key(id)) else {
                continue;
            };
            let entry = totals.entry(course_id).or_insert((Decimal::ZERO, 0));
            entry.0 = sum_money(entry.0, tx.amount);
            entry.1 += 1;
        }

        let mut summaries: Vec<CourseSummary> = totals
            .into_iter()
            .map(|(course_id, (total_outflow, transaction_count))| CourseSummary {
                course_id,
                course_name: names.get(&course_id).copied().unwrap_or_default().to_string(),
                total_outflow,
                transaction_count,
            })
            .collect();
        summaries.sort_by(|a, b| {
            a.course_name
                .cmp(&b.course_name)
                .then(a.course_id.cmp(&b.course_id))
        });
        summaries
    }

    /// Lists the outflows of one course, newest first, with their total.
    ///
    /// `filter`'s own course predicate is replaced by `course`.
    #[must_use]
    pub fn detail_for_course(
        transactions: &[TrustTransaction],
        course: &Course,
        filter: &TransactionFilter,
    ) -> CourseDetail {
        let filter = filter
            .clone()
            .for_course(course.id)
            .of_kind(TransactionKind::Outflow);
        let matched = Self::filter_transactions(transactions, &filter);
        CourseDetail {
            course_id: course.id,
            course_name: course.name.clone(),
            total_outflow: matched
                .iter()
                .fold(Decimal::ZERO, |total, tx| sum_money(total, tx.amount)),
            transactions: matched,
        }
    }

    /// Sums inflows and outflows per trust, ordered by trust name.
    ///
    /// Every trust in `trusts` gets a row, even without transactions.
    #[must_use]
    pub fn summarize_by_trust(
        transactions: &[TrustTransaction],
        filter: &TransactionFilter,
        trusts: &[Trust],
    ) -> Vec<TrustSummary> {
        let mut by_trust: HashMap<TrustId, Vec<&TrustTransaction>> = HashMap::new();
        for tx in transactions.iter().filter(|tx| filter.matches(tx)) {
            by_trust.entry(tx.trust_id).or_default().push(tx);
        }

        let mut summaries: Vec<TrustSummary> = trusts
            .iter()
            .filter(|t| filter.trust_id.is_none_or(|id| id == t.id))
            .map(|trust| {
                let own = by_trust.get(&trust.id).map_or(&[][..], Vec::as_slice);
                let totals = Self::totals(own.iter().copied());
                TrustSummary {
                    trust_id: trust.id,
                    trust_name: trust.name.clone(),
                    total_inflow: totals.total_inflow,
                    total_outflow: totals.total_outflow,
                    net: totals.net,
                    transaction_count: totals.transaction_count,
                }
            })
            .collect();
        summaries.sort_by(|a, b| a.trust_name.cmp(&b.trust_name).then(a.trust_id.cmp(&b.trust_id)));
        summaries
    }

    /// Sums inflows and outflows per UTC calendar day, newest day first.
    #[must_use]
    pub fn daily_totals(
        transactions: &[TrustTransaction],
        filter: &TransactionFilter,
    ) -> Vec<DailyTotal> {
        let mut days: BTreeMap<chrono::NaiveDate, Vec<&TrustTransaction>> = BTreeMap::new();
        for tx in transactions.iter().filter(|tx| filter.matches(tx)) {
            days.entry(tx.created_at.date_naive()).or_default().push(tx);
        }

        days.into_iter()
            .rev()
            .map(|(date, txs)| {
                let totals = Self::totals(txs);
                DailyTotal {
                    date,
                    total_inflow: totals.total_inflow,
                    total_outflow: totals.total_outflow,
                    transaction_count: totals.transaction_count,
                }
            })
            .collect()
    }

    /// Sums a list of transactions.
    #[must_use]
    pub fn totals<'a, I>(transactions: I) -> LedgerTotals
    where
        I: IntoIterator<Item = &'a TrustTransaction>,
    {
        let mut totals = LedgerTotals::default();
        for tx in transactions {
            match tx.kind {
                TransactionKind::Inflow => {
                    totals.total_inflow = sum_money(totals.total_inflow, tx.amount);
                }
                TransactionKind::Outflow => {
                    totals.total_outflow = sum_money(totals.total_outflow, tx.amount);
                }
            }
            totals.transaction_count += 1;
        }
        totals.net = totals.total_inflow.saturating_sub(totals.total_outflow);
        totals
    }
}
