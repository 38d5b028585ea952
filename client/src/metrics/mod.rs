//! # Derived-Metrics Engine
//!
//! Pure, deterministic aggregates over a collection snapshot. Nothing here
//! touches the network, a clock or a lock; callers pass `today` explicitly
//! where a function needs it.
//!
//! Amounts are unsigned and the record kind gives the sign, so:
//!
//! ```rust
//! use biuai_client::metrics;
//! use rust_decimal::Decimal;
//!
//! let revenue = Decimal::from(100);
//! let expenses = Decimal::from(40);
//! assert_eq!(metrics::efficiency(revenue, expenses), Decimal::from(60));
//! assert_eq!(metrics::efficiency(Decimal::ZERO, expenses), Decimal::ZERO);
//! ```
//!
//! ## Modules
//!
//! - [`period`]: grouping by day/week/month/year and monthly trends
//! - [`kpi`]: dashboard KPIs (efficiency score, savings rate, risk, health,
//!   goal progress, account totals)

pub mod kpi;
pub mod period;

pub use period::{group_by_period, monthly_trends, period_key, MonthlyTrend, Period};

use crate::model::lancamento::{Lancamento, TipoLancamento};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Records grouped under a key, in first-occurrence order.
pub type Groups<'a> = Vec<(String, Vec<&'a Lancamento>)>;

fn sum_where(records: &[Lancamento], tipo: TipoLancamento) -> Decimal {
    records
        .iter()
        .filter(|r| r.tipo == tipo)
        .map(|r| r.valor)
        .sum()
}

/// Σ valor over revenue records.
pub fn revenue(records: &[Lancamento]) -> Decimal {
    sum_where(records, TipoLancamento::Receita)
}

/// Σ valor over expense records (non-negative).
pub fn expenses(records: &[Lancamento]) -> Decimal {
    sum_where(records, TipoLancamento::Despesa)
}

pub fn balance(records: &[Lancamento]) -> Decimal {
    revenue(records) - expenses(records)
}

/// Share of revenue left after expenses, in percent. Zero when there is no
/// revenue.
pub fn efficiency(revenue: Decimal, expenses: Decimal) -> Decimal {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    (revenue - expenses) / revenue * Decimal::ONE_HUNDRED
}

/// Percent change from `previous` to `current`. Zero when `previous` is zero.
pub fn growth(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    (current - previous) / previous * Decimal::ONE_HUNDRED
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrowthTrend {
    pub trend: Trend,
    /// Absolute growth in percent.
    pub magnitude: Decimal,
}

pub fn growth_trend(current: Decimal, previous: Decimal) -> GrowthTrend {
    let g = growth(current, previous);
    let trend = if g > Decimal::ZERO {
        Trend::Up
    } else if g < Decimal::ZERO {
        Trend::Down
    } else {
        Trend::Neutral
    };
    GrowthTrend {
        trend,
        magnitude: g.abs(),
    }
}

/// Arithmetic mean; zero for empty input.
pub fn average(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len())
}

/// Group preserving first-occurrence order of keys.
pub(crate) fn group_by_key<'a>(
    records: &'a [Lancamento],
    key: impl Fn(&Lancamento) -> String,
) -> Groups<'a> {
    let mut groups: Groups<'a> = Vec::new();
    for record in records {
        let k = key(record);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(record),
            None => groups.push((k, vec![record])),
        }
    }
    groups
}

/// Group by category name; records without one go under "Sem categoria".
pub fn group_by_category(records: &[Lancamento]) -> Groups<'_> {
    group_by_key(records, |r| r.categoria_or_default().to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub categoria: String,
    /// Revenue minus expenses inside the category.
    pub total: Decimal,
    pub count: usize,
    /// `|total|` over the sum of `|total|` across categories, in percent.
    pub percentage: Decimal,
}

pub fn category_totals(records: &[Lancamento]) -> Vec<CategoryTotal> {
    let groups = group_by_category(records);
    let totals: Vec<(String, Decimal, usize)> = groups
        .into_iter()
        .map(|(categoria, members)| {
            let total = members.iter().map(|r| r.signed_valor()).sum();
            (categoria, total, members.len())
        })
        .collect();

    let denominator: Decimal = totals.iter().map(|(_, total, _)| total.abs()).sum();

    totals
        .into_iter()
        .map(|(categoria, total, count)| CategoryTotal {
            categoria,
            total,
            count,
            percentage: if denominator.is_zero() {
                Decimal::ZERO
            } else {
                total.abs() / denominator * Decimal::ONE_HUNDRED
            },
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TransactionsSummary {
    pub total: usize,
    pub receitas: usize,
    pub despesas: usize,
    pub today: usize,
}

pub fn transactions_summary(records: &[Lancamento], today: NaiveDate) -> TransactionsSummary {
    TransactionsSummary {
        total: records.len(),
        receitas: records.iter().filter(|r| r.is_receita()).count(),
        despesas: records.iter().filter(|r| r.is_despesa()).count(),
        today: records.iter().filter(|r| r.data == today).count(),
    }
}

/// Headline numbers for a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionMetrics {
    pub count: usize,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
    pub efficiency: Decimal,
    pub balance_positive: bool,
}

pub fn collection_metrics(records: &[Lancamento]) -> CollectionMetrics {
    let revenue = revenue(records);
    let expenses = expenses(records);
    let balance = revenue - expenses;
    CollectionMetrics {
        count: records.len(),
        revenue,
        expenses,
        balance,
        efficiency: efficiency(revenue, expenses),
        balance_positive: balance >= Decimal::ZERO,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_aggregates() {
        let records = vec![receita(1, 100, "2024-01-05"), despesa(2, 40, "2024-01-06")];
        assert_eq!(revenue(&records), Decimal::from(100));
        assert_eq!(expenses(&records), Decimal::from(40));
        assert_eq!(balance(&records), Decimal::from(60));
        assert_eq!(efficiency(revenue(&records), expenses(&records)), Decimal::from(60));

        let m = collection_metrics(&records);
        assert_eq!(m.count, 2);
        assert!(m.balance_positive);
    }

    #[test]
    fn test_division_by_zero_is_safe() {
        assert_eq!(efficiency(Decimal::ZERO, Decimal::from(50)), Decimal::ZERO);
        assert_eq!(growth(Decimal::from(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(average(&[]), Decimal::ZERO);
        assert_eq!(collection_metrics(&[]).efficiency, Decimal::ZERO);
    }

    #[test]
    fn test_growth_trend() {
        let up = growth_trend(Decimal::from(150), Decimal::from(100));
        assert_eq!(up.trend, Trend::Up);
        assert_eq!(up.magnitude, Decimal::from(50));

        let down = growth_trend(Decimal::from(75), Decimal::from(100));
        assert_eq!(down.trend, Trend::Down);
        assert_eq!(down.magnitude, Decimal::from(25));

        assert_eq!(growth_trend(Decimal::ONE, Decimal::ZERO).trend, Trend::Neutral);
    }

    #[test]
    fn test_average() {
        let values = [Decimal::from(10), Decimal::from(20), Decimal::from(60)];
        assert_eq!(average(&values), Decimal::from(30));
    }

    #[test]
    fn test_category_grouping_and_totals() {
        let records = vec![
            lanc(1, TipoLancamento::Despesa, 30, "2024-01-01", Some("Mercado")),
            lanc(2, TipoLancamento::Receita, 200, "2024-01-02", Some("Salário")),
            lanc(3, TipoLancamento::Despesa, 20, "2024-01-03", Some("Mercado")),
            lanc(4, TipoLancamento::Despesa, 50, "2024-01-04", None),
        ];

        let groups = group_by_category(&records);
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["Mercado", "Salário", "Sem categoria"]);

        let totals = category_totals(&records);
        assert_eq!(totals[0].total, Decimal::from(-50));
        assert_eq!(totals[0].count, 2);
        // |−50| + |200| + |−50| = 300
        assert_eq!(totals[1].percentage.round_dp(2), Decimal::new(6667, 2));
        assert_eq!(totals[2].percentage.round_dp(2), Decimal::new(1667, 2));
    }

    #[test]
    fn test_transactions_summary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let records = vec![
            receita(1, 10, "2024-03-10"),
            despesa(2, 5, "2024-03-10"),
            despesa(3, 5, "2024-03-09"),
        ];
        assert_eq!(
            transactions_summary(&records, today),
            TransactionsSummary {
                total: 3,
                receitas: 1,
                despesas: 2,
                today: 2
            }
        );
    }
}
