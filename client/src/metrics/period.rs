//! Time-based grouping.

use super::{group_by_key, Groups};
use crate::model::lancamento::Lancamento;
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    /// Keyed by the Monday that starts the ISO week.
    Week,
    Month,
    Year,
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "dia" => Ok(Period::Day),
            "week" | "semana" => Ok(Period::Week),
            "month" | "mes" | "mês" => Ok(Period::Month),
            "year" | "ano" => Ok(Period::Year),
            other => Err(format!("unknown period '{}'", other)),
        }
    }
}

/// Group key for `date`: `YYYY-MM-DD` for day and week, `YYYY-MM` for month,
/// `YYYY` for year.
pub fn period_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Day => date.format("%Y-%m-%d").to_string(),
        Period::Week => {
            let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
            monday.format("%Y-%m-%d").to_string()
        }
        Period::Month => format!("{:04}-{:02}", date.year(), date.month()),
        Period::Year => format!("{:04}", date.year()),
    }
}

/// Groups in first-occurrence order.
pub fn group_by_period(records: &[Lancamento], period: Period) -> Groups<'_> {
    group_by_key(records, |r| period_key(r.data, period))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub receitas: Decimal,
    pub despesas: Decimal,
    pub saldo: Decimal,
    pub count: usize,
}

/// Per-month totals sorted ascending by month.
pub fn monthly_trends(records: &[Lancamento]) -> Vec<MonthlyTrend> {
    let mut trends: Vec<MonthlyTrend> = group_by_period(records, Period::Month)
        .into_iter()
        .map(|(month, members)| {
            let receitas: Decimal = members.iter().filter(|r| r.is_receita()).map(|r| r.valor).sum();
            let despesas: Decimal = members.iter().filter(|r| r.is_despesa()).map(|r| r.valor).sum();
            MonthlyTrend {
                month,
                receitas,
                despesas,
                saldo: receitas - despesas,
                count: members.len(),
            }
        })
        .collect();
    trends.sort_by(|a, b| a.month.cmp(&b.month));
    trends
}
