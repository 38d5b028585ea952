//! Summary aggregate and chart series.

use super::lancamento::Lancamento;
use crate::metrics;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::dto::lancamento::{CategoriesWire, EvolutionWire, SummaryWire};

/// Totals over a period. `total_despesas` is non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_receitas: Decimal,
    pub total_despesas: Decimal,
    pub saldo: Decimal,
    pub total_lancamentos: u64,
    pub periodo_dias: Option<u32>,
    pub crescimento_receitas: Option<Decimal>,
    pub crescimento_despesas: Option<Decimal>,
}

impl Summary {
    /// Recompute totals from a local collection snapshot.
    pub fn from_records(records: &[Lancamento], periodo_dias: Option<u32>) -> Self {
        let total_receitas = metrics::revenue(records);
        let total_despesas = metrics::expenses(records);
        Self {
            total_receitas,
            total_despesas,
            saldo: total_receitas - total_despesas,
            total_lancamentos: records.len() as u64,
            periodo_dias,
            crescimento_receitas: None,
            crescimento_despesas: None,
        }
    }

    /// Zeroed summary served under `FallbackPolicy::Placeholder`.
    pub fn placeholder(periodo_dias: Option<u32>) -> Self {
        Self {
            total_receitas: Decimal::ZERO,
            total_despesas: Decimal::ZERO,
            saldo: Decimal::ZERO,
            total_lancamentos: 0,
            periodo_dias,
            crescimento_receitas: None,
            crescimento_despesas: None,
        }
    }

    pub fn efficiency(&self) -> Decimal {
        metrics::efficiency(self.total_receitas, self.total_despesas)
    }
}

impl From<SummaryWire> for Summary {
    fn from(wire: SummaryWire) -> Self {
        let total_receitas = wire.total_receitas.abs();
        let total_despesas = wire.total_despesas.abs();
        Self {
            total_receitas,
            total_despesas,
            saldo: wire.saldo.unwrap_or(total_receitas - total_despesas),
            total_lancamentos: wire.total_lancamentos,
            periodo_dias: wire.periodo_dias,
            crescimento_receitas: wire.crescimento_receitas,
            crescimento_despesas: wire.crescimento_despesas,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionPoint {
    pub label: String,
    pub receitas: Decimal,
    pub despesas: Decimal,
}

/// Month-by-month revenue and expenses for the evolution chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyEvolution {
    pub points: Vec<EvolutionPoint>,
}

impl From<EvolutionWire> for MonthlyEvolution {
    /// Series of unequal length are padded with zero.
    fn from(wire: EvolutionWire) -> Self {
        let points = wire
            .labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| EvolutionPoint {
                label,
                receitas: wire.receitas.get(i).copied().unwrap_or_default().abs(),
                despesas: wire.despesas.get(i).copied().unwrap_or_default().abs(),
            })
            .collect();
        Self { points }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub label: String,
    pub value: Decimal,
}

pub fn categories_from_wire(wire: CategoriesWire) -> Vec<CategorySlice> {
    wire.labels
        .into_iter()
        .zip(wire.values)
        .map(|(label, value)| CategorySlice {
            label,
            value: value.abs(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_summary_normalizes_sign_and_saldo() {
        let wire: SummaryWire = serde_json::from_value(json!({
            "total_receitas": 8500, "total_despesas": -3200.5, "count": 12
        }))
        .unwrap();
        let summary = Summary::from(wire);
        assert_eq!(summary.total_despesas, Decimal::new(32005, 1));
        assert_eq!(summary.saldo, Decimal::new(52995, 1));
        assert_eq!(summary.total_lancamentos, 12);
    }

    #[test]
    fn test_evolution_pads_short_series() {
        let wire = EvolutionWire {
            labels: vec!["Jan".to_string(), "Fev".to_string()],
            receitas: vec![Decimal::from(100)],
            despesas: vec![Decimal::from(-40), Decimal::from(-50)],
        };
        let evolution = MonthlyEvolution::from(wire);
        assert_eq!(evolution.points[1].receitas, Decimal::ZERO);
        assert_eq!(evolution.points[1].despesas, Decimal::from(50));
    }

    #[test]
    fn test_placeholder_is_zeroed() {
        let summary = Summary::placeholder(Some(30));
        assert_eq!(summary.saldo, Decimal::ZERO);
        assert_eq!(summary.efficiency(), Decimal::ZERO);
    }
}
