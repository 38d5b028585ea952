//! Dashboard KPIs derived from the summary, goals and accounts.

use crate::model::conta::Conta;
use crate::model::meta::{Meta, StatusMeta};
use crate::model::summary::Summary;
use crate::notify::{Priority, ToastKind};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Monthly savings target used by the economy KPI.
pub const TARGET_ECONOMY: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

/// Most insights shown at once.
pub const MAX_INSIGHTS: usize = 5;

const TEN: Decimal = Decimal::TEN;

fn revenue_or_one(summary: &Summary) -> Decimal {
    let r = summary.total_receitas.abs();
    if r.is_zero() {
        Decimal::ONE
    } else {
        r
    }
}

/// Share of revenue kept, scaled to 0..=10.
pub fn efficiency_score(summary: &Summary) -> Decimal {
    let r = revenue_or_one(summary);
    let d = summary.total_despesas.abs();
    ((r - d) / r * TEN).clamp(Decimal::ZERO, TEN)
}

/// Percent of revenue not spent. Negative when spending exceeds revenue.
pub fn savings_rate(summary: &Summary) -> Decimal {
    let r = revenue_or_one(summary);
    let d = summary.total_despesas.abs();
    (r - d) / r * Decimal::ONE_HUNDRED
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

pub fn risk_level(summary: &Summary) -> RiskLevel {
    let rate = savings_rate(summary);
    if rate >= Decimal::from(20) {
        RiskLevel::Low
    } else if rate >= TEN {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

pub fn financial_health(summary: &Summary) -> FinancialHealth {
    let score = efficiency_score(summary);
    let rate = savings_rate(summary);
    if score >= Decimal::from(7) && rate >= Decimal::from(20) {
        FinancialHealth::Excellent
    } else if score >= Decimal::from(5) && rate >= TEN {
        FinancialHealth::Good
    } else if score >= Decimal::from(3) && rate >= Decimal::from(5) {
        FinancialHealth::Fair
    } else {
        FinancialHealth::Poor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyTrend {
    Improving,
    Stable,
    Declining,
}

pub fn efficiency_trend(summary: &Summary) -> EfficiencyTrend {
    let score = efficiency_score(summary);
    if score >= Decimal::from(7) {
        EfficiencyTrend::Improving
    } else if score >= Decimal::from(5) {
        EfficiencyTrend::Stable
    } else {
        EfficiencyTrend::Declining
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyKpis {
    pub target_economy: Decimal,
    pub current_economy: Decimal,
    /// Capped at 100.
    pub economy_percentage: Decimal,
    pub growth_rate: Decimal,
    pub efficiency_score: Decimal,
    pub savings_rate: Decimal,
    pub monthly_goal_achieved: bool,
}

pub fn monthly_kpis(summary: &Summary) -> MonthlyKpis {
    let current_economy = summary.saldo.max(Decimal::ZERO);
    let economy_percentage = current_economy / TARGET_ECONOMY * Decimal::ONE_HUNDRED;
    MonthlyKpis {
        target_economy: TARGET_ECONOMY,
        current_economy,
        economy_percentage: economy_percentage.min(Decimal::ONE_HUNDRED),
        growth_rate: summary.crescimento_receitas.unwrap_or_default(),
        efficiency_score: efficiency_score(summary),
        savings_rate: savings_rate(summary),
        monthly_goal_achieved: economy_percentage >= Decimal::ONE_HUNDRED,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub revenue_growth: Decimal,
    pub expense_growth: Decimal,
    pub efficiency_trend: EfficiencyTrend,
    pub risk_level: RiskLevel,
    pub financial_health: FinancialHealth,
}

pub fn trend_analysis(summary: &Summary) -> TrendAnalysis {
    TrendAnalysis {
        revenue_growth: summary.crescimento_receitas.unwrap_or_default(),
        expense_growth: summary.crescimento_despesas.unwrap_or_default(),
        efficiency_trend: efficiency_trend(summary),
        risk_level: risk_level(summary),
        financial_health: financial_health(summary),
    }
}

/// `valor_atual / valor_meta` in percent, capped at 100. Zero for a
/// non-positive target.
pub fn goal_progress(meta: &Meta) -> Decimal {
    if meta.valor_meta <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (meta.valor_atual / meta.valor_meta * Decimal::ONE_HUNDRED)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Whole days until the deadline, never negative.
pub fn days_remaining(meta: &Meta, today: NaiveDate) -> i64 {
    (meta.data_fim - today).num_days().max(0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalsProgress {
    pub completed: usize,
    pub in_progress: usize,
    pub total: usize,
    pub completion_rate: Decimal,
}

pub fn goals_progress(metas: &[Meta]) -> GoalsProgress {
    let completed = metas.iter().filter(|m| m.status == StatusMeta::Concluida).count();
    let in_progress = metas.iter().filter(|m| m.status == StatusMeta::Ativa).count();
    let total = metas.len();
    let completion_rate = if total == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(completed) / Decimal::from(total) * Decimal::ONE_HUNDRED
    };
    GoalsProgress {
        completed,
        in_progress,
        total,
        completion_rate,
    }
}

/// Σ saldo_atual over active accounts.
pub fn active_accounts_total(contas: &[Conta]) -> Decimal {
    contas.iter().filter(|c| c.ativa).map(|c| c.saldo_atual).sum()
}

/// Accounts grouped by bank, banks in first-occurrence order.
pub fn accounts_by_bank(contas: &[Conta]) -> Vec<(String, Vec<&Conta>)> {
    let mut groups: Vec<(String, Vec<&Conta>)> = Vec::new();
    for conta in contas {
        match groups.iter_mut().find(|(banco, _)| *banco == conta.banco) {
            Some((_, members)) => members.push(conta),
            None => groups.push((conta.banco.clone(), vec![conta])),
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub kind: ToastKind,
    pub priority: Priority,
}

/// Rule-based observations on a summary, at most [`MAX_INSIGHTS`].
pub fn insights(summary: &Summary) -> Vec<Insight> {
    let mut out = Vec::new();

    if summary.saldo > Decimal::ZERO {
        out.push(Insight {
            title: "Saldo Positivo Mantido".to_string(),
            description: format!(
                "Seu saldo está positivo em {}",
                shared::utils::format_currency(summary.saldo)
            ),
            kind: ToastKind::Success,
            priority: Priority::Medium,
        });
    }

    if let Some(growth) = summary.crescimento_receitas.filter(|g| *g > TEN) {
        out.push(Insight {
            title: "Receitas em Crescimento".to_string(),
            description: format!("Suas receitas cresceram {}% no período", growth.round_dp(1)),
            kind: ToastKind::Success,
            priority: Priority::High,
        });
    }

    if summary.total_lancamentos < 10 {
        out.push(Insight {
            title: "Poucos Lançamentos".to_string(),
            description: "Registre mais transações para análises precisas".to_string(),
            kind: ToastKind::Info,
            priority: Priority::Medium,
        });
    }

    if summary.total_despesas > summary.total_receitas {
        out.push(Insight {
            title: "Despesas Acima das Receitas".to_string(),
            description: "Seus gastos superaram suas receitas no período".to_string(),
            kind: ToastKind::Warning,
            priority: Priority::High,
        });
    }

    out.truncate(MAX_INSIGHTS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::conta::TipoConta;

    fn summary(receitas: i64, despesas: i64) -> Summary {
        let mut s = Summary::placeholder(Some(30));
        s.total_receitas = Decimal::from(receitas);
        s.total_despesas = Decimal::from(despesas);
        s.saldo = s.total_receitas - s.total_despesas;
        s.total_lancamentos = 20;
        s
    }

    fn meta(valor_meta: i64, valor_atual: i64, status: StatusMeta) -> Meta {
        Meta {
            id: 1,
            titulo: "Viagem".to_string(),
            descricao: None,
            valor_meta: Decimal::from(valor_meta),
            valor_atual: Decimal::from(valor_atual),
            data_inicio: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            data_fim: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            status,
            categoria_id: None,
        }
    }

    fn conta(id: i64, banco: &str, saldo: i64, ativa: bool) -> Conta {
        Conta {
            id,
            nome: format!("Conta {}", id),
            banco: banco.to_string(),
            tipo_conta: TipoConta::Corrente,
            agencia: None,
            numero_conta: None,
            saldo_inicial: Decimal::ZERO,
            saldo_atual: Decimal::from(saldo),
            ativa,
        }
    }

    #[test]
    fn test_score_and_rate() {
        let s = summary(10000, 6000);
        assert_eq!(efficiency_score(&s), Decimal::from(4));
        assert_eq!(savings_rate(&s), Decimal::from(40));
        assert_eq!(risk_level(&s), RiskLevel::Low);
        assert_eq!(financial_health(&s), FinancialHealth::Fair);
        assert_eq!(efficiency_trend(&s), EfficiencyTrend::Declining);
    }

    #[test]
    fn test_score_is_clamped_and_zero_revenue_is_safe() {
        let s = summary(0, 500);
        assert_eq!(efficiency_score(&s), Decimal::ZERO);
        assert_eq!(risk_level(&s), RiskLevel::High);
        assert_eq!(financial_health(&s), FinancialHealth::Poor);

        let s = summary(1000, 0);
        assert_eq!(efficiency_score(&s), TEN);
        assert_eq!(financial_health(&s), FinancialHealth::Excellent);
    }

    #[test]
    fn test_monthly_kpis_cap() {
        let kpis = monthly_kpis(&summary(20000, 5000));
        assert_eq!(kpis.current_economy, Decimal::from(15000));
        assert_eq!(kpis.economy_percentage, Decimal::ONE_HUNDRED);
        assert!(kpis.monthly_goal_achieved);

        let kpis = monthly_kpis(&summary(100, 500));
        assert_eq!(kpis.current_economy, Decimal::ZERO);
        assert!(!kpis.monthly_goal_achieved);
    }

    #[test]
    fn test_goal_progress() {
        assert_eq!(goal_progress(&meta(1000, 250, StatusMeta::Ativa)), Decimal::from(25));
        assert_eq!(goal_progress(&meta(1000, 1500, StatusMeta::Ativa)), Decimal::ONE_HUNDRED);
        assert_eq!(goal_progress(&meta(0, 100, StatusMeta::Ativa)), Decimal::ZERO);
    }

    #[test]
    fn test_days_remaining_never_negative() {
        let m = meta(1, 0, StatusMeta::Ativa);
        assert_eq!(days_remaining(&m, NaiveDate::from_ymd_opt(2025, 1, 21).unwrap()), 10);
        assert_eq!(days_remaining(&m, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()), 0);
    }

    #[test]
    fn test_goals_completion_rate() {
        let metas = vec![
            meta(1, 1, StatusMeta::Concluida),
            meta(1, 0, StatusMeta::Ativa),
            meta(1, 0, StatusMeta::Pausada),
            meta(1, 1, StatusMeta::Concluida),
        ];
        let progress = goals_progress(&metas);
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.in_progress, 1);
        assert_eq!(progress.completion_rate, Decimal::from(50));
        assert_eq!(goals_progress(&[]).completion_rate, Decimal::ZERO);
    }

    #[test]
    fn test_accounts() {
        let contas = vec![
            conta(1, "Nubank", 100, true),
            conta(2, "Itaú", 50, false),
            conta(3, "Nubank", 25, true),
        ];
        assert_eq!(active_accounts_total(&contas), Decimal::from(125));
        let by_bank = accounts_by_bank(&contas);
        assert_eq!(by_bank[0].0, "Nubank");
        assert_eq!(by_bank[0].1.len(), 2);
        assert_eq!(by_bank[1].0, "Itaú");
    }

    #[test]
    fn test_insights_rules() {
        let mut s = summary(1000, 400);
        s.crescimento_receitas = Some(Decimal::from(15));
        s.total_lancamentos = 3;
        let titles: Vec<String> = insights(&s).into_iter().map(|i| i.title).collect();
        assert_eq!(
            titles,
            vec!["Saldo Positivo Mantido", "Receitas em Crescimento", "Poucos Lançamentos"]
        );

        let s = summary(100, 400);
        let found = insights(&s);
        assert!(found.iter().any(|i| i.kind == ToastKind::Warning));
        assert!(found.len() <= MAX_INSIGHTS);
    }
}
