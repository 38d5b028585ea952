//! Pre-flight validation of user input.
//!
//! Convenience checks run before a request is sent. They return every
//! problem found as a human-readable message; an empty list means the input
//! looks acceptable. The server still validates everything.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::dto::conta::ContaCreate;
use shared::dto::lancamento::LancamentoCreate;
use shared::dto::meta::MetaCreate;

/// Longest chat message accepted, in characters.
pub const MAX_CHAT_MESSAGE_CHARS: usize = 2000;

/// Minimum password length for registration.
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validar_lancamento(lancamento: &LancamentoCreate) -> Vec<String> {
    let mut erros = Vec::new();
    if lancamento.descricao.trim().is_empty() {
        erros.push("Descrição é obrigatória".to_string());
    }
    if lancamento.valor <= Decimal::ZERO {
        erros.push("Valor deve ser maior que zero".to_string());
    }
    erros
}

pub fn validar_conta(conta: &ContaCreate) -> Vec<String> {
    let mut erros = Vec::new();
    if conta.nome.trim().is_empty() {
        erros.push("Nome da conta é obrigatório".to_string());
    }
    if conta.banco.trim().is_empty() {
        erros.push("Banco é obrigatório".to_string());
    }
    if conta.tipo_conta.trim().is_empty() {
        erros.push("Tipo de conta é obrigatório".to_string());
    }
    if let Some(numero) = conta.numero_conta.as_deref().filter(|n| !n.is_empty()) {
        if numero.chars().count() < 4 {
            erros.push("Número da conta deve ter pelo menos 4 dígitos".to_string());
        }
    }
    if let Some(agencia) = conta.agencia.as_deref().filter(|a| !a.is_empty()) {
        if agencia.chars().count() < 3 {
            erros.push("Agência deve ter pelo menos 3 dígitos".to_string());
        }
    }
    if conta.saldo_inicial.is_none() {
        erros.push("Saldo inicial é obrigatório".to_string());
    }
    erros
}

pub fn validar_meta(meta: &MetaCreate) -> Vec<String> {
    let mut erros = Vec::new();
    if meta.titulo.trim().is_empty() {
        erros.push("Título é obrigatório".to_string());
    }
    if meta.valor_meta <= Decimal::ZERO {
        erros.push("Valor da meta deve ser maior que zero".to_string());
    }
    erros.extend(validar_periodo(Some(meta.data_inicio), Some(meta.data_fim)));
    erros
}

/// Goal period checks, usable on partially filled forms.
pub fn validar_periodo(data_inicio: Option<NaiveDate>, data_fim: Option<NaiveDate>) -> Vec<String> {
    let mut erros = Vec::new();
    match (data_inicio, data_fim) {
        (None, None) => {
            erros.push("Data de início é obrigatória".to_string());
            erros.push("Data de fim é obrigatória".to_string());
        }
        (None, Some(_)) => erros.push("Data de início é obrigatória".to_string()),
        (Some(_), None) => erros.push("Data de fim é obrigatória".to_string()),
        (Some(inicio), Some(fim)) if fim <= inicio => {
            erros.push("Data de fim deve ser posterior à data de início".to_string());
        }
        _ => {}
    }
    erros
}

pub fn validar_mensagem_chat(message: &str) -> Vec<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return vec!["Mensagem não pode estar vazia".to_string()];
    }
    if trimmed.chars().count() > MAX_CHAT_MESSAGE_CHARS {
        return vec![format!(
            "Mensagem muito longa (máximo {} caracteres)",
            MAX_CHAT_MESSAGE_CHARS
        )];
    }
    Vec::new()
}

pub fn validar_email(email: &str) -> Vec<String> {
    let email = email.trim();
    if email.is_empty() {
        return vec!["Email é obrigatório".to_string()];
    }

    let Some((user, domain)) = email.split_once('@') else {
        return vec!["Formato de email inválido".to_string()];
    };
    if user.is_empty() || domain.contains('@') {
        return vec!["Formato de email inválido".to_string()];
    }
    if domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return vec!["Domínio de email inválido".to_string()];
    }
    Vec::new()
}

/// Password strength for registration. Unlike the other checks this reports
/// every failed rule at once.
pub fn validar_senha(password: &str) -> Vec<String> {
    if password.is_empty() {
        return vec!["Senha é obrigatória".to_string()];
    }

    let mut erros = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        erros.push(format!("Senha deve ter pelo menos {} caracteres", MIN_PASSWORD_LEN));
    }
    if !password.chars().any(char::is_uppercase) {
        erros.push("Senha deve conter pelo menos uma letra maiúscula".to_string());
    }
    if !password.chars().any(char::is_lowercase) {
        erros.push("Senha deve conter pelo menos uma letra minúscula".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        erros.push("Senha deve conter pelo menos um número".to_string());
    }
    erros
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::dto::lancamento::TipoLancamento;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_lancamento_validation() {
        let mut lancamento = LancamentoCreate {
            descricao: "Aluguel".to_string(),
            valor: Decimal::from(1500),
            tipo: TipoLancamento::Despesa,
            data_lancamento: d(2025, 1, 5),
            categoria_id: None,
            conta_id: None,
        };
        assert!(validar_lancamento(&lancamento).is_empty());

        lancamento.descricao = "  ".to_string();
        lancamento.valor = Decimal::ZERO;
        assert_eq!(validar_lancamento(&lancamento).len(), 2);
    }

    #[test]
    fn test_conta_validation() {
        let conta = ContaCreate {
            nome: String::new(),
            banco: "Nubank".to_string(),
            tipo_conta: "CORRENTE".to_string(),
            agencia: Some("12".to_string()),
            numero_conta: Some("123".to_string()),
            saldo_inicial: None,
        };
        assert_eq!(
            validar_conta(&conta),
            vec![
                "Nome da conta é obrigatório",
                "Número da conta deve ter pelo menos 4 dígitos",
                "Agência deve ter pelo menos 3 dígitos",
                "Saldo inicial é obrigatório",
            ]
        );
    }

    #[test]
    fn test_meta_validation() {
        let meta = MetaCreate {
            titulo: "Viagem".to_string(),
            descricao: None,
            valor_meta: Decimal::from(5000),
            data_inicio: d(2025, 6, 1),
            data_fim: d(2025, 6, 1),
            categoria_id: None,
        };
        assert_eq!(
            validar_meta(&meta),
            vec!["Data de fim deve ser posterior à data de início"]
        );
        assert_eq!(validar_periodo(None, Some(d(2025, 1, 1))), vec!["Data de início é obrigatória"]);
        assert!(validar_periodo(Some(d(2025, 1, 1)), Some(d(2025, 12, 31))).is_empty());
    }

    #[test]
    fn test_chat_message_validation() {
        assert!(validar_mensagem_chat("Quanto gastei este mês?").is_empty());
        assert_eq!(validar_mensagem_chat("   ").len(), 1);
        assert!(validar_mensagem_chat(&"a".repeat(2000)).is_empty());
        assert_eq!(validar_mensagem_chat(&"a".repeat(2001)).len(), 1);
        // Surrounding whitespace does not count toward the limit
        assert!(validar_mensagem_chat(&format!("  {}  ", "é".repeat(2000))).is_empty());
    }

    #[test]
    fn test_email_validation() {
        assert!(validar_email("ana@example.com").is_empty());
        assert!(validar_email("user@domain.co.uk").is_empty());
        assert!(!validar_email("").is_empty());
        assert!(!validar_email("invalid").is_empty());
        assert!(!validar_email("@example.com").is_empty());
        assert!(!validar_email("ana@").is_empty());
        assert!(!validar_email("ana@localhost").is_empty());
    }

    #[test]
    fn test_password_validation() {
        assert!(validar_senha("SecurePass123").is_empty());
        assert_eq!(validar_senha("").len(), 1);
        assert!(!validar_senha("short1A").is_empty());
        assert!(!validar_senha("nouppercase123").is_empty());
        assert!(!validar_senha("NOLOWERCASE123").is_empty());
        assert_eq!(validar_senha("NoDigitsHere"), vec!["Senha deve conter pelo menos um número"]);
    }
}
