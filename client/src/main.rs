//! # BIUAI Client Driver
//!
//! Small command-line entry point over [`ClientContext`], mostly for checking
//! a backend by hand.
//!
//! ```text
//! biuai status      # config, session and cache buckets
//! biuai dashboard   # load every dashboard widget once
//! biuai chat        # chatbot health
//! ```
//!
//! Credentials come from `BIUAI_EMAIL` / `BIUAI_PASSWORD` when no persisted
//! session is valid.

use anyhow::Context;
use biuai_client::services::api::chatbot;
use biuai_client::{debug, ClientConfig, ClientContext};
use shared::utils::{format_currency, format_percentage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    debug::init_logger();

    let config = ClientConfig::from_env().map_err(anyhow::Error::msg)?;
    let ctx = ClientContext::from_config(config).context("Failed to build client context")?;

    let command = std::env::args().nth(1).unwrap_or_else(|| "status".to_string());
    match command.as_str() {
        "status" => status(&ctx),
        "dashboard" => dashboard(&ctx).await?,
        "chat" => {
            let health = chatbot::health(&ctx.chatbot).await?;
            println!("chatbot: {}", health.status);
        }
        other => anyhow::bail!("Unknown command '{}' (expected status, dashboard or chat)", other),
    }
    Ok(())
}

fn status(ctx: &ClientContext) {
    println!("api:      {}", ctx.config.api_url);
    println!("chatbot:  {}", ctx.config.chatbot_url);
    println!("fallback: {:?}", ctx.config.fallback);
    match ctx.session.user() {
        Some(user) => println!("session:  {} (id {})", user.email, user.id),
        None => println!("session:  none"),
    }
    for (key, status) in ctx.cache_status() {
        println!("cache {:<13} valid={} age={:?}", key.as_str(), status.valid, status.age);
    }
}

async fn dashboard(ctx: &ClientContext) -> anyhow::Result<()> {
    if !ctx.auth.check_auth().await {
        let email = std::env::var("BIUAI_EMAIL").context("No valid session and BIUAI_EMAIL is not set")?;
        let password = std::env::var("BIUAI_PASSWORD").context("BIUAI_PASSWORD is not set")?;
        ctx.auth.login(&email, &password).await?;
    }

    let data = ctx.dashboard.load_all().await;
    match &data.summary {
        Ok(summary) => println!(
            "saldo {} (receitas {}, despesas {}) [{:?}]",
            format_currency(summary.data.saldo),
            format_currency(summary.data.total_receitas),
            format_currency(summary.data.total_despesas),
            summary.origin
        ),
        Err(e) => println!("summary: {}", e),
    }
    if let Some(kpis) = data.kpis() {
        println!(
            "eficiência {}, poupança {}",
            kpis.efficiency_score.round_dp(1),
            format_percentage(kpis.savings_rate, 1)
        );
    }
    if let Ok(insights) = &data.insights {
        for insight in &insights.data {
            println!("- {}: {}", insight.title, insight.description);
        }
    }
    if data.failures() > 0 {
        println!("{} widget(s) failed to load", data.failures());
    }
    for (endpoint, avg) in ctx.dashboard.response_times().averages() {
        println!("{:<13} {} ms", endpoint, avg.as_millis());
    }
    Ok(())
}
