//! Two-step lookups shared by margin evaluation and order admission.

use bourse_core::{Instrument, InstrumentId, MarginRule, TradingAccount};
use bourse_ports::{InstrumentRepository, MarginRuleRepository, TradingStore};

use crate::error::{EngineError, Result};

/// Resolve an instrument by symbol first, then by numeric id
pub async fn resolve_instrument(
    instruments: &dyn InstrumentRepository,
    reference: &str,
) -> Result<Instrument> {
    let reference = reference.trim();
    if let Some(instrument) = instruments.find_by_symbol(reference).await {
        return Ok(instrument);
    }
    if let Ok(id) = reference.parse::<InstrumentId>() {
        if let Some(instrument) = instruments.get(id).await {
            return Ok(instrument);
        }
    }
    Err(EngineError::not_found("instrument", reference))
}

/// The single trading account of a trader
pub async fn resolve_account(store: &dyn TradingStore, trader_login: &str) -> Result<TradingAccount> {
    let mut accounts = store.find_accounts_by_trader(trader_login).await;
    match accounts.len() {
        1 => Ok(accounts.remove(0)),
        0 => Err(EngineError::not_found("trading account", trader_login)),
        n => Err(EngineError::not_found(
            "unique trading account",
            format!("{trader_login} ({n} accounts)"),
        )),
    }
}

/// Margin rule for the instrument's scope, with the equity F&O fallback
pub async fn resolve_margin_rule(
    rules: &dyn MarginRuleRepository,
    instrument: &Instrument,
) -> Result<MarginRule> {
    let scope = instrument.margin_scope();
    if let Some(rule) = rules.find(&scope).await {
        return Ok(rule);
    }
    if let Some(fallback) = instrument.fallback_margin_scope() {
        if let Some(rule) = rules.find(&fallback).await {
            tracing::debug!(%scope, %fallback, "using fallback margin rule");
            return Ok(rule);
        }
    }
    Err(EngineError::not_found("margin rule", scope))
}
