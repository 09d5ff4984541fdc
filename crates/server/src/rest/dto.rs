use bourse_core::{
    AccountId, AccountStatus, AccountType, Execution, Instrument, InstrumentId, LedgerEntry,
    LedgerEntryType, MarginAssessment, Money, Order, OrderId, OrderStatus, OrderType, Position,
    Price, Quantity, Side, TimeInForce, Timestamp, TradingAccount,
};
use bourse_settlement::{LedgerReconciliation, SubmitOrderResult};
use serde::{Deserialize, Serialize};

/// Request to submit an order through the margin-checked path
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderRequest {
    /// Symbol or numeric instrument id
    pub instrument: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(default)]
    pub time_in_force: Option<String>,
    pub quantity: String,
    #[serde(default)]
    pub limit_price: Option<String>,
    #[serde(default)]
    pub stop_price: Option<String>,
}

/// Request to place an order directly, without a margin check
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceTradingOrderRequest {
    pub instrument_id: i64,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    pub quantity: String,
    #[serde(default)]
    pub limit_price: Option<String>,
    #[serde(default)]
    pub stop_price: Option<String>,
    #[serde(default)]
    pub time_in_force: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PingResponse {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub quantity: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub status: OrderStatus,
    pub venue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        OrderResponse {
            order_id: order.id,
            account_id: order.account_id,
            instrument_id: order.instrument_id,
            side: order.side,
            order_type: order.order_type,
            quantity: order.quantity,
            limit_price: order.limit_price,
            stop_price: order.stop_price,
            time_in_force: order.time_in_force,
            status: order.status,
            venue: order.venue.clone(),
            rejection_reason: order.rejection_reason.clone(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginAssessmentResponse {
    pub scope: String,
    pub notional: Money,
    pub initial_requirement: Money,
    pub maintenance_requirement: Money,
    pub available_balance: Money,
    pub remaining_balance: Money,
    pub sufficient: bool,
}

impl From<&MarginAssessment> for MarginAssessmentResponse {
    fn from(a: &MarginAssessment) -> Self {
        MarginAssessmentResponse {
            scope: a.scope.clone(),
            notional: a.notional,
            initial_requirement: a.initial_requirement,
            maintenance_requirement: a.maintenance_requirement,
            available_balance: a.available_balance,
            remaining_balance: a.remaining_balance,
            sufficient: a.sufficient,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderResponse {
    pub order: OrderResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionResponse>,
    pub margin_assessment: MarginAssessmentResponse,
}

impl SubmitOrderResponse {
    pub fn new(result: &SubmitOrderResult, execution: Option<&Execution>) -> Self {
        SubmitOrderResponse {
            order: OrderResponse::from(&result.order),
            execution: execution.map(ExecutionResponse::from),
            margin_assessment: MarginAssessmentResponse::from(&result.margin_assessment),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    pub execution_id: i64,
    pub order_id: OrderId,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
    pub fee: Money,
    pub executed_at: Timestamp,
}

impl From<&Execution> for ExecutionResponse {
    fn from(e: &Execution) -> Self {
        ExecutionResponse {
            execution_id: e.id.0,
            order_id: e.order_id,
            side: e.side,
            quantity: e.quantity,
            price: e.price,
            fee: e.fee,
            executed_at: e.executed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: AccountId,
    pub trader_login: String,
    pub broker_code: String,
    pub account_type: AccountType,
    pub currency: String,
    pub balance: Money,
    pub status: AccountStatus,
    pub version: u64,
}

impl From<&TradingAccount> for AccountResponse {
    fn from(account: &TradingAccount) -> Self {
        AccountResponse {
            account_id: account.id,
            trader_login: account.trader_login.clone(),
            broker_code: account.broker_code.clone(),
            account_type: account.account_type,
            currency: account.currency.clone(),
            balance: account.balance,
            status: account.status,
            version: account.version,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub instrument_id: InstrumentId,
    pub quantity: Quantity,
    pub avg_cost: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_price: Option<Price>,
    pub unrealized_pnl: Money,
    pub realized_pnl: Money,
    pub updated_at: Timestamp,
}

impl From<&Position> for PositionResponse {
    fn from(p: &Position) -> Self {
        PositionResponse {
            instrument_id: p.instrument_id,
            quantity: p.quantity,
            avg_cost: p.avg_cost,
            last_price: p.last_price,
            unrealized_pnl: p.unrealized_pnl,
            realized_pnl: p.realized_pnl,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryResponse {
    pub entry_id: i64,
    pub entry_type: LedgerEntryType,
    pub amount: Money,
    pub fee: Money,
    pub currency: String,
    pub description: String,
    pub reference: String,
    pub balance_after: Money,
    pub created_at: Timestamp,
}

impl From<&LedgerEntry> for LedgerEntryResponse {
    fn from(e: &LedgerEntry) -> Self {
        LedgerEntryResponse {
            entry_id: e.id.0,
            entry_type: e.entry_type,
            amount: e.amount,
            fee: e.fee,
            currency: e.currency.clone(),
            description: e.description.clone(),
            reference: e.reference.clone(),
            balance_after: e.balance_after,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResponse {
    pub account_id: AccountId,
    pub balance: Money,
    pub ledger_balance: Money,
    pub entry_count: usize,
    pub consistent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&LedgerReconciliation> for ReconciliationResponse {
    fn from(r: &LedgerReconciliation) -> Self {
        ReconciliationResponse {
            account_id: r.account_id,
            balance: r.balance,
            ledger_balance: r.ledger_balance,
            entry_count: r.entry_count,
            consistent: r.consistent,
            error: r.error.as_ref().map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepositRequest {
    pub amount: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetPriceRequest {
    pub price: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub instrument_id: InstrumentId,
    pub symbol: String,
    pub price: Price,
}

impl PriceResponse {
    pub fn new(instrument: &Instrument, price: Price) -> Self {
        PriceResponse {
            instrument_id: instrument.id,
            symbol: instrument.symbol.clone(),
            price,
        }
    }
}

/// Error body: `{ "code": "...", "message": "...", "assessment": {...}? }`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<MarginAssessmentResponse>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorResponse {
            code: code.into(),
            message: message.into(),
            assessment: None,
        }
    }
}
