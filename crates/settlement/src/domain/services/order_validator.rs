use bourse_core::{
    AccountType, Instrument, Order, OrderType, Price, Quantity, TradingAccount,
};
use rust_decimal::Decimal;

/// Validates order shape against instrument and account rules
pub struct OrderValidator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the violated constraint (e.g. `lot_size`)
    pub constraint: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(constraint: &'static str, message: impl Into<String>) -> Self {
        ValidationError {
            constraint,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

impl OrderValidator {
    pub fn validate_quantity(
        instrument: &Instrument,
        quantity: Quantity,
    ) -> Result<(), ValidationError> {
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::new(
                "quantity",
                format!("quantity must be positive, got {quantity}"),
            ));
        }
        if !instrument.quantity_aligned(quantity) {
            return Err(ValidationError::new(
                "lot_size",
                format!(
                    "quantity {} is not a multiple of lot size {} for {}",
                    quantity, instrument.lot_size, instrument.symbol
                ),
            ));
        }
        Ok(())
    }

    pub fn validate_price(
        instrument: &Instrument,
        field: &'static str,
        price: Price,
    ) -> Result<(), ValidationError> {
        if price <= Decimal::ZERO {
            return Err(ValidationError::new(
                field,
                format!("{field} must be positive, got {price}"),
            ));
        }
        if !instrument.price_aligned(price) {
            return Err(ValidationError::new(
                "tick_size",
                format!(
                    "{} {} is not a multiple of tick size {} for {}",
                    field, price, instrument.tick_size, instrument.symbol
                ),
            ));
        }
        Ok(())
    }

    /// Prices required by the order type must be present
    pub fn validate_shape(
        order_type: OrderType,
        limit_price: Option<Price>,
        stop_price: Option<Price>,
    ) -> Result<(), ValidationError> {
        if order_type.requires_limit_price() && limit_price.is_none() {
            return Err(ValidationError::new(
                "limit_price",
                format!("limit price is required for {order_type} orders"),
            ));
        }
        if order_type.requires_stop_price() && stop_price.is_none() {
            return Err(ValidationError::new(
                "stop_price",
                format!("stop price is required for {order_type} orders"),
            ));
        }
        Ok(())
    }

    pub fn validate_account_type(account: &TradingAccount) -> Result<(), ValidationError> {
        if account.account_type != AccountType::Cash {
            return Err(ValidationError::new(
                "account_type",
                format!(
                    "account {} is of type {}; only CASH accounts can trade",
                    account.id, account.account_type
                ),
            ));
        }
        Ok(())
    }

    pub fn validate_account_active(account: &TradingAccount) -> Result<(), ValidationError> {
        if !account.is_active() {
            return Err(ValidationError::new(
                "account_status",
                format!("account {} is not active", account.id),
            ));
        }
        Ok(())
    }

    pub fn validate_instrument(instrument: &Instrument) -> Result<(), ValidationError> {
        if !instrument.is_tradable() {
            return Err(ValidationError::new(
                "instrument_status",
                format!(
                    "instrument {} is {} and cannot be traded",
                    instrument.symbol, instrument.status
                ),
            ));
        }
        Ok(())
    }

    /// Full admission check for a new order request
    pub fn validate_admission(
        account: &TradingAccount,
        instrument: &Instrument,
        order_type: OrderType,
        quantity: Quantity,
        limit_price: Option<Price>,
        stop_price: Option<Price>,
    ) -> Result<(), ValidationError> {
        Self::validate_account_type(account)?;
        Self::validate_account_active(account)?;
        Self::validate_instrument(instrument)?;
        Self::validate_quantity(instrument, quantity)?;
        Self::validate_shape(order_type, limit_price, stop_price)?;
        if let Some(price) = limit_price {
            Self::validate_price(instrument, "limit price", price)?;
        }
        if let Some(price) = stop_price {
            Self::validate_price(instrument, "stop price", price)?;
        }
        Ok(())
    }

    /// Basic checks repeated by the settlement engine before it touches money
    pub fn validate_for_settlement(
        order: &Order,
        account: &TradingAccount,
        instrument: &Instrument,
    ) -> Result<(), ValidationError> {
        if order.quantity <= Decimal::ZERO {
            return Err(ValidationError::new(
                "quantity",
                format!("quantity must be positive, got {}", order.quantity),
            ));
        }
        Self::validate_instrument(instrument)?;
        Self::validate_account_type(account)?;
        Self::validate_quantity(instrument, order.quantity)
    }
}
