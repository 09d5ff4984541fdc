use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// `New -> Accepted -> {Filled | Rejected}`. `Canceled` is terminal but no
/// path in the settlement flow produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order has been created but not yet admitted
    New,
    /// Order passed admission and awaits settlement
    Accepted,
    /// Order settled against the reference price
    Filled,
    /// Order was refused (admission or settlement)
    Rejected,
    /// Order was canceled
    Canceled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Rejected | OrderStatus::Canceled
        )
    }

    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::New, OrderStatus::Accepted)
                | (OrderStatus::New, OrderStatus::Rejected)
                | (OrderStatus::New, OrderStatus::Canceled)
                | (OrderStatus::Accepted, OrderStatus::Filled)
                | (OrderStatus::Accepted, OrderStatus::Rejected)
                | (OrderStatus::Accepted, OrderStatus::Canceled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
