//! Order lifecycle state machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The status of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// Received ──► Paid ──► Preparing ──► Ready ──► Finalized
///     │          │
///     └──────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order placed at the kiosk, awaiting payment.
    #[default]
    Received,

    /// Payment confirmed by the provider.
    Paid,

    /// Kitchen is preparing the order.
    Preparing,

    /// Order is ready for pickup.
    Ready,

    /// Order was picked up (terminal state).
    Finalized,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Received,
        OrderStatus::Paid,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Finalized,
        OrderStatus::Cancelled,
    ];

    /// Returns the statuses reachable from this one in a single step.
    pub fn allowed_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Received => &[OrderStatus::Paid, OrderStatus::Cancelled],
            OrderStatus::Paid => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::Ready],
            OrderStatus::Ready => &[OrderStatus::Finalized],
            OrderStatus::Finalized | OrderStatus::Cancelled => &[],
        }
    }

    /// Returns true if `target` is reachable from this status in a single step.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Position in the kitchen queue, lower first. Terminal orders are not queued.
    pub fn queue_priority(&self) -> Option<u8> {
        match self {
            OrderStatus::Ready => Some(0),
            OrderStatus::Preparing => Some(1),
            OrderStatus::Paid => Some(2),
            OrderStatus::Received => Some(3),
            OrderStatus::Finalized | OrderStatus::Cancelled => None,
        }
    }

    /// Returns the status name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "RECEIVED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Finalized => "FINALIZED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown order status: {0:?}")]
pub struct ParseStatusError(String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: [(OrderStatus, OrderStatus); 6] = [
        (OrderStatus::Received, OrderStatus::Paid),
        (OrderStatus::Received, OrderStatus::Cancelled),
        (OrderStatus::Paid, OrderStatus::Preparing),
        (OrderStatus::Paid, OrderStatus::Cancelled),
        (OrderStatus::Preparing, OrderStatus::Ready),
        (OrderStatus::Ready, OrderStatus::Finalized),
    ];

    #[test]
    fn test_default_status_is_received() {
        assert_eq!(OrderStatus::default(), OrderStatus::Received);
    }

    #[test]
    fn test_transition_table_is_exact() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    TABLE.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_no_same_state_transitions() {
        for status in OrderStatus::ALL {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_cancel_only_before_preparation() {
        assert!(OrderStatus::Received.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::Received.is_terminal());
        assert!(!OrderStatus::Paid.is_terminal());
        assert!(!OrderStatus::Preparing.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
        assert!(OrderStatus::Finalized.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_queue_priority() {
        assert!(OrderStatus::Ready.queue_priority() < OrderStatus::Preparing.queue_priority());
        assert!(OrderStatus::Preparing.queue_priority() < OrderStatus::Paid.queue_priority());
        assert!(OrderStatus::Paid.queue_priority() < OrderStatus::Received.queue_priority());
        assert_eq!(OrderStatus::Finalized.queue_priority(), None);
        assert_eq!(OrderStatus::Cancelled.queue_priority(), None);
    }

    #[test]
    fn test_display_and_parse() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert_eq!("preparing".parse::<OrderStatus>(), Ok(OrderStatus::Preparing));
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"PREPARING\"");
        let deserialized: OrderStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(deserialized, OrderStatus::Cancelled);
    }
}
