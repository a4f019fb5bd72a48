//! Telegram delivery error classification
//!
//! Replies are never retried; failures are classified so the logs say
//! whether the chat is still reachable.

use std::time::Duration;

use teloxide::{ApiError, RequestError};

/// Why a reply could not be delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// Flood control; Telegram asked to wait this long
    RateLimited(Duration),
    /// Bot blocked by the user or removed from the chat
    BotRemoved,
    /// Chat no longer exists or moved
    ChatUnavailable,
    /// The message being quoted is gone
    ReplyTargetMissing,
    /// Network or I/O trouble
    Network,
    /// Anything else, with Telegram's description
    Other(String),
}

impl DeliveryFailure {
    /// True when sending to the same chat again will fail the same way
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::BotRemoved | Self::ChatUnavailable)
    }
}

/// Classify a `RequestError`
pub fn classify(err: &RequestError) -> DeliveryFailure {
    match err {
        RequestError::RetryAfter(secs) => {
            DeliveryFailure::RateLimited(Duration::from_secs(secs.duration().as_secs().max(1)))
        }
        RequestError::MigrateToChatId(_) => DeliveryFailure::ChatUnavailable,
        RequestError::Network(_) | RequestError::Io(_) => DeliveryFailure::Network,
        RequestError::Api(api_err) => classify_api(api_err),
        other => DeliveryFailure::Other(other.to_string()),
    }
}

fn classify_api(api_err: &ApiError) -> DeliveryFailure {
    match api_err {
        ApiError::BotBlocked
        | ApiError::BotKicked
        | ApiError::BotKickedFromSupergroup
        | ApiError::BotKickedFromChannel
        | ApiError::CantInitiateConversation
        | ApiError::NotEnoughRightsToPostMessages => DeliveryFailure::BotRemoved,

        ApiError::ChatNotFound | ApiError::GroupDeactivated | ApiError::UserDeactivated => {
            DeliveryFailure::ChatUnavailable
        }

        ApiError::MessageToReplyNotFound => DeliveryFailure::ReplyTargetMissing,

        other => DeliveryFailure::Other(other.to_string()),
    }
}
