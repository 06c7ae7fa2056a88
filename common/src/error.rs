use pnet::ipnetwork::Ipv4Network;
use thiserror::Error;

/// Fatal failures of a discovery cycle.
///
/// A scan either completes or fails as a whole; partial results are never
/// surfaced.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot open a datalink channel on {interface}: {reason}")]
    ChannelUnavailable { interface: String, reason: String },

    #[error("no local interface routes {block}")]
    NoRoute { block: Ipv4Network },

    #[error("failed to transmit discovery probe: {0}")]
    ProbeSend(#[from] std::io::Error),

    #[error("discovery task failed: {0}")]
    Internal(String),
}

/// Malformed wire payloads. Recovered locally: the offending message is
/// dropped and the previous state retained.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("payload {0:?} is missing the '#' marker")]
    MissingMarker(String),

    #[error("payload {0:?} is not valid hexadecimal")]
    InvalidHex(String),

    #[error("temperature {0} cannot be encoded as a half-degree code")]
    Unencodable(f64),
}

/// Out-of-range temperature updates, rejected before they reach the model.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("temperature {0} is not a finite number")]
    NotFinite(f64),

    #[error("temperature {value} is outside the supported range {min}..={max}")]
    OutOfRange { value: f64, min: f64, max: f64 },
}

/// Publish/subscribe failures reported by the external bus client.
///
/// Non-fatal: the channel stays in its current state and nothing is retried
/// here; redelivery is the transport's concern.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("subscribe to {topic} failed: {reason}")]
    Subscribe { topic: String, reason: String },

    #[error("unsubscribe from {topic} failed: {reason}")]
    Unsubscribe { topic: String, reason: String },

    #[error("publish to {topic} failed: {reason}")]
    Publish { topic: String, reason: String },
}
