pub mod bridge;
pub mod channel;
pub mod codec;
pub mod discovery;
pub mod model;
pub mod topics;
pub mod transport;
