//! Shielder wallet session: the only surface a UI shell talks to for keys,
//! balances and activity.

pub mod error;
pub mod logging;
pub mod session;

pub use error::WalletError;
pub use logging::init_logging;
pub use session::WalletSession;
