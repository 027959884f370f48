//! Technical indicator implementations.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod williams;

pub use atr::Atr;
pub use bollinger::BollingerBands;
pub use ema::{ema, ema_series, Ema};
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma::{sma, Sma};
pub use stochastic::Stochastic;
pub use williams::WilliamsR;
