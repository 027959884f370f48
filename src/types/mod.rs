pub mod alerts;
pub mod analysis;
pub mod bar;
pub mod indicators;
pub mod signals;

pub use alerts::*;
pub use analysis::*;
pub use bar::*;
pub use indicators::*;
pub use signals::*;
