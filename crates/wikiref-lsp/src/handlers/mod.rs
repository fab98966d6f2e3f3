mod configuration;
mod diagnostics;
mod lifecycle;
mod notifications;

pub use configuration::*;
pub use diagnostics::*;
pub use lifecycle::*;
pub use notifications::*;
