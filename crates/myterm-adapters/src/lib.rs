//! OS adapters for myterm: shell passthrough and browser launch.
//!
//! Each adapter implements the [`Adapter`] trait defined in [`traits`], so the
//! command layer can invoke tools by name without knowing which process or
//! platform launcher sits behind them.

pub mod browser;
pub mod error;
pub mod shell;
pub mod traits;

pub use browser::BrowserAdapter;
pub use error::{AdapterError, Result};
pub use shell::{ShellAdapter, ShellOutput};
pub use traits::{Adapter, AdapterType, HealthStatus};
