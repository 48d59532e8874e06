use mimalloc::MiMalloc;

/// Global allocator
/// Requires the `mimalloc` feature to be enabled in the `Cargo.toml` file.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub mod book;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod mpmc;
pub mod notifier;
pub mod priced;
pub mod ring;
pub mod trading_tool;
pub mod types;
pub mod worker;

pub mod prelude {
    pub use super::book::*;
    pub use super::engine::*;
    pub use super::error::*;
    pub use super::exchange::*;
    pub use super::mpmc::*;
    pub use super::notifier::*;
    pub use super::priced::*;
    pub use super::ring::*;
    pub use super::trading_tool::*;
    pub use super::types::*;
    pub use super::worker::*;
}
