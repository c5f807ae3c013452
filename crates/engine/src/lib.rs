mod error;
mod memory;
mod picker;
mod pity;
mod pool;
mod probability;
mod rng;
mod roller;
mod session;
mod store;

pub use error::GachaError;
pub use memory::MemoryGachaStore;
pub use picker::CardPicker;
pub use pity::{PityState, HARD_PITY, RARE_FLOOR};
pub use pool::{CardPoolDefinition, DrawRecord, PoolType, Rarity};
pub use probability::DrawProbability;
pub use rng::{RandomSource, SeededRandom, ThreadRandom};
pub use roller::RarityRoller;
pub use session::{DrawBatch, DrawCount, DrawOutcome, DrawSession};
pub use store::{CardPoolStore, DrawHistoryStore, HistoryPage, PityStore};
