mod env;
mod global_state;
mod locks;
mod middleware;
mod response;
mod routes;
mod utils;
mod wish;

pub use env::ApiServerEnv;
pub use global_state::GlobalState;
pub use locks::DrawLocks;
pub use middleware::{authenticate, AuthenticatedUser};
pub use response::{AppError, AppSuccess};
pub use routes::{asset_routes, card_routes};
pub use utils::setup_tracing;
pub use wish::{perform_draw, DrawRequestOutcome};
