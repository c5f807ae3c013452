mod asset;
mod catalog;
mod rpc;
mod user;

pub use asset::{AssetClient, AssetService, DRAW_COST_SINGLE, DRAW_COST_TEN};
pub use catalog::{CardCatalog, CardCatalogClient, CardTemplate};
pub use rpc::RpcEndpoint;
pub use user::{UserAuthClient, UserAuthService};
