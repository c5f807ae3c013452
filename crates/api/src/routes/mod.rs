mod asset;
mod card;

pub use asset::asset_routes;
pub use card::card_routes;
