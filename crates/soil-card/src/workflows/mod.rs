pub mod bulk;
pub mod soil_card;
