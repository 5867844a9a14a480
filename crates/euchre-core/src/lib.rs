#![deny(warnings)]
pub mod game;
pub mod model;

pub use model::card::{Card, ParseCardError, parse_cards};
pub use model::ranking::rank_strength;
pub use model::score::score_round;
pub use model::trick::resolve_trick;
