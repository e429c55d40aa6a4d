pub mod field_position;
pub mod score_trend;
pub mod win_probability;

pub use field_position::resolve_field_position;
pub use score_trend::score_trend;
