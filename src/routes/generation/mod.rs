mod handler;
mod model;

pub use handler::{cancel_generation, generate_deck, list_generations};
pub use model::{GenerateDeckRequest, GenerationListQuery};
