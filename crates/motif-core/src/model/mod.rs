pub mod note;
pub mod vector;

pub use note::Note;
pub use vector::EmbeddingVector;
