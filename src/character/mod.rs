pub mod card;
pub mod resolver;
pub mod store;

pub use card::{Character, Mood, Personality};
pub use resolver::{resolve, CatalogEntry, ResolveError};
pub use store::{CharacterStore, FileCharacterStore, StorageError};
