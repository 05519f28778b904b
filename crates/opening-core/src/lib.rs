pub mod engine;
pub mod error;
pub mod library;
pub mod matcher;
pub mod migration;
pub mod mutation;
pub mod pgn;
pub mod session;
pub mod store;
pub mod theory;
pub mod tree;

pub use engine::{MoveEngine, ShakmatyEngine};
pub use error::{ErrorKind, Result, TrainerError};
pub use matcher::{match_tree, TreeMatch};
pub use session::{Confirm, Outcome, Session, SessionView};
pub use store::{BlobStore, FileStore, MemoryStore, OpeningStore};
pub use theory::{CanonicalMatch, TheoryIndex};
pub use tree::{Forest, NodeRef, OpeningNode};
