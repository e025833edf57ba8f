pub mod area;
pub mod difficulty;
pub mod payloads;
pub mod post;
pub mod question;
pub mod validation;

pub use area::{Arrangement, AreaQuestion, LengthUnit, PlacedSquare};
pub use difficulty::Difficulty;
pub use post::{EnhancementStatus, NewPost, Post, PostUpdate, Viewer};
pub use question::{ArithmeticQuestion, Operation};
pub use validation::{PayloadIssues, Validate};
