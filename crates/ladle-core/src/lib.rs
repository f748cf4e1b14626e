pub mod error;
pub mod id;
pub mod recipe;
pub mod time;

pub use error::{CoreError, Result};
pub use id::{generate_id, validate_id, IdError};
pub use recipe::Recipe;
pub use time::{now_utc, Timestamp};
