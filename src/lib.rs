//! Takeo: a metadata driven ORM.
//!
//! Entities are described once, either with `#[derive(Entity)]` or by
//! registering a table and its declared columns, then created, fetched,
//! updated and deleted through a [`Manager`] bound to a connection.
//!
//! ```ignore
//! use takeo::{Entity, Manager};
//!
//! #[derive(Entity, Clone)]
//! #[table_name("users")]
//! struct User {
//!     #[primary_key]
//!     #[auto_increment]
//!     id: Option<i32>,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! manager.register::<User>()?;
//! manager.create_table("User").await?;
//! let id = manager.create("User", &user).await?;
//! let user: User = manager.find_by_id("User", id).await?;
//! ```
pub use takeo_core::*;
pub use takeo_macros::*;
