mod level;
mod permission;

pub use self::level::{Level, PerLevel};
pub use self::permission::{Duplicate, Permission, SourceLists, name_order, sort_names};
