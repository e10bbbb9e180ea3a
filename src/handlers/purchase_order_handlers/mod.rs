mod crud;
mod files;
mod items;
mod notes;

pub use crud::*;
pub use files::upload;
pub use items::*;
pub use notes::*;
