mod crud;
mod export;
mod layout;

pub use crud::*;
pub use export::export_ics;
pub use layout::layout;
