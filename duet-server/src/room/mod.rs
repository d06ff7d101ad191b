mod room;
mod room_directory;

pub use room::*;
pub use room_directory::*;
