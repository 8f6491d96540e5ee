mod location;
mod showtime;

pub use location::*;
pub use showtime::*;
