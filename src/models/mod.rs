mod click;
mod link;

pub use click::{Click, NewClick};
pub use link::Link;
