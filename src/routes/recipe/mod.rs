mod attributes;
mod ingredients;
mod recipes;
mod tags;

pub use attributes::*;
pub use ingredients::*;
pub use recipes::*;
pub use tags::*;
