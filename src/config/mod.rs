mod r#impl;
mod structs;

pub use r#impl::local_today_with_offset;
pub use structs::*;
