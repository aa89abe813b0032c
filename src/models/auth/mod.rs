pub mod context;

pub use context::UserContext;
