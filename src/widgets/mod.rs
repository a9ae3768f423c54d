mod floating;

pub use floating::*;
