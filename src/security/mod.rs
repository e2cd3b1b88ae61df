mod path;

pub use path::PathResolver;
