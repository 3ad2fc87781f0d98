pub mod prompts;
pub mod render;

pub use render::OutputFormat;
