mod component;
mod interaction;
mod oracle;
mod render;
mod stabilizer;
mod state;
mod types;

pub use component::CardGraphCanvas;
pub use types::GraphSettings;
