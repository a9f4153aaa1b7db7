//! Helper functions shared by the renderer and the block builder

mod html;
mod url;

pub use html::*;
pub use url::*;
