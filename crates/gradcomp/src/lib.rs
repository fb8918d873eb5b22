#![warn(missing_docs)]

//! Procedural graduation computer model.
//!
//! Loads a laptop mesh and a few helper meshes, puts lettering on the
//! screen, sets a graduation cap with a tassel on top, and writes the
//! result as a colored OBJ archive plus a preview image.
//!
//! # Architecture
//!
//! - [`assets`] - STL assets and the text bitmap
//! - [`screen`] - raised lettering and the display surface patch
//! - [`cap`] - graduation cap and tassel
//! - [`scene`] - composition, color rules and the full run
//! - [`settings`] - TOML-loadable run settings
//!
//! # Example
//!
//! ```ignore
//! use gradcomp::{run, Settings};
//!
//! let model = run(&Settings::default())?;
//! println!("{}", model.size_line());
//! ```

pub mod assets;
pub mod cap;
pub mod error;
pub mod scene;
pub mod screen;
pub mod settings;

pub use assets::{Asset, AssetDir};
pub use cap::{graduation_cap, tassel_curve, GraduationCap, GOLD};
pub use error::{GradcompError, Result};
pub use scene::{run, GeneratedModel, Scene, PURPLE};
pub use screen::{screen_patch, screen_text, screen_text_solid, ScreenPatch};
pub use settings::Settings;
