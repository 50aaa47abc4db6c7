//! scenic - declarative scene assembly
//!
//! Scene calls are recorded as [`Command`]s, queued, and applied in order
//! when the queue runs. The graph itself lives in [`scenic_core`]; rendering
//! and framebuffer output live in [`scenic_render`].
//!
//! ```no_run
//! use scenic::SceneInterface;
//!
//! let mut si = SceneInterface::default();
//! si.new_camera("cam1", "PerspectiveCamera")
//!     .new_framebuffer("fb1", "rgba")
//!     .new_renderer("ren1")
//!     .assign_camera("ren1", "cam1")
//!     .assign_framebuffer("ren1", "fb1")
//!     .render_scene("ren1")
//!     .save_framebuffer("fb1", "out.fb");
//! si.run()?;
//! # Ok::<(), scenic::RunError>(())
//! ```

pub mod command;
pub mod config;
pub mod executor;
pub mod import;
pub mod interface;
pub mod queue;
pub mod script;

pub use command::Command;
pub use executor::Executor;
pub use interface::SceneInterface;
pub use queue::{CommandQueue, RunError, RunReport};
pub use script::{SceneScript, ScriptError};

pub use scenic_core;
pub use scenic_render;
