//! Save/load system
//!
//! The run-length world format and the files it lives in.

pub mod codec;
pub mod world_file;

pub use codec::{decode, encode, DecodeReport, Diagnostic, DiagnosticKind};

pub use world_file::{
    SaveError,
    save_world, load_world, delete_world,
    world_exists, world_path, save_directory,
};
