// src/lib.rs

//! librw package recipe and build matrix
//!
//! Describes how binary packages of the librw graphics library are built,
//! validated and published for its rendering platforms (software
//! rasterizer, OpenGL 3, Direct3D and PS2).
//!
//! # Architecture
//!
//! - Recipe: option surface, platform dispatch table, requirement resolution
//! - Kitchen: ordered build pipeline from validation to exported metadata
//! - Matrix: expands configurations and submits them to a build service

mod error;
pub mod matrix;
pub mod recipe;
pub mod reference;
pub mod settings;

pub use error::{Error, Result};
pub use matrix::{JobOutcome, JobResult, MatrixEnv, MatrixStrategy, Orchestrator};
pub use recipe::{
    BuildConfiguration, CookResult, Kitchen, KitchenConfig, PackageArtifact, PackageMetadata,
    Platform, Recipe, RequirementSet,
};
pub use reference::{PackageReference, ReferenceParseError};
pub use settings::{Arch, BuildType, Compiler, CompilerKind, Os, Settings};
