//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod content;
pub(crate) mod resolve;

pub(crate) use build::BuildArgs;
pub(crate) use content::ContentCommand;
pub(crate) use resolve::ResolveArgs;
