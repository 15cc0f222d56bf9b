//! context-generator: dump a project's directory tree and file contents into one text file.

pub mod app;
