//! `create-starter`: a project scaffolder built on a declarative wizard flow.
//!
//! [`flow`] declares the questions and [`scaffold`] writes the project once
//! they are answered.

pub mod flow;
pub mod scaffold;
