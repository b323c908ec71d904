//! Mail Triage: submit an email as text or file to the classification
//! service and track the result.

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod submission;
