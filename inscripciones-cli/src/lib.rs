//! Bulk importer for course enrollments and their participants
//!
//! Reads an enrollment spreadsheet, makes sure every referenced company,
//! executive and modality exists in the remote catalogs, then creates one
//! enrollment per `Ficha` followed by its participants.

pub mod api;
pub mod cli;
pub mod config;
pub mod import;
