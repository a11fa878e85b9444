//! Output generators.
//!
//! This module contains the generator that renders a test table into a
//! styled XLSX worksheet.

pub mod xlsx;
