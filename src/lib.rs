//! Core library for the lingua-tree command line application.
//!
//! The library turns a bilingual translation workbook into a tree of
//! JavaScript modules or JSON documents. Spreadsheet and path helpers live
//! under [`lingua::tree::io`], the row and report types in
//! [`lingua::tree::model`], the sheet → folder configuration in
//! [`lingua::tree::mapping`], output flavours in [`lingua::tree::emit`], and
//! the orchestration in [`lingua::tree::build`].

pub mod lingua;

pub use lingua::tree::{Result, ToolError, build, emit, error, io, mapping, model};
