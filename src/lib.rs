//! Baseforge - Natural Language to Obsidian Bases Compiler

pub mod base;
pub mod catalog;
pub mod core;
pub mod extract;
pub mod generate;
pub mod llm;
pub mod studio;
