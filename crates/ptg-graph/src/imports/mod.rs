//! Import extraction and local module resolution.

mod parser;
mod resolver;

pub use parser::extract_imports;
pub use resolver::{EXTERNAL_PREFIXES, ModuleResolver, is_external, nested_component_files};
