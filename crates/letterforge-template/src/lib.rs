//! # letterforge-template
//!
//! Placeholder resolution for letterforge - substitute `{{TOKEN}}` markers
//! in a letter template with per-row spreadsheet values and run-wide static
//! values.
//!
//! Resolution is a pure function: same template, row, and statics always
//! yield byte-identical output, which is what makes batch runs testable.
//!
//! ## Example
//!
//! ```rust,ignore
//! use letterforge_template::{resolve, TemplateSpec};
//!
//! let out = resolve("Dear {{Name}}, balance {{Balance}}.", &row, &statics);
//! ```

pub mod resolver;
pub mod spec;

// Re-exports
pub use resolver::{resolve, resolve_with, UnresolvedTokenPolicy};
pub use spec::{FieldMapping, TemplateSpec};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _: UnresolvedTokenPolicy = UnresolvedTokenPolicy::default();
        let _ = TemplateSpec::from_body("hello");
    }
}
