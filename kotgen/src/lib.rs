//! Structured Kotlin source-code generation.
//!
//! Callers build an in-memory model out of [`TypeName`] values and
//! [`CodeBlock`] format-string fragments, assemble them into a
//! [`SourceFile`], and the engine renders formatted Kotlin with the
//! shortest valid references and exactly the imports the file needs.
//!
//! # Module Organization
//!
//! - [`types`] - The type-name model (ClassName, parameterized types,
//!   type variables, wildcards, lambdas, `dynamic`)
//! - [`spec`] - Light declaration collaborators (AnnotationSpec,
//!   ParameterSpec)
//! - [`code`] - The emission engine (CodeBlock, CodeWriter, LineWrapper,
//!   Import)
//! - [`file`] - Whole-file assembly and the two-pass import resolution
//!
//! # Example
//!
//! ```
//! use kotgen::{Arg, ClassName, CodeBlock, SourceFile};
//!
//! let list = ClassName::new("kotlin.collections", ["List"])
//!     .parameterized_by([ClassName::new("kotlin", ["String"]).into()]);
//!
//! let file = SourceFile::builder("com.example", "HelloWorld")
//!     .add_code(CodeBlock::of("val names: %T = listOf()\n", [Arg::ty(list)]))
//!     .build();
//!
//! let rendered = file.to_string();
//! assert!(rendered.contains("import kotlin.collections.List"));
//! assert!(rendered.contains("val names: List<String> = listOf()"));
//! ```

pub mod code;
pub mod error;
pub mod file;
pub mod spec;
pub mod types;

pub use code::{
    Arg, CodeBlock, CodeBlockBuilder, CodeWriter, DEFAULT_COLUMN_LIMIT, DEFAULT_INDENT, Import,
    LineWrapper, TypeScope,
};
pub use error::{Error, Result};
pub use file::{SourceFile, SourceFileBuilder};
pub use spec::{AnnotationSpec, ParameterSpec};
pub use types::{
    ClassName, LambdaTypeName, MemberName, ParameterizedTypeName, TypeName, TypeVariableName,
    Variance, WildcardTypeName, builtins,
};
