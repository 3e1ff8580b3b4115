//! Configuration entry model shared with the host's config parser.
//!
//! The host's generic parser hands blocks to the validate phase and, once
//! the whole pass reported zero errors, to the apply phase. File/line
//! context travels with every directive so diagnostics point at the
//! offending location.

use thiserror::Error;

/// One `key value;` directive inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub value: Option<String>,
    pub file: String,
    pub line: u32,
}

impl Directive {
    pub fn new(
        name: impl Into<String>,
        value: Option<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            file: file.into(),
            line,
        }
    }

    /// True when a value is present and non-blank.
    pub fn has_value(&self) -> bool {
        self.value.as_deref().is_some_and(|v| !v.is_empty())
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// The three block types this engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    DenyModule,
    RequireModule,
    PolicySwitches,
}

impl BlockKind {
    /// Human-readable block name for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            BlockKind::DenyModule => "deny module block",
            BlockKind::RequireModule => "require module block",
            BlockKind::PolicySwitches => "require-modules policy block",
        }
    }
}

/// One configuration block as produced by the host's parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBlock {
    pub kind: BlockKind,
    pub directives: Vec<Directive>,
    pub file: String,
    pub line: u32,
}

impl ConfigBlock {
    pub fn new(kind: BlockKind, file: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            directives: Vec::new(),
            file: file.into(),
            line,
        }
    }

    pub fn push(&mut self, directive: Directive) -> &mut Self {
        self.directives.push(directive);
        self
    }

    /// First directive with the given name, if any.
    pub fn directive(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }
}

/// A single validation diagnostic with file/line context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}: {message}")]
pub struct ConfigError {
    pub file: String,
    pub line: u32,
    pub message: String,
}

impl ConfigError {
    pub fn at(file: &str, line: u32, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}
