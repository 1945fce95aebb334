//! Intermediate representation of the targets file.
//!
//! The targets file is planned as a list of [`Statement`]s before it is
//! rendered to CMake. Name collisions are expressed as
//! [`Statement::DeclareIfAbsent`] rather than as CMake `if(NOT TARGET ...)`
//! text, so the plan can be checked (and evaluated with
//! [`TargetRegistry`](super::registry::TargetRegistry)) without running CMake.

/// What a declared target is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    /// The aggregate target of the package.
    Root,
    /// One component of the package.
    Component,
    /// An extra name linking to `target`.
    Alias { target: String },
}

/// An `INTERFACE IMPORTED` target to declare unless one already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: TargetKind,
}

impl Declaration {
    pub fn root(name: impl Into<String>) -> Self {
        Declaration {
            name: name.into(),
            kind: TargetKind::Root,
        }
    }

    pub fn component(name: impl Into<String>) -> Self {
        Declaration {
            name: name.into(),
            kind: TargetKind::Component,
        }
    }

    pub fn alias(name: impl Into<String>, target: impl Into<String>) -> Self {
        Declaration {
            name: name.into(),
            kind: TargetKind::Alias {
                target: target.into(),
            },
        }
    }

    /// The target this declaration links to, for aliases.
    pub fn link_target(&self) -> Option<&str> {
        match &self.kind {
            TargetKind::Alias { target } => Some(target),
            _ => None,
        }
    }
}

/// Which family of sibling files an include glob picks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    /// Per-configuration variable files.
    Data,
    /// Per-configuration library finder files.
    Finder,
}

/// One step of the targets file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Include every sibling file matching `pattern`.
    IncludeGlob { kind: IncludeKind, pattern: String },

    /// Declare a target unless it exists, warn otherwise.
    DeclareIfAbsent(Declaration),
}

/// Planned contents of a targets file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetsScript {
    pub statements: Vec<Statement>,
}

impl TargetsScript {
    /// All declarations, in emission order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::DeclareIfAbsent(decl) => Some(decl),
            _ => None,
        })
    }

    /// Names of all declared targets, in emission order.
    pub fn declared_names(&self) -> Vec<&str> {
        self.declarations().map(|d| d.name.as_str()).collect()
    }
}
