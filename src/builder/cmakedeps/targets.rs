//! The configuration-agnostic targets file (`<stem>Targets.cmake`).
//!
//! The file includes every per-configuration data file found next to it,
//! declares the root target, the component targets and all aliases with
//! declare-if-absent semantics, then includes every per-configuration finder
//! file. Configurations are discovered by glob when CMake reads the file, so
//! installing another configuration never requires rewriting it.
//!
//! Output depends only on the inputs, in the order given: reordering
//! components or aliases reorders the output.

use crate::builder::cmakedeps::ir::{Declaration, IncludeKind, Statement, TargetKind, TargetsScript};
use crate::builder::cmakedeps::naming::{AliasTable, FileNames};
use crate::builder::cmakedeps::MessageMode;

/// Inputs of one targets file.
#[derive(Debug, Clone)]
pub struct TargetsTemplate<'a> {
    pub root_target_name: &'a str,
    /// Component target names, in emission order.
    pub component_names: &'a [String],
    pub root_aliases: &'a AliasTable,
    /// Per component name, its aliases (each mapping to the component's target).
    pub component_aliases: &'a [(String, AliasTable)],
    pub file_names: &'a FileNames,
    pub message_mode: MessageMode,
}

impl TargetsTemplate<'_> {
    /// File name of the targets file.
    pub fn filename(&self) -> String {
        self.file_names.targets_file()
    }

    /// Plan the file.
    pub fn plan(&self) -> TargetsScript {
        let mut statements = vec![Statement::IncludeGlob {
            kind: IncludeKind::Data,
            pattern: self.file_names.data_glob(),
        }];

        statements.push(Statement::DeclareIfAbsent(Declaration::root(
            self.root_target_name,
        )));

        statements.extend(
            self.component_names
                .iter()
                .map(|name| Statement::DeclareIfAbsent(Declaration::component(name.as_str()))),
        );

        statements.extend(
            self.root_aliases
                .iter()
                .map(|(alias, target)| Statement::DeclareIfAbsent(Declaration::alias(alias, target))),
        );

        for (_, aliases) in self.component_aliases {
            statements.extend(
                aliases
                    .iter()
                    .map(|(alias, target)| Statement::DeclareIfAbsent(Declaration::alias(alias, target))),
            );
        }

        statements.push(Statement::IncludeGlob {
            kind: IncludeKind::Finder,
            pattern: self.file_names.finder_glob(),
        });

        TargetsScript { statements }
    }

    /// Render the file contents.
    pub fn render(&self) -> String {
        render_script(&self.plan(), self.message_mode)
    }
}

/// Render the targets file for one package.
///
/// `component_names` and every alias table must already be validated with
/// [`validate_names`](super::naming::validate_names).
pub fn generate(
    root_target_name: &str,
    component_names: &[String],
    root_aliases: &AliasTable,
    component_aliases: &[(String, AliasTable)],
    file_name_stem: &str,
    module_mode: bool,
) -> String {
    let file_names = FileNames::new(file_name_stem, module_mode);
    TargetsTemplate {
        root_target_name,
        component_names,
        root_aliases,
        component_aliases,
        file_names: &file_names,
        message_mode: MessageMode::default(),
    }
    .render()
}

/// Render a planned targets file to CMake.
pub fn render_script(script: &TargetsScript, message_mode: MessageMode) -> String {
    let mut out = String::new();
    out.push_str(&message_helper(message_mode));

    let mut section: Option<&'static str> = None;
    for stmt in &script.statements {
        match stmt {
            Statement::IncludeGlob { kind, pattern } => {
                section = None;
                out.push('\n');
                out.push_str(&include_glob(*kind, pattern));
            }
            Statement::DeclareIfAbsent(decl) => {
                let header = section_header(&decl.kind);
                if section != Some(header) {
                    out.push('\n');
                    out.push_str(header);
                    out.push('\n');
                    section = Some(header);
                }
                out.push_str(&declare_if_absent(decl));
            }
        }
    }

    out
}

fn message_helper(mode: MessageMode) -> String {
    format!(
        r#"# Status messages are silenced with -DBERTH_MESSAGE_MODE=QUIET
if(NOT DEFINED BERTH_MESSAGE_MODE)
    set(BERTH_MESSAGE_MODE {mode})
endif()

function(berth_message MESSAGE_OUTPUT)
    if(NOT BERTH_MESSAGE_MODE STREQUAL "QUIET")
        message(${{ARGV}})
    endif()
endfunction()
"#,
        mode = mode.as_cmake()
    )
}

fn include_glob(kind: IncludeKind, pattern: &str) -> String {
    let (comment, variable) = match kind {
        IncludeKind::Data => ("# Load the debug and release variables", "DATA_FILES"),
        IncludeKind::Finder => ("# Load the debug and release library finders", "CONFIG_FILES"),
    };

    format!(
        r#"{comment}
get_filename_component(_DIR "${{CMAKE_CURRENT_LIST_FILE}}" PATH)
file(GLOB {variable} "${{_DIR}}/{pattern}")

foreach(f ${{{variable}}})
    include(${{f}})
endforeach()
"#
    )
}

fn section_header(kind: &TargetKind) -> &'static str {
    match kind {
        TargetKind::Root => "# Create the root target",
        TargetKind::Component => "# Create the targets for all the components",
        TargetKind::Alias { .. } => "# Create the aliases",
    }
}

fn declare_if_absent(decl: &Declaration) -> String {
    let name = &decl.name;
    let body = match &decl.kind {
        TargetKind::Root => format!(
            "    berth_message(STATUS \"Berth: Target declared '{name}'\")\n"
        ),
        TargetKind::Component => format!(
            "    berth_message(STATUS \"Berth: Component target declared '{name}'\")\n"
        ),
        TargetKind::Alias { target } => format!(
            "    set_property(TARGET {name} PROPERTY INTERFACE_LINK_LIBRARIES {target})\n    \
             berth_message(STATUS \"Berth: Alias target declared '{name}' -> '{target}'\")\n"
        ),
    };

    format!(
        "if(NOT TARGET {name})\n    add_library({name} INTERFACE IMPORTED)\n{body}\
         else()\n    message(WARNING \"Target name '{name}' already exists.\")\nendif()\n"
    )
}
