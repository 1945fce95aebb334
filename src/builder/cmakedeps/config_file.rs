//! Entry points `find_package()` loads: `<stem>-config.cmake` (or
//! `Find<stem>.cmake` in module mode) and `<stem>-config-version.cmake`.

use semver::Version;

use crate::builder::cmakedeps::naming::{variable_prefix, FileNames};

/// Inputs of the config (or find-module) file.
#[derive(Debug, Clone)]
pub struct ConfigTemplate<'a> {
    pub file_names: &'a FileNames,
    pub version: &'a Version,
}

impl ConfigTemplate<'_> {
    pub fn filename(&self) -> String {
        self.file_names.config_file()
    }

    pub fn render(&self) -> String {
        let prefix = variable_prefix(self.file_names.stem());
        let version_var = if self.file_names.module_mode() {
            "VERSION"
        } else {
            "VERSION_STRING"
        };

        format!(
            "########## TARGETS ##########################################################################\n\
             #############################################################################################\n\
             include(${{CMAKE_CURRENT_LIST_DIR}}/{targets})\n\n\
             set({prefix}_FOUND 1)\n\
             set({prefix}_{version_var} \"{version}\")\n",
            targets = self.file_names.targets_file(),
            version = self.version,
        )
    }
}

/// Inputs of the version file (config mode only).
#[derive(Debug, Clone)]
pub struct VersionTemplate<'a> {
    pub file_names: &'a FileNames,
    pub version: &'a Version,
}

impl VersionTemplate<'_> {
    pub fn filename(&self) -> Option<String> {
        self.file_names.version_file()
    }

    /// Same-major-version compatibility, exact match flagged.
    pub fn render(&self) -> String {
        format!(
            r#"set(PACKAGE_VERSION "{version}")

if(PACKAGE_VERSION VERSION_LESS PACKAGE_FIND_VERSION)
    set(PACKAGE_VERSION_COMPATIBLE FALSE)
else()
    if(PACKAGE_FIND_VERSION_MAJOR STREQUAL "{major}")
        set(PACKAGE_VERSION_COMPATIBLE TRUE)
    else()
        set(PACKAGE_VERSION_COMPATIBLE FALSE)
    endif()

    if(PACKAGE_FIND_VERSION STREQUAL PACKAGE_VERSION)
        set(PACKAGE_VERSION_EXACT TRUE)
    endif()
endif()
"#,
            version = self.version,
            major = self.version.major,
        )
    }
}
