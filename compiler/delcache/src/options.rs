//! Module-level inputs from the emit stage.

/// The kind of binary being produced.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputKind {
    ConsoleApplication,
    WindowsApplication,
    #[default]
    DynamicallyLinkedLibrary,
    /// A module linked into another assembly; its synthesized top-level
    /// types must not collide with those of sibling modules.
    NetModule,
}

impl OutputKind {
    /// Default file extension, including the leading dot.
    pub const fn default_extension(self) -> &'static str {
        match self {
            OutputKind::ConsoleApplication | OutputKind::WindowsApplication => ".exe",
            OutputKind::DynamicallyLinkedLibrary => ".dll",
            OutputKind::NetModule => ".netmodule",
        }
    }
}

/// Emit-stage configuration for one module.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleOptions {
    pub output_kind: OutputKind,
    pub module_name: String,
    /// Edit-and-continue generation; 0 for a full build.
    pub generation: u32,
    /// Slot of this compilation in an interactive submission chain.
    pub submission_slot: Option<u32>,
}

impl ModuleOptions {
    pub fn new(output_kind: OutputKind, module_name: impl Into<String>) -> Self {
        ModuleOptions {
            output_kind,
            module_name: module_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = generation;
        self
    }

    #[must_use]
    pub fn with_submission_slot(mut self, slot: u32) -> Self {
        self.submission_slot = Some(slot);
        self
    }

    /// Token that distinguishes this module's synthesized top-level types.
    ///
    /// Only a net-module needs one: its name without the `.netmodule`
    /// extension (matched case-insensitively), mangled to characters that
    /// are valid inside a type name. Every other output kind uses `""`.
    pub fn module_id(&self) -> String {
        if self.output_kind != OutputKind::NetModule {
            return String::new();
        }

        let extension = OutputKind::NetModule.default_extension();
        let name = self.module_name.as_str();
        let stem = match name.len().checked_sub(extension.len()) {
            Some(split)
                if name.is_char_boundary(split)
                    && name[split..].eq_ignore_ascii_case(extension) =>
            {
                &name[..split]
            }
            _ => name,
        };

        stem.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect()
    }
}
