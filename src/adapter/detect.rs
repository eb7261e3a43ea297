//! Framework detection from source filenames.
//!
//! Pure mapping, kept apart from the reactive lifecycle: callers decide
//! which adapter to use and may record the result in a reactive's meta.

use std::fmt;
use std::path::Path;

/// UI frameworks with a known binding shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framework {
    React,
    Vue,
    Svelte,
    Solid,
    Angular,
}

/// Which adapter fits a framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingShape {
    /// [`ValueAdapter`](crate::adapter::ValueAdapter)
    ValuePair,
    /// [`AccessorAdapter`](crate::adapter::AccessorAdapter)
    Accessor,
    /// [`RefAdapter`](crate::adapter::RefAdapter)
    Ref,
}

impl Framework {
    /// Detect the framework a source file belongs to.
    ///
    /// Compound suffixes (`.solid.tsx`, `.component.ts`) win over the
    /// plain extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let file_name = path.as_ref().file_name()?.to_str()?.to_ascii_lowercase();

        if file_name.ends_with(".solid.tsx") || file_name.ends_with(".solid.jsx") {
            return Some(Framework::Solid);
        }
        if file_name.ends_with(".component.ts") {
            return Some(Framework::Angular);
        }

        let extension = Path::new(&file_name).extension()?.to_str()?;
        match extension {
            "jsx" | "tsx" => Some(Framework::React),
            "vue" => Some(Framework::Vue),
            "svelte" => Some(Framework::Svelte),
            _ => None,
        }
    }

    pub fn binding_shape(self) -> BindingShape {
        match self {
            Framework::React => BindingShape::ValuePair,
            Framework::Solid | Framework::Angular => BindingShape::Accessor,
            Framework::Vue | Framework::Svelte => BindingShape::Ref,
        }
    }

    /// Name stored under the `framework` meta key.
    pub fn as_str(self) -> &'static str {
        match self {
            Framework::React => "react",
            Framework::Vue => "vue",
            Framework::Svelte => "svelte",
            Framework::Solid => "solid",
            Framework::Angular => "angular",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
