use serde::Serialize;
use std::fmt;

use crate::resources::types::{BootResource, BootSpec};

/// Prefix of every generated boot name.  The lowercase kind short name and
/// the numeric suffix follow it.
pub static NAME_PREFIX: &str = "demo-boot-";

/// Repository that holds the startkit images.
pub static IMAGE_REPOSITORY: &str = "logan";

/// The kinds of boot the operator knows about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum BootKind {
    #[serde(rename = "JavaBoot")]
    #[value(name = "java")]
    Java,
    #[serde(rename = "NodeJSBoot")]
    #[value(name = "nodejs")]
    NodeJS,
    #[serde(rename = "PhpBoot")]
    #[value(name = "php")]
    Php,
    #[serde(rename = "PythonBoot")]
    #[value(name = "python")]
    Python,
    #[serde(rename = "WebBoot")]
    #[value(name = "web")]
    Web,
}

impl BootKind {
    /// Lowercase short name: `java`, `nodejs`, ...
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::NodeJS => "nodejs",
            Self::Php => "php",
            Self::Python => "python",
            Self::Web => "web",
        }
    }

    /// Resource type as given to `oc delete`: the lowercased kind.
    pub fn resource_type(self) -> String {
        self.to_string().to_lowercase()
    }

    /// Startkit image for this kind.
    pub fn default_image(self) -> String {
        format!(
            "{IMAGE_REPOSITORY}/logan-startkit-{short}",
            short = self.short_name()
        )
    }

    /// Offset added to sequential indices when none is given.  Java boots
    /// have always been numbered from 10; the others from 0.
    pub fn default_group(self) -> i64 {
        match self {
            Self::Java => 10,
            _ => 0,
        }
    }
}

impl fmt::Display for BootKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .ok_or(fmt::Error)?;
        write!(f, "{s}")
    }
}

///////////////////////////////////////////////////////////////////////////////

/// The fixed template generated boots are stamped out of: everything but the
/// numeric name suffix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workload {
    pub kind: BootKind,
    pub name_prefix: String,
    pub image: String,
}

impl Workload {
    /// The default template for a kind.
    pub fn new(kind: BootKind) -> Self {
        Self {
            kind,
            name_prefix: format!("{NAME_PREFIX}{short}", short = kind.short_name()),
            image: kind.default_image(),
        }
    }

    /// Set the image, overwriting the default.
    pub fn with_image(mut self, image: String) -> Self {
        self.image = image;
        self
    }

    /// Name of the boot with the given suffix.
    pub fn name(&self, suffix: i64) -> String {
        format!("{prefix}{suffix}", prefix = self.name_prefix)
    }

    /// The boot with the given suffix.
    pub fn boot(&self, suffix: i64) -> BootResource {
        BootResource::new(
            self.kind,
            self.name(suffix),
            BootSpec::new(self.image.clone()),
        )
    }
}
