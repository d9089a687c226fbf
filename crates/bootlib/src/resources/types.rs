use serde::Serialize;

use crate::error::Error;
use crate::resources::boot::BootKind;

/// API group and version of all boot kinds.
pub static API_VERSION: &str = "app.logancloud.com/v1";

/// Version tag every generated boot asks for.
pub static DEFAULT_VERSION: &str = "latest";

/// A boot custom resource, as it is handed to the cluster CLI.
///
/// Field order matters: it is the order of the keys in the serialised
/// manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootResource {
    pub api_version: String,
    pub kind: BootKind,
    pub metadata: ObjectMeta,
    pub spec: BootSpec,
}

/// Object metadata.  Only the name is ever set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObjectMeta {
    pub name: String,
}

/// A boot resource specification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BootSpec {
    /// Image to run, without the tag.
    pub image: String,
    /// Image tag.
    pub version: String,
    /// Desired replica count.  Benchmark boots are never scaled up, so the
    /// operator only has the resource itself to reconcile.
    pub replicas: u32,
}

impl BootResource {
    /// Construct a boot of the given kind and name.
    pub fn new(kind: BootKind, name: String, spec: BootSpec) -> Self {
        Self {
            api_version: API_VERSION.to_owned(),
            kind,
            metadata: ObjectMeta { name },
            spec,
        }
    }

    /// Name of the resource.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Turn a resource into a compact JSON string.
    pub fn to_json_string(&self) -> Result<String, Error> {
        let json = serde_json::to_string(self)?;

        Ok(json)
    }
}

impl BootSpec {
    /// A zero-replica spec for the given image.
    pub fn new(image: String) -> Self {
        Self {
            image,
            version: DEFAULT_VERSION.to_owned(),
            replicas: 0,
        }
    }
}
