//! Supported entry type capability table

/// Entry types the dispatcher has strategies for
///
/// Anything not listed here exports an empty payload and rejects imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedType {
    AssetBundle,
    GameObject,
    MonoBehaviour,
    Mesh,
    TextAsset,
    Texture2D,
}

impl SupportedType {
    /// Canonical runtime type name
    pub fn name(&self) -> &'static str {
        match self {
            SupportedType::AssetBundle => "AssetBundle",
            SupportedType::GameObject => "GameObject",
            SupportedType::MonoBehaviour => "MonoBehaviour",
            SupportedType::Mesh => "Mesh",
            SupportedType::TextAsset => "TextAsset",
            SupportedType::Texture2D => "Texture2D",
        }
    }

    /// Look up a type by its runtime name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AssetBundle" => Some(SupportedType::AssetBundle),
            "GameObject" => Some(SupportedType::GameObject),
            "MonoBehaviour" => Some(SupportedType::MonoBehaviour),
            "Mesh" => Some(SupportedType::Mesh),
            "TextAsset" => Some(SupportedType::TextAsset),
            "Texture2D" => Some(SupportedType::Texture2D),
            _ => None,
        }
    }

    /// Whether an export strategy exists for the type
    pub fn can_export(&self) -> bool {
        // every supported type has an export path; Mesh is one-way
        true
    }

    /// Whether an import strategy exists for the type
    pub fn can_import(&self) -> bool {
        !matches!(self, SupportedType::Mesh)
    }

    /// Whether the payload is editable in place (text or structured JSON)
    pub fn editable(&self) -> bool {
        matches!(
            self,
            SupportedType::AssetBundle
                | SupportedType::GameObject
                | SupportedType::MonoBehaviour
                | SupportedType::TextAsset
        )
    }

    /// True if the type round-trips through the full field tree
    pub fn tree_typed(&self) -> bool {
        matches!(
            self,
            SupportedType::AssetBundle | SupportedType::GameObject | SupportedType::MonoBehaviour
        )
    }
}

impl std::fmt::Display for SupportedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
