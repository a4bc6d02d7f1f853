use super::manifest::{ResourceDeclaration, ScenarioDeclaration, ServiceManifest};
use crate::shared::Result;
use serde_json::{Map, Value};

/// Order-preserving editable form of a scenario manifest.
///
/// Edits only append keys to the end of an object or replace a single
/// field, so a rewritten `service.json` diffs cleanly against the original.
/// The typed [`ServiceManifest`] is never written back; callers reparse it
/// from the document with [`ManifestDocument::typed`].
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    root: Value,
}

impl ManifestDocument {
    pub fn parse(content: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(content)?;
        if !root.is_object() {
            anyhow::bail!("Manifest root must be a JSON object");
        }
        Ok(Self { root })
    }

    /// Inserts a resource declaration. Returns false when the name already exists.
    pub fn insert_resource(&mut self, name: &str, declaration: &ResourceDeclaration) -> Result<bool> {
        let value = serde_json::to_value(declaration)?;
        Ok(Self::insert_new(self.section_mut("resources")?, name, value))
    }

    /// Inserts a scenario declaration. Returns false when the name already exists.
    pub fn insert_scenario(&mut self, name: &str, declaration: &ScenarioDeclaration) -> Result<bool> {
        let value = serde_json::to_value(declaration)?;
        Ok(Self::insert_new(self.section_mut("scenarios")?, name, value))
    }

    /// Sets `enabled` on an existing resource. Returns false when the resource is not declared.
    pub fn set_resource_enabled(&mut self, name: &str, enabled: bool) -> Result<bool> {
        let resources = self.section_mut("resources")?;
        match resources.get_mut(name) {
            Some(Value::Object(entry)) => {
                entry.insert("enabled".to_string(), Value::Bool(enabled));
                Ok(true)
            }
            Some(_) => anyhow::bail!("Resource '{}' is not a JSON object", name),
            None => Ok(false),
        }
    }

    /// Re-derives the typed manifest from the current document
    pub fn typed(&self) -> Result<ServiceManifest> {
        Ok(serde_json::from_value(self.root.clone())?)
    }

    pub fn to_pretty_string(&self) -> Result<String> {
        let mut content = serde_json::to_string_pretty(&self.root)?;
        content.push('\n');
        Ok(content)
    }

    fn section_mut(&mut self, key: &str) -> Result<&mut Map<String, Value>> {
        let root = self
            .root
            .as_object_mut()
            .ok_or_else(|| anyhow::anyhow!("Manifest root must be a JSON object"))?;
        let section = root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        section
            .as_object_mut()
            .ok_or_else(|| anyhow::anyhow!("Manifest '{}' section must be a JSON object", key))
    }

    fn insert_new(section: &mut Map<String, Value>, name: &str, value: Value) -> bool {
        if section.contains_key(name) {
            return false;
        }
        section.insert(name.to_string(), value);
        true
    }
}
