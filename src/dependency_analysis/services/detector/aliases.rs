use regex::Regex;
use std::collections::HashMap;

/// Identifier to string-literal table scanned from a source tree
///
/// Built from every `IDENT = "literal"` style assignment; the first assignment
/// of an identifier wins so results do not depend on later shadowing.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    pub fn build<'a, I>(assignment: &Regex, contents: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut aliases = HashMap::new();
        for content in contents {
            for caps in assignment.captures_iter(content) {
                if let (Some(ident), Some(literal)) = (caps.get(1), caps.get(2)) {
                    aliases
                        .entry(ident.as_str().to_string())
                        .or_insert_with(|| literal.as_str().to_string());
                }
            }
        }
        Self { aliases }
    }

    /// Resolves an identifier; `pkg.Name` resolves by its last segment
    pub fn resolve(&self, identifier: &str) -> Option<&str> {
        let last = identifier.rsplit('.').next().unwrap_or(identifier);
        self.aliases.get(last).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
