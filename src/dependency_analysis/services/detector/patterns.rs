use crate::shared::Result;
use anyhow::Context;
use regex::Regex;

/// One named regex inside a resource signature
#[derive(Debug, Clone)]
pub struct SignaturePattern {
    pub name: String,
    pub regex: Regex,
}

/// A resource variant: its canonical name, resource type, and the patterns
/// that identify it, tried in order
#[derive(Debug, Clone)]
pub struct ResourceSignature {
    pub name: String,
    pub resource_type: String,
    pub patterns: Vec<SignaturePattern>,
}

impl ResourceSignature {
    pub fn new(name: &str, resource_type: &str, patterns: &[(&str, &str)]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|(pattern_name, source)| {
                Ok(SignaturePattern {
                    name: pattern_name.to_string(),
                    regex: Regex::new(source)
                        .with_context(|| format!("invalid signature pattern '{}'", pattern_name))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.to_string(),
            resource_type: resource_type.to_string(),
            patterns,
        })
    }

    /// First pattern of this variant that matches `content`
    pub fn first_match(&self, content: &str) -> Option<&SignaturePattern> {
        self.patterns.iter().find(|p| p.regex.is_match(content))
    }
}

/// Ordered catalog of resource signatures
#[derive(Debug, Clone, Default)]
pub struct SignatureCatalog {
    signatures: Vec<ResourceSignature>,
}

const BUILTIN_SIGNATURES: &[(&str, &str, &[(&str, &str)])] = &[
    (
        "postgres",
        "database",
        &[
            ("postgres-url", r"postgres(?:ql)?://"),
            ("postgres-env", r"\bPOSTGRES_(?:HOST|PORT|USER|PASSWORD|DB|URL)\b"),
            ("pg-env", r"\bPG(?:HOST|PORT|USER|PASSWORD|DATABASE)\b"),
            ("postgres-driver", r"github\.com/(?:lib/pq|jackc/pgx)"),
        ],
    ),
    (
        "redis",
        "cache",
        &[
            ("redis-url", r"rediss?://"),
            ("redis-env", r"\bREDIS_(?:HOST|PORT|URL|PASSWORD)\b"),
            ("redis-driver", r"github\.com/(?:go-redis|redis)/(?:redis|go-redis)"),
        ],
    ),
    (
        "mysql",
        "database",
        &[
            ("mysql-url", r"mysql://"),
            ("mysql-env", r"\bMYSQL_(?:HOST|PORT|USER|PASSWORD|DATABASE)\b"),
        ],
    ),
    (
        "ollama",
        "ai",
        &[
            ("ollama-env", r"\bOLLAMA_(?:HOST|URL|BASE_URL|PORT)\b"),
            ("ollama-api", r"/api/(?:generate|embeddings|tags)\b.*ollama|ollama.*/api/(?:generate|embeddings|tags)\b"),
        ],
    ),
    (
        "n8n",
        "automation",
        &[
            ("n8n-env", r"\bN8N_(?:BASE_URL|HOST|PORT|API_KEY|WEBHOOK_URL)\b"),
            ("n8n-webhook", r"/webhook(?:-test)?/[A-Za-z0-9_-]+.*n8n"),
        ],
    ),
    (
        "qdrant",
        "vector_database",
        &[
            ("qdrant-env", r"\bQDRANT_(?:HOST|URL|PORT|API_KEY)\b"),
            ("qdrant-collections", r"/collections/[A-Za-z0-9_{}$-]+/points"),
        ],
    ),
    (
        "minio",
        "storage",
        &[
            ("minio-env", r"\bMINIO_(?:ENDPOINT|HOST|PORT|ACCESS_KEY|SECRET_KEY|ROOT_USER)\b"),
            ("minio-driver", r"github\.com/minio/minio-go"),
        ],
    ),
    (
        "browserless",
        "automation",
        &[("browserless-env", r"\bBROWSERLESS_(?:URL|HOST|PORT|TOKEN)\b")],
    ),
    (
        "windmill",
        "automation",
        &[("windmill-env", r"\bWINDMILL_(?:BASE_URL|URL|TOKEN|WORKSPACE)\b")],
    ),
    (
        "searxng",
        "search",
        &[("searxng-env", r"\bSEARXNG_(?:URL|HOST|PORT|BASE_URL)\b")],
    ),
    (
        "whisper",
        "ai",
        &[("whisper-env", r"\bWHISPER_(?:URL|HOST|PORT|BASE_URL)\b")],
    ),
    (
        "comfyui",
        "ai",
        &[("comfyui-env", r"\bCOMFYUI_(?:URL|HOST|PORT|BASE_URL)\b")],
    ),
    (
        "judge0",
        "execution",
        &[("judge0-env", r"\bJUDGE0_(?:URL|HOST|PORT|API_KEY)\b")],
    ),
    (
        "vault",
        "secrets",
        &[("vault-env", r"\bVAULT_(?:ADDR|TOKEN)\b")],
    ),
];

impl SignatureCatalog {
    pub fn new(signatures: Vec<ResourceSignature>) -> Self {
        Self { signatures }
    }

    /// The catalog shipped with the detector
    pub fn builtin() -> Result<Self> {
        let signatures = BUILTIN_SIGNATURES
            .iter()
            .map(|(name, resource_type, patterns)| {
                ResourceSignature::new(name, resource_type, patterns)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(signatures))
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Every variant matching `content`, in catalog order, each with the first
    /// of its patterns that matched
    pub fn matches<'a>(
        &'a self,
        content: &str,
    ) -> Vec<(&'a ResourceSignature, &'a SignaturePattern)> {
        self.signatures
            .iter()
            .filter_map(|signature| signature.first_match(content).map(|p| (signature, p)))
            .collect()
    }
}

/// Regexes for scenario references, resource commands, shared workflows and
/// alias assignments
#[derive(Debug, Clone)]
pub struct ReferencePatterns {
    pub scenario_command: Regex,
    pub cli_invocation: Regex,
    pub port_resolution: Regex,
    pub resource_command: Regex,
    pub shared_workflow: Regex,
    pub alias_assignment: Regex,
}

impl ReferencePatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scenario_command: compile(
                "scenario_command",
                r"\bvrooli\s+scenario\s+(?:run|test|status)\s+([A-Za-z0-9][A-Za-z0-9_-]*)",
            )?,
            cli_invocation: compile(
                "cli_invocation",
                r#"(?m)(?:^|[\s"'`(;|&=/])([a-z0-9][a-z0-9-]*?)-cli\b"#,
            )?,
            port_resolution: compile(
                "port_resolution",
                r#"resolveScenarioPortViaCLI\s*\(\s*[A-Za-z_][A-Za-z0-9_]*\s*,\s*(?:"([^"]+)"|'([^']+)'|([A-Za-z_][A-Za-z0-9_.]*))"#,
            )?,
            resource_command: compile(
                "resource_command",
                r"\bresource-([a-z0-9][a-z0-9-]*)",
            )?,
            shared_workflow: compile(
                "shared_workflow",
                r"(?:shared[-_]workflows|initialization/(?:automation/)?n8n/shared)/([A-Za-z0-9_-]+)",
            )?,
            alias_assignment: compile(
                "alias_assignment",
                r#"\b([A-Za-z_][A-Za-z0-9_]*)(?:\s*:\s*string|\s+string)?\s*(?::=|=)\s*["'`]([A-Za-z0-9][A-Za-z0-9_-]*)["'`]"#,
            )?,
        })
    }
}

fn compile(name: &str, source: &str) -> Result<Regex> {
    Regex::new(source).with_context(|| format!("invalid {} pattern", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_compiles() {
        let catalog = SignatureCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_first_pattern_wins_per_variant() {
        let catalog = SignatureCatalog::builtin().unwrap();
        let content = "url := \"postgres://localhost\"\nhost := os.Getenv(\"POSTGRES_HOST\")";
        let matches = catalog.matches(content);

        let postgres: Vec<_> = matches.iter().filter(|(s, _)| s.name == "postgres").collect();
        assert_eq!(postgres.len(), 1);
        assert_eq!(postgres[0].1.name, "postgres-url");
    }

    #[test]
    fn test_matches_follow_catalog_order() {
        let catalog = SignatureCatalog::new(vec![
            ResourceSignature::new("b", "x", &[("b", "beta")]).unwrap(),
            ResourceSignature::new("a", "x", &[("a", "alpha")]).unwrap(),
        ]);
        let names: Vec<_> = catalog
            .matches("alpha beta")
            .iter()
            .map(|(s, _)| s.name.clone())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(ResourceSignature::new("bad", "x", &[("bad", "(")]).is_err());
    }

    #[test]
    fn test_reference_patterns() {
        let patterns = ReferencePatterns::new().unwrap();

        let caps = patterns
            .scenario_command
            .captures("vrooli scenario run picker-wheel --port 3000")
            .unwrap();
        assert_eq!(&caps[1], "picker-wheel");

        let caps = patterns
            .cli_invocation
            .captures("  output=$(picker-wheel-cli spin)")
            .unwrap();
        assert_eq!(&caps[1], "picker-wheel");

        let caps = patterns
            .port_resolution
            .captures("port, err := resolveScenarioPortViaCLI(ctx, deps.BrowserScenario, \"API_PORT\")")
            .unwrap();
        assert_eq!(caps.get(3).unwrap().as_str(), "deps.BrowserScenario");

        let caps = patterns
            .port_resolution
            .captures("resolveScenarioPortViaCLI(ctx, \"notes\", \"API_PORT\")")
            .unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "notes");

        let caps = patterns
            .shared_workflow
            .captures("initialization/n8n/shared/ollama.json")
            .unwrap();
        assert_eq!(&caps[1], "ollama");

        let caps = patterns
            .alias_assignment
            .captures("const BrowserScenario = \"browser-automation-studio\"")
            .unwrap();
        assert_eq!(&caps[1], "BrowserScenario");
        assert_eq!(&caps[2], "browser-automation-studio");

        let caps = patterns
            .alias_assignment
            .captures("const NotesScenario string = \"notes\"")
            .unwrap();
        assert_eq!(&caps[1], "NotesScenario");
    }

    #[test]
    fn test_alias_assignment_ignores_comparisons() {
        let patterns = ReferencePatterns::new().unwrap();
        assert!(patterns
            .alias_assignment
            .captures("if name == \"notes\" {")
            .is_none());
    }
}
