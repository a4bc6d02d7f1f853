use crate::dependency_analysis::domain::ResourceRequirements;

/// Resource names the platform ships. Used to classify a dependency name
/// when neither the scenario catalog nor stored edges say what it is.
pub const KNOWN_RESOURCE_NAMES: &[&str] = &[
    "postgres",
    "redis",
    "ollama",
    "n8n",
    "qdrant",
    "minio",
    "browserless",
    "windmill",
    "judge0",
    "searxng",
    "comfyui",
    "whisper",
    "unstructured-io",
    "agent-s2",
    "huginn",
    "node-red",
    "vault",
    "questdb",
    "mysql",
    "sqlite",
];

/// Spelling variants that refer to a canonical resource
const RESOURCE_ALIASES: &[(&str, &str)] = &[
    ("postgresql", "postgres"),
    ("pg", "postgres"),
    ("redis-server", "redis"),
    ("nodered", "node-red"),
    ("unstructured", "unstructured-io"),
];

/// Drop-in alternatives suggested when a dependency is removed or swapped
const ALTERNATIVES: &[(&str, &[&str])] = &[
    ("postgres", &["sqlite", "mysql"]),
    ("mysql", &["postgres", "sqlite"]),
    ("redis", &["memcached", "in-memory-cache"]),
    ("ollama", &["openrouter", "llama-cpp"]),
    ("n8n", &["windmill", "node-red"]),
    ("windmill", &["n8n"]),
    ("node-red", &["n8n"]),
    ("qdrant", &["pgvector", "chroma"]),
    ("minio", &["local-filesystem", "s3"]),
    ("browserless", &["playwright"]),
    ("searxng", &["brave-search-api"]),
    ("whisper", &["openai-whisper-api"]),
];

/// Candidate replacements per (resource, tier) for tiers where the resource
/// is a poor fit
const TIER_SWAPS: &[(&str, &str, &[&str])] = &[
    ("postgres", "desktop", &["sqlite"]),
    ("postgres", "mobile", &["sqlite"]),
    ("redis", "desktop", &["in-memory-cache"]),
    ("redis", "mobile", &["in-memory-cache"]),
    ("ollama", "mobile", &["openrouter"]),
    ("ollama", "saas", &["openrouter"]),
    ("ollama", "desktop", &["llama-cpp", "openrouter"]),
    ("qdrant", "desktop", &["pgvector"]),
    ("qdrant", "mobile", &["chroma"]),
    ("minio", "desktop", &["local-filesystem"]),
    ("minio", "mobile", &["local-filesystem"]),
    ("minio", "saas", &["s3"]),
    ("n8n", "desktop", &["embedded-workflows"]),
    ("n8n", "mobile", &["embedded-workflows"]),
    ("browserless", "mobile", &["remote-browserless"]),
];

/// Credentials each resource needs at deploy time. Resources missing from
/// this table need none.
const SECRETS: &[(&str, &[(&str, &str)])] = &[
    (
        "postgres",
        &[
            ("POSTGRES_USER", "Database user"),
            ("POSTGRES_PASSWORD", "Database password"),
        ],
    ),
    ("mysql", &[("MYSQL_PASSWORD", "Database password")]),
    ("redis", &[("REDIS_PASSWORD", "Redis AUTH password")]),
    (
        "n8n",
        &[
            ("N8N_API_KEY", "API key for workflow management"),
            ("N8N_WEBHOOK_SECRET", "Shared secret for inbound webhooks"),
        ],
    ),
    (
        "minio",
        &[
            ("MINIO_ACCESS_KEY", "Object storage access key"),
            ("MINIO_SECRET_KEY", "Object storage secret key"),
        ],
    ),
    ("qdrant", &[("QDRANT_API_KEY", "Vector database API key")]),
    ("browserless", &[("BROWSERLESS_TOKEN", "Browser pool token")]),
    ("windmill", &[("WINDMILL_TOKEN", "Workspace API token")]),
    ("vault", &[("VAULT_TOKEN", "Vault access token")]),
];

/// Typical footprint of a resource when its consumer declares none
const PROFILES: &[(&str, u64, u64, f64)] = &[
    ("postgres", 512, 2048, 1.0),
    ("mysql", 512, 2048, 1.0),
    ("redis", 128, 256, 0.25),
    ("ollama", 4096, 8192, 2.0),
    ("n8n", 512, 512, 0.5),
    ("qdrant", 512, 1024, 0.5),
    ("minio", 256, 4096, 0.5),
    ("browserless", 1024, 512, 1.0),
    ("windmill", 512, 512, 0.5),
    ("sqlite", 16, 64, 0.1),
];

/// ResourceKnowledge policy: static facts about platform resources
///
/// These tables are advisory data, not configuration; unknown resources
/// simply get no suggestions.
pub struct ResourceKnowledge;

impl ResourceKnowledge {
    /// Lower-cases and resolves spelling variants to the canonical name
    pub fn canonical_name(name: &str) -> String {
        let lowered = name.trim().to_lowercase();
        RESOURCE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(lowered)
    }

    pub fn is_known_resource(name: &str) -> bool {
        KNOWN_RESOURCE_NAMES.contains(&Self::canonical_name(name).as_str())
    }

    pub fn alternatives(name: &str) -> Vec<String> {
        let canonical = Self::canonical_name(name);
        ALTERNATIVES
            .iter()
            .find(|(resource, _)| *resource == canonical)
            .map(|(_, alts)| alts.iter().map(|a| a.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn tier_swaps(name: &str, tier: &str) -> Vec<String> {
        let canonical = Self::canonical_name(name);
        let tier = tier.to_lowercase();
        TIER_SWAPS
            .iter()
            .find(|(resource, t, _)| *resource == canonical && *t == tier)
            .map(|(_, _, alts)| alts.iter().map(|a| a.to_string()).collect())
            .unwrap_or_default()
    }

    /// `(secret name, description)` pairs required by a resource
    pub fn secrets(name: &str) -> Vec<(String, String)> {
        let canonical = Self::canonical_name(name);
        SECRETS
            .iter()
            .find(|(resource, _)| *resource == canonical)
            .map(|(_, secrets)| {
                secrets
                    .iter()
                    .map(|(n, d)| (n.to_string(), d.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn default_footprint(name: &str) -> ResourceRequirements {
        let canonical = Self::canonical_name(name);
        PROFILES
            .iter()
            .find(|(resource, ..)| *resource == canonical)
            .map(|(_, ram, disk, cpu)| ResourceRequirements::new(*ram, *disk, *cpu))
            .unwrap_or_default()
    }
}
