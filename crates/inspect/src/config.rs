use anyhow::Context;

use kdom_gate::GatePolicy;

/// Comma-separated content types whose owners may delete them after approval.
pub const PUBLISHED_SELF_DELETE_ENV: &str = "KDOM_PUBLISHED_SELF_DELETE";

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone, Default)]
pub struct InspectConfig {
    pub policy: GatePolicy,
}

impl InspectConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in `main`).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let policy = match lookup(PUBLISHED_SELF_DELETE_ENV) {
            Some(raw) => GatePolicy::from_published_self_delete(&raw)
                .with_context(|| format!("invalid {PUBLISHED_SELF_DELETE_ENV} value '{raw}'"))?,
            None => {
                tracing::debug!("{PUBLISHED_SELF_DELETE_ENV} not set; using default gate policy");
                GatePolicy::default()
            }
        };

        Ok(Self { policy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdom_gate::ContentType;

    #[test]
    fn defaults_when_unset() {
        let config = InspectConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.policy, GatePolicy::default());
    }

    #[test]
    fn reads_policy_override() {
        let config = InspectConfig::from_lookup(|key| {
            (key == PUBLISHED_SELF_DELETE_ENV).then(|| "page".to_string())
        })
        .unwrap();
        assert!(config.policy.allows_published_self_delete(ContentType::Page));
        assert!(!config.policy.allows_published_self_delete(ContentType::Post));
    }

    #[test]
    fn rejects_bad_policy() {
        let err = InspectConfig::from_lookup(|_| Some("blog".to_string())).unwrap_err();
        assert!(err.to_string().contains(PUBLISHED_SELF_DELETE_ENV));
    }
}
