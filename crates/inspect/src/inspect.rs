use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use kdom_gate::{ActingUser, Action, ContentType, Resolver, affordances, to_descriptor};

/// What to print for a (user, resource) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The capability result.
    Resolve,
    /// The result plus matched rules and resource state.
    Explain,
    /// Only the actions the user may take.
    Actions,
}

pub fn load_json(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {} as JSON", path.display()))
}

/// Run the gate over raw JSON inputs.
///
/// `user = None` resolves as a guest. A resource payload the adapter rejects is
/// reported as "content unavailable" with the adapter's error as the cause.
pub fn inspect(
    resolver: &Resolver,
    mode: Mode,
    user: Option<&Value>,
    resource: &Value,
    content_type: ContentType,
) -> anyhow::Result<Value> {
    let user: Option<ActingUser> = user
        .map(|raw| serde_json::from_value(raw.clone()))
        .transpose()
        .context("invalid acting user")?;

    let descriptor = to_descriptor(resource, content_type).context("content unavailable")?;

    tracing::info!(
        resource_id = %descriptor.id(),
        content_type = %content_type,
        authenticated = user.map(|u| u.is_authenticated).unwrap_or(false),
        "inspecting gate decision"
    );

    let output = match mode {
        Mode::Resolve => serde_json::to_value(resolver.resolve(user.as_ref(), &descriptor))?,
        Mode::Explain => serde_json::to_value(resolver.explain(user.as_ref(), &descriptor))?,
        Mode::Actions => {
            let result = resolver.resolve(user.as_ref(), &descriptor);
            serde_json::to_value(affordances(&result, &Action::ALL))?
        }
    };

    Ok(output)
}
