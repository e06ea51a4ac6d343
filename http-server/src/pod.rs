/// Identity of this serving instance, reported on every response so callers
/// can see which replica answered.
///
/// Explicit override first, then the machine hostname (the pod name under
/// Kubernetes).
pub fn resolve_pod_id(configured: Option<&str>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| {
            hostname::get()
                .ok()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
