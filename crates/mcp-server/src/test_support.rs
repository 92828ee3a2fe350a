use std::sync::Mutex;

/// Serializes tests that read or mutate process environment variables.
///
/// Env vars are process-wide while tests run in parallel; hold this lock around any test that
/// touches `SPOTLIGHT_MCP_*`.
#[cfg(test)]
pub(crate) static ENV_MUTEX: Mutex<()> = Mutex::new(());
