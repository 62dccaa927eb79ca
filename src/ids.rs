/// Source of request-correlation identifiers attached to entries.
pub trait IdGenerator {
    fn generate(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Default generator.
///
/// A random v4 UUID. When the process environment carries a `UNIQUE_ID`
/// (exported by some fronting web servers) it is used as a prefix, so ids
/// stay traceable to it while remaining distinct per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&self) -> String {
        generate_with(|key| std::env::var(key).ok())
    }
}

fn generate_with<F>(get_env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let id = uuid::Uuid::new_v4();
    match get_env("UNIQUE_ID") {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}-{id}"),
        _ => id.to_string(),
    }
}
