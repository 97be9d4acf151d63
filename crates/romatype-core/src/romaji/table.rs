/// Built-in forward table, validated by `build.rs`.
pub(crate) const DEFAULT_TOML: &str = include_str!("default_romaji.toml");
