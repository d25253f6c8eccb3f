/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field `smtp_host` is read from
/// `SMTP_HOST`, and so on. Use `#[serde(default = ...)]` for optional values.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns the `envy` error naming the missing or malformed variable.
    fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load from an explicit set of `(KEY, value)` pairs.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
