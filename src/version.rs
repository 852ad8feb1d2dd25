/// Package name reported at startup.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build version. A non-empty `TAGLINK_VERSION` at compile time replaces the
/// Cargo package version.
pub const VERSION: &str = match option_env!("TAGLINK_VERSION") {
    Some(version) if !version.is_empty() => version,
    _ => env!("CARGO_PKG_VERSION"),
};

pub fn banner() -> String {
    format!("{NAME} {VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_names_the_package_and_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(banner(), format!("taglink {VERSION}"));
        if option_env!("TAGLINK_VERSION").is_none() {
            assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        }
    }
}
