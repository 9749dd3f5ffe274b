use strum::{Display, EnumString};

/// Selects which backend handles a key.
///
/// Keys are scoped per mode: the same key string in two modes names two
/// unrelated entries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display, uniffi::Enum,
)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// One file per key in the application cache directory, shadowed by an
    /// in-memory read-through map.
    #[default]
    File,
    /// The host's preferences table. Writes request immediate durability.
    Preferences,
    /// The host's secure credential vault, readable only while unlocked.
    Secure,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use test_case::test_case;

    use super::Mode;

    #[test_case("file", Mode::File)]
    #[test_case("preferences", Mode::Preferences)]
    #[test_case("secure", Mode::Secure)]
    fn parses_lowercase_names(input: &str, expected: Mode) {
        assert_eq!(Mode::from_str(input).unwrap(), expected);
        assert_eq!(expected.to_string(), input);
    }

    #[test]
    fn defaults_to_file() {
        assert_eq!(Mode::default(), Mode::File);
        assert!(Mode::from_str("keychain").is_err());
    }
}
