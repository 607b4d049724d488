//! Engine-wide constants.

/// Default value that asks the engine to generate a random token.
pub const AUTOGEN_DEFAULT: &str = "autogen";

/// Default value (case-insensitive) that defers a field to a downstream consumer.
pub const USER_DOMAIN_LIST_DEFAULT: &str = "user_domain_list";

/// Length of an autogenerated token.
pub const AUTOGEN_TOKEN_LENGTH: usize = 8;

/// Text substituted for a field without a value under the literal policy.
pub const MISSING_VALUE_LITERAL: &str = "undefined";

/// Kube type used when neither the package nor the config names one.
pub const DEFAULT_KUBE_TYPE: u64 = 0;

/// Unit suffix for persistent disk totals.
pub const PERSISTENT_DISK_UNITS: &str = "GB";

/// Separator between the parts of a formatted price.
pub const NBSP: &str = "\u{a0}";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "kapp";
