//! Token form inputs and the launch request they resolve to.

pub const DEFAULT_NAME: &str = "FR";
pub const DEFAULT_SYMBOL: &str = "FR";
pub const DEFAULT_URI: &str = "https://cdn.100xdevs.com/metadata.json";
/// Raw base units minted when no usable supply is given.
pub const DEFAULT_SUPPLY: u64 = 1_000_000_000;
pub const DEFAULT_DECIMALS: u8 = 9;

/// The four text inputs as the user typed them. Nothing is validated here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenForm {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub initial_supply: String,
}

/// Resolved, immutable inputs of a single launch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchRequest {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub supply: u64,
    pub decimals: u8,
}

impl TokenForm {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        uri: impl Into<String>,
        initial_supply: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            uri: uri.into(),
            initial_supply: initial_supply.into(),
        }
    }

    pub fn resolve(&self) -> LaunchRequest {
        self.resolve_with_decimals(DEFAULT_DECIMALS)
    }

    /// Substitutes the fallback for every empty field.
    pub fn resolve_with_decimals(&self, decimals: u8) -> LaunchRequest {
        LaunchRequest {
            name: or_default(&self.name, DEFAULT_NAME),
            symbol: or_default(&self.symbol, DEFAULT_SYMBOL),
            uri: or_default(&self.uri, DEFAULT_URI),
            supply: parse_supply(&self.initial_supply),
            decimals,
        }
    }
}

impl Default for LaunchRequest {
    fn default() -> Self {
        TokenForm::default().resolve()
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Non-numeric input silently falls back to [`DEFAULT_SUPPLY`].
pub fn parse_supply(value: &str) -> u64 {
    value.trim().parse::<u64>().unwrap_or(DEFAULT_SUPPLY)
}
