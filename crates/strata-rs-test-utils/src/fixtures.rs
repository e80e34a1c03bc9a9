//! Sample config documents and temp-dir helpers.
//!
//! Every document describes the same settings:
//! `settings.base = "USD"`, `settings.exchange = "CCCAGG"` and
//! `coins = ["BTC", "ETH", "TRX"]`. Line-based formats store the coin list as
//! a comma-joined string.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const INVESTMENTS_YAML: &str = "\
---
settings:
  base: USD
  exchange: CCCAGG
coins:
  - BTC
  - ETH
  - TRX
";

pub const INVESTMENTS_JSON: &str = r#"{
  "settings": {
    "base": "USD",
    "exchange": "CCCAGG"
  },
  "coins": ["BTC", "ETH", "TRX"]
}
"#;

pub const INVESTMENTS_JSON5: &str = r#"{
  // prices are quoted in the base currency
  settings: {
    base: 'USD',
    exchange: 'CCCAGG',
  },
  coins: ['BTC', 'ETH', 'TRX'],
}
"#;

pub const INVESTMENTS_TOML: &str = r#"coins = ["BTC", "ETH", "TRX"]

[settings]
base = "USD"
exchange = "CCCAGG"
"#;

pub const INVESTMENTS_INI: &str = "\
; portfolio
coins = BTC,ETH,TRX

[settings]
base = USD
exchange = CCCAGG
";

pub const INVESTMENTS_PROPERTIES: &str = "\
# portfolio
coins=BTC,ETH,TRX
settings.base=USD
settings.exchange=CCCAGG
";

/// Fresh temporary directory for config files.
pub fn fixture_dir() -> TempDir {
    TempDir::new().expect("tmp")
}

/// Write `contents` to `dir/name`, creating parent directories as needed.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(&path, contents).expect("write");
    path
}
