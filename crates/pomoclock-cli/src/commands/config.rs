use clap::Subcommand;
use pomoclock_core::config::{
    KEY_FOCUS, KEY_LONG_BREAK, KEY_LONG_BREAK_INTERVAL, KEY_SHORT_BREAK,
};
use pomoclock_core::storage::KEY_KEEP_NOTIFICATIONS;
use pomoclock_core::{Store, TimerConfig};

/// Keys the settings surface accepts. Durations are in seconds.
const SETTINGS_KEYS: [&str; 5] = [
    KEY_FOCUS,
    KEY_SHORT_BREAK,
    KEY_LONG_BREAK,
    KEY_LONG_BREAK_INTERVAL,
    KEY_KEEP_NOTIFICATIONS,
];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "POMODORO", "LONG_BREAK_INTERVAL")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;
    match action {
        ConfigAction::Get { key } => {
            require_known(&key)?;
            match store.get(&key)? {
                Some(value) => println!("{value}"),
                None => println!("{}", default_for(&key)),
            }
        }
        ConfigAction::Set { key, value } => {
            require_known(&key)?;
            validate(&key, &value)?;
            store.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let mut map = serde_json::Map::new();
            for key in SETTINGS_KEYS {
                let value = store.get(key)?.unwrap_or_else(|| default_for(key));
                map.insert(key.to_string(), serde_json::Value::String(value));
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::Value::Object(map))?
            );
        }
        ConfigAction::Reset => {
            TimerConfig::default().save(&store)?;
            store.set(KEY_KEEP_NOTIFICATIONS, "true")?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

fn require_known(key: &str) -> Result<(), Box<dyn std::error::Error>> {
    if SETTINGS_KEYS.contains(&key) {
        Ok(())
    } else {
        Err(format!("unknown key: {key}").into())
    }
}

fn validate(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
    match key {
        KEY_KEEP_NOTIFICATIONS => match value.parse::<bool>() {
            Ok(_) => Ok(()),
            Err(_) => Err(format!("expected true or false, got '{value}'").into()),
        },
        _ => match value.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(()),
            _ => Err(format!("expected a positive integer, got '{value}'").into()),
        },
    }
}

fn default_for(key: &str) -> String {
    let defaults = TimerConfig::default();
    match key {
        KEY_FOCUS => defaults.focus_secs.to_string(),
        KEY_SHORT_BREAK => defaults.short_break_secs.to_string(),
        KEY_LONG_BREAK => defaults.long_break_secs.to_string(),
        KEY_LONG_BREAK_INTERVAL => defaults.long_break_interval.to_string(),
        _ => "true".to_string(),
    }
}
