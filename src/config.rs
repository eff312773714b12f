use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::logging;
use crate::similarity::DEFAULT_TOP_N;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_DIR: &str = "static";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub bind: IpAddr,
    pub port: u16,
    pub default_top_n: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DIR),
            static_dir: PathBuf::from(DEFAULT_DIR),
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            default_top_n: DEFAULT_TOP_N,
        }
    }
}

impl AppConfig {
    /// Dotenv files, then logging, then parsing, so bad values are logged and
    /// `RUST_LOG` from `.env` applies.
    pub fn bootstrap() -> Self {
        Self::bootstrap_with(|key| std::env::var(key).ok())
    }

    pub fn bootstrap_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        load_dotenv();
        logging::init();
        Self::from_lookup(lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            data_dir: path_var(&lookup, "SCOUT_DATA_DIR").unwrap_or(d.data_dir),
            static_dir: path_var(&lookup, "SCOUT_STATIC_DIR").unwrap_or(d.static_dir),
            bind: parsed_var(&lookup, "SCOUT_BIND").unwrap_or(d.bind),
            port: parsed_var(&lookup, "SCOUT_PORT").unwrap_or(d.port),
            default_top_n: parsed_var::<usize>(&lookup, "SCOUT_DEFAULT_TOP_N")
                .unwrap_or(d.default_top_n)
                .max(1),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Loads `.env.local`, then `.env`. Existing variables are not overridden.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn path_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<PathBuf> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .map(|v| PathBuf::from(v.trim()))
}

fn parsed_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring invalid {key}={raw:?}; using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn cfg(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(cfg(&[]), AppConfig::default());
        assert_eq!(cfg(&[]).socket_addr().to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn overrides_and_bad_values() {
        let c = cfg(&[
            ("SCOUT_DATA_DIR", "/data"),
            ("SCOUT_PORT", "9090"),
            ("SCOUT_BIND", "0.0.0.0"),
            ("SCOUT_DEFAULT_TOP_N", "0"),
        ]);
        assert_eq!(c.data_dir, PathBuf::from("/data"));
        assert_eq!(c.static_dir, PathBuf::from("static"));
        assert_eq!(c.port, 9090);
        assert_eq!(c.bind.to_string(), "0.0.0.0");
        assert_eq!(c.default_top_n, 1);

        let bad = cfg(&[("SCOUT_PORT", "eighty"), ("SCOUT_DATA_DIR", "  ")]);
        assert_eq!(bad.port, DEFAULT_PORT);
        assert_eq!(bad.data_dir, PathBuf::from("static"));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn invalid_value_is_logged() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let c = tracing::subscriber::with_default(subscriber, || cfg(&[("SCOUT_PORT", "eighty")]));
        assert_eq!(c.port, DEFAULT_PORT);

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("SCOUT_PORT"), "{out}");
    }
}
