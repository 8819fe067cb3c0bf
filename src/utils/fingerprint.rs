use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The client identity presented to a catalog: user agent plus the headers a
/// real browser of that kind would send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub name: String,
    pub user_agent: String,
    pub headers: Vec<HeaderPair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

fn header(name: &str, value: &str) -> HeaderPair {
    HeaderPair {
        name: name.to_string(),
        value: value.to_string(),
    }
}

impl Fingerprint {
    /// Request headers for this fingerprint. Entries that are not valid HTTP
    /// headers are skipped. Accept-Encoding is left to the client so that
    /// responses are always decodable.
    pub fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();

        match HeaderValue::from_str(&self.user_agent) {
            Ok(value) => {
                map.insert(USER_AGENT, value);
            }
            Err(_) => warn!("Fingerprint {} has an invalid user agent", self.name),
        }

        for pair in &self.headers {
            let parsed = (
                HeaderName::from_bytes(pair.name.as_bytes()),
                HeaderValue::from_str(&pair.value),
            );
            match parsed {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => warn!("Skipping invalid header {} in fingerprint {}", pair.name, self.name),
            }
        }

        map
    }
}

/// The set fingerprints are drawn from. Never empty.
#[derive(Debug, Clone)]
pub struct FingerprintRotation {
    fingerprints: Vec<Fingerprint>,
}

impl FingerprintRotation {
    /// Falls back to [`default_fingerprints`] when `fingerprints` is empty.
    pub fn new(fingerprints: Vec<Fingerprint>) -> Self {
        if fingerprints.is_empty() {
            warn!("No fingerprints configured, using built-in set");
            return Self {
                fingerprints: default_fingerprints(),
            };
        }
        Self { fingerprints }
    }

    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> &Fingerprint {
        self.fingerprints
            .choose(rng)
            .unwrap_or(&self.fingerprints[0])
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}

/// Mobile Safari, desktop Chrome and desktop Firefox.
pub fn default_fingerprints() -> Vec<Fingerprint> {
    vec![
        Fingerprint {
            name: "mobile-safari".to_string(),
            user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1".to_string(),
            headers: vec![
                header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
                header("Accept-Language", "en-US,en;q=0.5"),
                header("DNT", "1"),
                header("Upgrade-Insecure-Requests", "1"),
            ],
        },
        Fingerprint {
            name: "desktop-chrome".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            headers: vec![
                header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8"),
                header("Accept-Language", "en-US,en;q=0.9"),
                header("Cache-Control", "no-cache"),
                header("Pragma", "no-cache"),
                header("Sec-Ch-Ua", "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\""),
                header("Sec-Ch-Ua-Mobile", "?0"),
                header("Sec-Ch-Ua-Platform", "\"Windows\""),
                header("Sec-Fetch-Dest", "document"),
                header("Sec-Fetch-Mode", "navigate"),
                header("Sec-Fetch-Site", "none"),
                header("Sec-Fetch-User", "?1"),
                header("Upgrade-Insecure-Requests", "1"),
                header("DNT", "1"),
            ],
        },
        Fingerprint {
            name: "desktop-firefox".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string(),
            headers: vec![
                header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"),
                header("Accept-Language", "en-US,en;q=0.5"),
                header("DNT", "1"),
                header("Upgrade-Insecure-Requests", "1"),
                header("Sec-Fetch-Dest", "document"),
                header("Sec-Fetch-Mode", "navigate"),
                header("Sec-Fetch-Site", "none"),
                header("Sec-Fetch-User", "?1"),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn selection_is_deterministic_under_a_seed() {
        let rotation = FingerprintRotation::new(default_fingerprints());
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| rotation.select(&mut rng).name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
    }

    #[test]
    fn selection_covers_the_rotation() {
        let rotation = FingerprintRotation::new(default_fingerprints());
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen: Vec<String> = (0..200)
            .map(|_| rotation.select(&mut rng).name.clone())
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), rotation.len());
    }

    #[test]
    fn empty_rotation_uses_builtin_set() {
        let rotation = FingerprintRotation::new(Vec::new());
        assert_eq!(rotation.len(), 3);
    }

    #[test]
    fn header_map_skips_invalid_entries() {
        let fingerprint = Fingerprint {
            name: "test".to_string(),
            user_agent: "parts-test/1.0".to_string(),
            headers: vec![header("Accept", "text/html"), header("Bad Header", "x")],
        };
        let map = fingerprint.header_map();
        assert_eq!(map.get(USER_AGENT).unwrap(), "parts-test/1.0");
        assert_eq!(map.get("accept").unwrap(), "text/html");
        assert_eq!(map.len(), 2);
    }
}
