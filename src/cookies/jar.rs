use cookie::Cookie;
use dashmap::DashMap;
use std::sync::Arc;
use time::OffsetDateTime;

/// Cookie persistence shared across requests.
///
/// The client core only reads a serialized header string on the way out
/// and hands raw `set-cookie` values in on the way back; everything else
/// (matching rules, storage policy) belongs to the implementation.
pub trait CookieJar: Send + Sync {
    /// The value to send as the outbound `cookie` request header.
    fn serialize(&self) -> String;

    /// Ingest inbound `set-cookie` header values.
    fn parse(&self, set_cookie: &[String]);
}

/// Blanket implementation for Arc-wrapped jars.
impl<J: CookieJar + ?Sized> CookieJar for Arc<J> {
    fn serialize(&self) -> String {
        (**self).serialize()
    }

    fn parse(&self, set_cookie: &[String]) {
        (**self).parse(set_cookie)
    }
}

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    expires: Option<OffsetDateTime>,
}

impl StoredCookie {
    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }
}

/// In-memory cookie jar keyed by cookie name.
///
/// Storage is last-writer-wins per name, with expired entries dropped
/// on the next read. Serialization is name-sorted so consecutive
/// requests that receive no new cookies produce identical outbound
/// headers.
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    store: DashMap<String, StoredCookie>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self { store: DashMap::new() }
    }

    /// Number of live cookies.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop every stored cookie.
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl CookieJar for MemoryCookieJar {
    fn serialize(&self) -> String {
        let now = OffsetDateTime::now_utc();
        self.store.retain(|_, stored| !stored.is_expired(now));

        let mut pairs: Vec<(String, String)> = self
            .store
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().value.clone()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn parse(&self, set_cookie: &[String]) {
        let now = OffsetDateTime::now_utc();
        for raw in set_cookie {
            let parsed = match Cookie::parse(raw.as_str()) {
                Ok(parsed) => parsed,
                Err(_) => {
                    tracing::debug!(header = %raw, "skipping unparseable set-cookie value");
                    continue;
                }
            };

            // Max-Age wins over Expires (RFC 6265 §5.3).
            let expires = parsed
                .max_age()
                .map(|age| now + age)
                .or_else(|| parsed.expires_datetime());

            if expires.is_some_and(|at| at <= now) {
                // An already-expired cookie is a deletion request.
                self.store.remove(parsed.name());
                continue;
            }

            self.store.insert(
                parsed.name().to_string(),
                StoredCookie { value: parsed.value().to_string(), expires },
            );
        }
    }
}
