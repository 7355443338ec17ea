use std::fmt;

/// Exposes the key material the signer needs for one request.
pub trait SecretsProvider {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str);

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)>;

    fn get_token_option_pair<'a>(&'a self) -> (Option<&'a str>, Option<&'a str>) {
        self.get_token_pair_option()
            .map(|s| (Some(s.0), Some(s.1)))
            .unwrap_or((None, None))
    }
}

/// Application credentials, issued when the integration was registered.
#[derive(Clone, PartialEq, Eq)]
pub struct ConsumerPair {
    pub key: String,
    pub secret: String,
}

impl ConsumerPair {
    pub fn new<TKey, TSecret>(key: TKey, secret: TSecret) -> Self
    where
        TKey: Into<String>,
        TSecret: Into<String>,
    {
        ConsumerPair {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Pairs these consumer credentials with an access token.
    pub fn token(self, access: TokenPair) -> Credential {
        Credential {
            consumer: self,
            access,
        }
    }
}

impl fmt::Debug for ConsumerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerPair")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl SecretsProvider for ConsumerPair {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        (&self.key, &self.secret)
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        None
    }
}

/// An access token and its secret. This is also the form the token
/// store persists.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub token: String,
    pub secret: String,
}

impl TokenPair {
    pub fn new<TToken, TSecret>(token: TToken, secret: TSecret) -> Self
    where
        TToken: Into<String>,
        TSecret: Into<String>,
    {
        TokenPair {
            token: token.into(),
            secret: secret.into(),
        }
    }

    /// Builds a pair only when both halves are present and non-blank.
    pub fn from_parts(token: Option<&str>, secret: Option<&str>) -> Option<Self> {
        match (token, secret) {
            (Some(t), Some(s)) if !t.trim().is_empty() && !s.trim().is_empty() => {
                Some(TokenPair::new(t, s))
            }
            _ => None,
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Short-lived token that starts the out-of-band handshake.
#[derive(Clone)]
pub struct RequestToken {
    pub token: String,
    pub secret: String,
    pub authorization_url: String,
}

impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestToken")
            .field("token", &self.token)
            .field("secret", &"<redacted>")
            .field("authorization_url", &self.authorization_url)
            .finish()
    }
}

/// Consumer credentials joined with a user's access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub consumer: ConsumerPair,
    pub access: TokenPair,
}

impl SecretsProvider for Credential {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        self.consumer.get_consumer_key_pair()
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        Some((&self.access.token, &self.access.secret))
    }
}

/// Signs with the consumer pair and an arbitrary token pair without
/// cloning either. Used while exchanging a request token.
#[derive(Debug, Clone, Copy)]
pub struct BorrowedSecrets<'s> {
    consumer: &'s ConsumerPair,
    token: (&'s str, &'s str),
}

impl<'s> BorrowedSecrets<'s> {
    pub fn new(consumer: &'s ConsumerPair, token: &'s str, token_secret: &'s str) -> Self {
        BorrowedSecrets {
            consumer,
            token: (token, token_secret),
        }
    }
}

impl SecretsProvider for BorrowedSecrets<'_> {
    fn get_consumer_key_pair<'a>(&'a self) -> (&'a str, &'a str) {
        self.consumer.get_consumer_key_pair()
    }

    fn get_token_pair_option<'a>(&'a self) -> Option<(&'a str, &'a str)> {
        Some(self.token)
    }
}
