//! Google Maps credentials and URL signing.
//!
//! Premium-plan clients authenticate with a client ID and sign each request
//! URL: the path and query are signed with HMAC-SHA1 using the URL-safe
//! base64-decoded secret, and the URL-safe base64 digest is appended as
//! `signature`.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::ProviderBuildError;

type HmacSha1 = Hmac<Sha1>;

/// Secrets are issued padded but are often pasted without the padding.
const SECRET_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How requests are authenticated.
#[derive(Clone)]
pub(crate) enum Credentials {
    /// Standard API key.
    ApiKey(String),
    /// Client ID with a MAC keyed by the decoded signing secret.
    Client { id: String, signer: HmacSha1 },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Client { id, .. } => f
                .debug_struct("Client")
                .field("id", id)
                .field("signer", &"<redacted>")
                .finish(),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Credentials {
    /// Pick credentials: an API key wins over a client ID and secret.
    pub(crate) fn resolve(
        api_key: Option<&str>,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> Result<Self, ProviderBuildError> {
        if let Some(key) = present(api_key) {
            return Ok(Self::ApiKey(key.to_owned()));
        }
        match (present(client_id), present(client_secret)) {
            (Some(id), Some(secret)) => {
                let key = SECRET_ENGINE
                    .decode(secret)
                    .map_err(ProviderBuildError::InvalidSigningSecret)?;
                let signer = <HmacSha1 as KeyInit>::new_from_slice(&key)
                    .map_err(ProviderBuildError::InvalidSigningKey)?;
                Ok(Self::Client {
                    id: id.to_owned(),
                    signer,
                })
            }
            _ => Err(ProviderBuildError::MissingCredentials),
        }
    }

    /// Whether these are premium-plan client credentials.
    pub(crate) const fn is_client(&self) -> bool {
        matches!(self, Self::Client { .. })
    }

    /// Append authentication to `path_and_query` (which already has a query).
    pub(crate) fn authorise(&self, path_and_query: &str) -> String {
        match self {
            Self::ApiKey(key) => format!("{path_and_query}&key={key}"),
            Self::Client { id, signer } => {
                let unsigned = format!("{path_and_query}&client={id}");
                let signature = sign(signer.clone(), &unsigned);
                format!("{unsigned}&signature={signature}")
            }
        }
    }
}

/// URL-safe base64 HMAC-SHA1 of `message` under the key `mac` was built with.
fn sign(mut mac: HmacSha1, message: &str) -> String {
    mac.update(message.as_bytes());
    URL_SAFE.encode(mac.finalize().into_bytes())
}
