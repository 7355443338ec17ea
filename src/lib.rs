/*!
release-herald: announce a release on Twitter from a build pipeline.

# Overview

The herald posts a status update (a "tweet") or sends a direct message on
behalf of a project, typically as the last step of a release. Requests are
signed with OAuth 1.0a through [oauth1-request](https://crates.io/crates/oauth1-request)
on top of a blocking [reqwest](https://crates.io/crates/reqwest) client.

The access token is resolved in this order:

1. an access token and secret given in the settings,
2. the token cached in `<work directory>/auth` by an earlier run,
3. the out-of-band PIN grant: the operator opens the printed URL, approves
   the application and types the PIN (or just hits enter).

A token obtained from step 3 is written back to the work directory once the
post has gone out, so later runs skip the grant.

# How to use

## Basic usecase 1 - sending the tweet

```no_run
use release_herald::{execute, Action, ConsolePort, HttpApi, Settings};

let settings = Settings {
    consumer_key: Some("[CONSUMER_KEY]".to_string()),
    consumer_secret: Some("[CONSUMER_SECRET]".to_string()),
    message: Some("Hello, Twitter!".to_string()),
    ..Default::default()
};

let api = HttpApi::new(settings.consumer()?, settings.endpoints()?)?;
let outcome = execute(&settings, Action::PostStatus, &api, &mut ConsolePort::console())?;
println!("{:?}", outcome.sent);
# Ok::<(), release_herald::Error>(())
```

## Basic usecase 2 - signing your own request

```no_run
use release_herald::{ConsumerPair, OAuthClientProvider, TokenPair};

let credential = ConsumerPair::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
    .token(TokenPair::new("[ACCESS_TOKEN]", "[TOKEN_SECRET]"));

let resp = reqwest::blocking::Client::new()
    .oauth1(&credential)
    .post("https://api.twitter.com/1.1/statuses/update.json")
    .form(&[("status", "Hello, Twitter!")])
    .send()?;
# Ok::<(), reqwest::Error>(())
```
*/
mod action;
mod activity_log;
mod api;
mod authorization;
mod client;
mod config;
mod error;
mod operator;
mod request;
mod secrets;
mod signer;
mod token_reader;
mod token_store;
#[cfg(test)]
mod test_support;

// exposed to external program
pub use action::{execute, Action, Outcome, Sent};
pub use activity_log::{MESSAGE_LOG, STATUS_LOG};
pub use api::{Endpoints, HttpApi, MessageResult, SocialApi, StatusResult};
pub use authorization::{Authorization, AuthorizationFlow, FlowState, TokenSource};
pub use client::{Client, OAuthClientProvider};
pub use config::{ProjectInfo, Settings, DEFAULT_WORK_DIRECTORY};
pub use error::{
    ApiError, ApiResult, AuthError, AuthResult, ConfigError, Error, ErrorCategory, Result,
    TokenReaderError, TokenReaderResult,
};
pub use operator::{ConsolePort, OperatorPort, StreamPort};
pub use request::RequestBuilder;
pub use secrets::{BorrowedSecrets, ConsumerPair, Credential, RequestToken, SecretsProvider, TokenPair};
pub use signer::{OAuthParameters, Signer};
pub use token_reader::{TokenReader, TokenReaderResultExt, TokenResponse};
pub use token_store::{TokenStore, ACCESS_TOKEN_KEY, ACCESS_TOKEN_SECRET_KEY, TOKEN_FILE_NAME};
