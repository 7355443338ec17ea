//! The two things the herald can do: tweet, or send a direct message.

use tracing::{info, warn};

use crate::activity_log;
use crate::{
    AuthorizationFlow, Error, MessageResult, OperatorPort, Result, Settings, SocialApi,
    StatusResult, TokenSource, TokenStore, MESSAGE_LOG, STATUS_LOG,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PostStatus,
    DirectMessage,
}

impl Action {
    fn describe(self) -> &'static str {
        match self {
            Action::PostStatus => "send tweet",
            Action::DirectMessage => "send direct message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Status(StatusResult),
    Message(MessageResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub sent: Sent,
    pub token_source: TokenSource,
    /// Whether a newly granted token was written to the work directory.
    pub token_saved: bool,
}

/// Runs one action end to end.
///
/// Settings are validated before any network traffic. After the API call
/// succeeds, the activity log line and a newly granted token are written on
/// a best-effort basis; failing either does not turn the outcome into an error.
pub fn execute<A, P>(settings: &Settings, action: Action, api: &A, port: &mut P) -> Result<Outcome>
where
    A: SocialApi + ?Sized,
    P: OperatorPort + ?Sized,
{
    let consumer = settings.consumer()?;
    let text = settings.message()?;
    let recipient = match action {
        Action::DirectMessage => Some(settings.recipient()?),
        Action::PostStatus => None,
    };
    let work_dir = settings.work_directory();
    let store = TokenStore::new(&work_dir);

    let authorization = AuthorizationFlow::new(api, port).authorize(
        &consumer,
        settings.configured_access(),
        &store,
    )?;
    let access = &authorization.credential.access;

    let sent = match recipient {
        None => {
            let status = api.post_status(access, &text).map_err(|source| Error::Api {
                action: action.describe(),
                source,
            })?;
            info!(id = %status.id, "sent tweet: {}", status.text);
            activity_log::record(&work_dir, STATUS_LOG, &activity_log::status_line(&status));
            Sent::Status(status)
        }
        Some(recipient) => {
            let message = api
                .send_direct_message(access, recipient, &text)
                .map_err(|source| Error::Api {
                    action: action.describe(),
                    source,
                })?;
            info!(
                id = %message.id,
                "sent direct message to @{}: {}", message.recipient_screen_name, message.text
            );
            activity_log::record(&work_dir, MESSAGE_LOG, &activity_log::message_line(&message));
            Sent::Message(message)
        }
    };

    let token_saved = authorization.is_new()
        && match store.save(access) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %store.path().display(), error = %e, "could not store access token");
                false
            }
        };

    Ok(Outcome {
        sent,
        token_source: authorization.source,
        token_saved,
    })
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;
    use crate::test_support::{rejected, Call, FakeApi};
    use crate::{ApiError, ConfigError, ErrorCategory, ProjectInfo, StreamPort, TokenPair};

    fn settings(work_dir: &Path) -> Settings {
        Settings {
            consumer_key: Some("ck".to_string()),
            consumer_secret: Some("cs".to_string()),
            work_directory: Some(work_dir.to_path_buf()),
            project: ProjectInfo {
                artifact_id: Some("herald".to_string()),
                version: Some("1.0.0".to_string()),
                url: None,
            },
            ..Default::default()
        }
    }

    fn port(input: &str) -> StreamPort<Cursor<Vec<u8>>, Vec<u8>> {
        StreamPort::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn pin_grant_posts_and_stores_token() {
        let dir = tempdir().unwrap();
        let work_dir = dir.path().join("twitter");
        let api = FakeApi::new();
        let outcome =
            execute(&settings(&work_dir), Action::PostStatus, &api, &mut port("123456\n")).unwrap();

        assert_eq!(outcome.token_source, TokenSource::Granted);
        assert!(outcome.token_saved);
        assert_eq!(
            api.calls(),
            vec![
                Call::RequestToken,
                Call::AccessToken(Some("123456".to_string())),
                Call::PostStatus(TokenPair::new("AT", "ATS"), "herald:1.0.0 released!".to_string()),
            ]
        );
        assert_eq!(
            TokenStore::new(&work_dir).load(),
            Some(TokenPair::new("AT", "ATS"))
        );
        let log = fs::read_to_string(work_dir.join(STATUS_LOG)).unwrap();
        assert_eq!(log, "2013-05-01T12:00:00+0000 herald:1.0.0 released!\n");
    }

    #[test]
    fn rejected_grant_writes_nothing() {
        let dir = tempdir().unwrap();
        let api = FakeApi::with_exchanges(vec![Err(rejected(401))]);
        let err = execute(&settings(dir.path()), Action::PostStatus, &api, &mut port("123456\n"))
            .unwrap_err();

        match &err {
            Error::Authorization(auth) => assert_eq!(auth.code(), Some(401)),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.category(), ErrorCategory::Remote);
        assert!(!TokenStore::new(dir.path()).path().exists());
        assert!(!dir.path().join(STATUS_LOG).exists());
    }

    #[test]
    fn configured_token_is_not_persisted() {
        let dir = tempdir().unwrap();
        let mut settings = settings(dir.path());
        settings.access_token = Some("cfg".to_string());
        settings.access_token_secret = Some("cfg-secret".to_string());
        let api = FakeApi::new();
        let outcome = execute(&settings, Action::PostStatus, &api, &mut port("")).unwrap();

        assert_eq!(outcome.token_source, TokenSource::Configured);
        assert!(!outcome.token_saved);
        assert_eq!(api.calls().len(), 1);
        assert_eq!(TokenStore::new(dir.path()).load(), None);
    }

    #[test]
    fn store_failure_does_not_mask_success() {
        let dir = tempdir().unwrap();
        // the work directory path is occupied by a file
        let work_dir = dir.path().join("twitter");
        fs::write(&work_dir, "not a directory").unwrap();
        let api = FakeApi::new();
        let outcome =
            execute(&settings(&work_dir), Action::PostStatus, &api, &mut port("\n")).unwrap();

        assert!(!outcome.token_saved);
        assert!(matches!(outcome.sent, Sent::Status(_)));
    }

    #[test]
    fn missing_consumer_key_fails_before_network() {
        let dir = tempdir().unwrap();
        let mut settings = settings(dir.path());
        settings.consumer_key = None;
        let api = FakeApi::new();
        let err = execute(&settings, Action::PostStatus, &api, &mut port("123456\n")).unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingCredentials("consumer key"))
        ));
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(api.network_calls(), 0);
    }

    #[test]
    fn direct_message_requires_recipient() {
        let dir = tempdir().unwrap();
        let api = FakeApi::new();
        let err = execute(&settings(dir.path()), Action::DirectMessage, &api, &mut port(""))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingRecipient)));
        assert_eq!(api.network_calls(), 0);
    }

    #[test]
    fn direct_message_uses_cached_token_and_logs() {
        let dir = tempdir().unwrap();
        TokenStore::new(dir.path())
            .save(&TokenPair::new("cached", "cached-secret"))
            .unwrap();
        let mut settings = settings(dir.path());
        settings.recipient_screen_name = Some("maintainer".to_string());
        settings.message = Some("shipped".to_string());
        let api = FakeApi::new();
        let outcome = execute(&settings, Action::DirectMessage, &api, &mut port("")).unwrap();

        assert_eq!(outcome.token_source, TokenSource::Cached);
        assert!(!outcome.token_saved);
        assert_eq!(
            api.calls(),
            vec![Call::DirectMessage(
                TokenPair::new("cached", "cached-secret"),
                "maintainer".to_string(),
                "shipped".to_string()
            )]
        );
        let log = fs::read_to_string(dir.path().join(MESSAGE_LOG)).unwrap();
        assert_eq!(log, "2013-05-01T12:00:00+0000 maintainer shipped\n");
    }

    #[test]
    fn api_rejection_is_reported_and_token_kept_unsaved() {
        let dir = tempdir().unwrap();
        let api = FakeApi {
            reject_send: Some(403),
            ..Default::default()
        };
        let err = execute(&settings(dir.path()), Action::PostStatus, &api, &mut port("\n"))
            .unwrap_err();

        match &err {
            Error::Api {
                action,
                source: ApiError::Rejected { code, .. },
            } => {
                assert_eq!(*action, "send tweet");
                assert_eq!(*code, Some(187));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(TokenStore::new(dir.path()).load(), None);
    }
}
