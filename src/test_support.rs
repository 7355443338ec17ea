use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::DateTime;

use crate::{
    ApiError, ApiResult, AuthError, AuthResult, MessageResult, RequestToken, SocialApi,
    StatusResult, TokenPair, TokenReaderError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RequestToken,
    AccessToken(Option<String>),
    PostStatus(TokenPair, String),
    DirectMessage(TokenPair, String, String),
}

/// Scripted `SocialApi`. Exchange results are consumed in order; an empty
/// script yields `{AT, ATS}`.
#[derive(Default)]
pub struct FakeApi {
    pub calls: RefCell<Vec<Call>>,
    pub exchanges: RefCell<VecDeque<AuthResult<TokenPair>>>,
    pub reject_request_token: Option<u16>,
    pub reject_send: Option<u16>,
}

impl FakeApi {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_exchanges(exchanges: Vec<AuthResult<TokenPair>>) -> Self {
        FakeApi {
            exchanges: RefCell::new(exchanges.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.calls.borrow().len()
    }
}

pub fn rejected(status: u16) -> AuthError {
    AuthError::Rejected {
        status,
        message: "rejected".to_string(),
    }
}

pub fn not_yet_granted() -> AuthError {
    AuthError::TokenReader(TokenReaderError::TokenKeyNotFound(
        "oauth_token",
        String::new(),
    ))
}

fn created_at() -> chrono::DateTime<chrono::FixedOffset> {
    DateTime::parse_from_rfc3339("2013-05-01T12:00:00+00:00").unwrap()
}

impl SocialApi for FakeApi {
    fn request_token(&self) -> AuthResult<RequestToken> {
        self.calls.borrow_mut().push(Call::RequestToken);
        if let Some(status) = self.reject_request_token {
            return Err(rejected(status));
        }
        Ok(RequestToken {
            token: "RT".to_string(),
            secret: "RTS".to_string(),
            authorization_url: "https://api.twitter.com/oauth/authorize?oauth_token=RT"
                .to_string(),
        })
    }

    fn access_token(
        &self,
        request: &RequestToken,
        verifier: Option<&str>,
    ) -> AuthResult<TokenPair> {
        assert_eq!(request.token, "RT");
        self.calls
            .borrow_mut()
            .push(Call::AccessToken(verifier.map(str::to_string)));
        self.exchanges
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(TokenPair::new("AT", "ATS")))
    }

    fn post_status(&self, access: &TokenPair, text: &str) -> ApiResult<StatusResult> {
        self.calls
            .borrow_mut()
            .push(Call::PostStatus(access.clone(), text.to_string()));
        if let Some(status) = self.reject_send {
            return Err(ApiError::Rejected {
                status,
                code: Some(187),
                message: "Status is a duplicate.".to_string(),
            });
        }
        Ok(StatusResult {
            id: "1".to_string(),
            text: text.to_string(),
            created_at: created_at(),
        })
    }

    fn send_direct_message(
        &self,
        access: &TokenPair,
        recipient: &str,
        text: &str,
    ) -> ApiResult<MessageResult> {
        self.calls.borrow_mut().push(Call::DirectMessage(
            access.clone(),
            recipient.to_string(),
            text.to_string(),
        ));
        if let Some(status) = self.reject_send {
            return Err(ApiError::Rejected {
                status,
                code: Some(150),
                message: "You cannot send messages to users who are not following you."
                    .to_string(),
            });
        }
        Ok(MessageResult {
            id: "2".to_string(),
            recipient_screen_name: recipient.to_string(),
            text: text.to_string(),
            created_at: created_at(),
        })
    }
}
