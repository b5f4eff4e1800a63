//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie session stores two things: the selected user's id and whether
//! administrator mode was unlocked with the passcode.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ADMIN_KEY: &str = "admin";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Select `user_id` as the current user, leaving administrator mode.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.remove(ADMIN_KEY);
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Select `user_id` and unlock administrator mode.
    pub fn persist_admin(&self, user_id: &UserId) -> Result<(), Error> {
        self.persist_user(user_id)?;
        self.0
            .insert(ADMIN_KEY, true)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id, if one is selected.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match UserId::new(raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                None
            }
        }))
    }

    /// Require a selected user or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("Select a user first."))
    }

    /// Whether administrator mode is unlocked.
    pub fn is_admin(&self) -> Result<bool, Error> {
        self.0
            .get::<bool>(ADMIN_KEY)
            .map(Option::unwrap_or_default)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Require administrator mode or return `403 Forbidden`.
    pub fn require_admin(&self) -> Result<UserId, Error> {
        let user_id = self.require_user_id()?;
        if self.is_admin()? {
            Ok(user_id)
        } else {
            Err(Error::forbidden("Administrator access required."))
        }
    }

    /// Forget the selected user and administrator mode.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
