use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    config::SubscriptionConfig,
    error::{Result, SessionError},
    events::{EventBroadcaster, SessionEvent},
    models::{
        session::{Session, SessionRecord, SessionStatus},
        view::{select_screen, Screen, View},
    },
    store::KeyValueStore,
    utils::{clock::Clock, mask::mask_mobile},
};

pub const SESSION_KEY: &str = "kirana_pak_user_session_v1";

/// Owns the single storefront session: login, trial expiry, premium activation.
///
/// Every read goes through [`Session::reevaluate`], and every change is
/// written to the store before it becomes visible to callers.
#[derive(Clone)]
pub struct SessionLifecycleManager {
    session: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    policy: SubscriptionConfig,
    events: EventBroadcaster,
}

impl SessionLifecycleManager {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        policy: SubscriptionConfig,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            session: Arc::new(RwLock::new(None)),
            store,
            clock,
            policy,
            events,
        }
    }

    pub fn policy(&self) -> &SubscriptionConfig {
        &self.policy
    }

    pub fn events(&self) -> &EventBroadcaster {
        &self.events
    }

    /// Reads the stored record into memory. Anything unreadable counts as no session.
    pub async fn load_session(&self) -> Option<Session> {
        let loaded = match self.store.get(SESSION_KEY) {
            Ok(Some(raw)) => match SessionRecord::decode(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!("Discarding stored session: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read stored session: {}", e);
                None
            }
        };

        let mut guard = self.session.write().await;
        *guard = loaded;

        if let Err(e) = self.refresh(&mut guard) {
            tracing::warn!("Failed to persist re-evaluated session: {}", e);
        }

        if let Some(session) = guard.as_ref() {
            tracing::info!(
                "Loaded session for {} with status {:?}",
                mask_mobile(&session.mobile_number),
                session.status
            );
        }

        guard.clone()
    }

    /// First login step. Only checks the number; nothing is stored.
    pub fn request_otp(&self, mobile_number: &str) -> Result<()> {
        Session::validate_mobile_number(mobile_number, &self.policy)?;
        tracing::info!("OTP requested for {}", mask_mobile(mobile_number));
        Ok(())
    }

    /// Starts a fresh trial, replacing whatever session existed.
    pub async fn login(&self, mobile_number: &str) -> Result<Session> {
        let now = self.clock.now();
        let session = Session::start_trial(mobile_number, now, &self.policy)?;

        let mut guard = self.session.write().await;
        self.persist(&session)?;
        *guard = Some(session.clone());

        tracing::info!(
            "Started trial for {} at {}",
            mask_mobile(mobile_number),
            session.trial_start_date
        );
        self.events.broadcast(SessionEvent::SessionStarted {
            mobile_number: mask_mobile(&session.mobile_number),
            trial_start_date: session.trial_start_date,
        });

        Ok(session)
    }

    /// The session as of now, with trial expiry applied.
    pub async fn current(&self) -> Result<Option<Session>> {
        let mut guard = self.session.write().await;
        self.refresh(&mut guard)?;
        Ok(guard.clone())
    }

    /// Periodic form of [`current`](Self::current). Returns whether a trial expired.
    pub async fn recheck(&self) -> Result<bool> {
        let mut guard = self.session.write().await;
        self.refresh(&mut guard)
    }

    pub async fn activate_premium(&self) -> Result<Session> {
        let now = self.clock.now();
        let mut guard = self.session.write().await;

        let existing = guard.as_ref().ok_or_else(|| {
            tracing::error!("Premium activation attempted without a session");
            SessionError::NoSession
        })?;

        let previous = existing.reevaluate(now, &self.policy);
        let activated = previous.activate_premium(now, &self.policy)?;

        self.persist(&activated)?;
        *guard = Some(activated.clone());

        if let Some(expiry) = activated.premium_expiry_date {
            tracing::info!(
                "Premium activated for {} (was {:?}), valid until {}",
                mask_mobile(&activated.mobile_number),
                previous.status,
                expiry
            );
            self.events.broadcast(SessionEvent::PremiumActivated {
                mobile_number: mask_mobile(&activated.mobile_number),
                previous_status: previous.status,
                premium_expiry_date: expiry,
            });
        }

        Ok(activated)
    }

    pub async fn select_view(&self, requested: View) -> Result<Screen> {
        let session = self.current().await?;
        Ok(select_screen(session.as_ref(), requested))
    }

    /// Writes the whole record under [`SESSION_KEY`] in a single `set`.
    pub fn persist(&self, session: &Session) -> Result<()> {
        let encoded = SessionRecord::encode(session)?;
        self.store.set(SESSION_KEY, &encoded)
    }

    fn refresh(&self, slot: &mut Option<Session>) -> Result<bool> {
        let Some(session) = slot.as_ref() else {
            return Ok(false);
        };

        let now = self.clock.now();
        let reevaluated = session.reevaluate(now, &self.policy);
        if reevaluated == *session {
            return Ok(false);
        }

        self.persist(&reevaluated)?;

        if reevaluated.status == SessionStatus::TrialExpired {
            tracing::info!(
                "Trial for {} expired after {} days",
                mask_mobile(&reevaluated.mobile_number),
                reevaluated.trial_days_elapsed(now)
            );
            self.events.broadcast(SessionEvent::TrialExpired {
                mobile_number: mask_mobile(&reevaluated.mobile_number),
                expired_at: now,
            });
        }

        *slot = Some(reevaluated);
        Ok(true)
    }
}
