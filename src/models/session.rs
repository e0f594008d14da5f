use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    config::SubscriptionConfig,
    error::{Result, SessionError},
};

pub const SESSION_RECORD_VERSION: u32 = 1;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Trial,
    Premium,
    TrialExpired,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub mobile_number: String,
    pub status: SessionStatus,
    pub trial_start_date: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_expiry_date: Option<DateTime<Utc>>,
}

impl Session {
    pub fn validate_mobile_number(
        mobile_number: &str,
        policy: &SubscriptionConfig,
    ) -> Result<()> {
        let actual = mobile_number.chars().count();
        if actual < policy.min_mobile_length {
            return Err(SessionError::Validation {
                min_length: policy.min_mobile_length,
                actual,
            });
        }
        Ok(())
    }

    pub fn start_trial(
        mobile_number: &str,
        now: DateTime<Utc>,
        policy: &SubscriptionConfig,
    ) -> Result<Self> {
        Self::validate_mobile_number(mobile_number, policy)?;

        Ok(Self {
            mobile_number: mobile_number.to_string(),
            status: SessionStatus::Trial,
            trial_start_date: now,
            premium_expiry_date: None,
        })
    }

    /// Whole days since the trial started, rounded up. A start date in the
    /// future counts the same way as one in the past.
    pub fn trial_days_elapsed(&self, now: DateTime<Utc>) -> i64 {
        let elapsed_ms = (now - self.trial_start_date).num_milliseconds().abs();
        (elapsed_ms + DAY_MS - 1) / DAY_MS
    }

    /// Expires a trial that has run past its window. Every other session is
    /// returned unchanged, premium included.
    pub fn reevaluate(&self, now: DateTime<Utc>, policy: &SubscriptionConfig) -> Self {
        if self.status == SessionStatus::Trial
            && self.trial_days_elapsed(now) > policy.trial_days
        {
            return Self {
                status: SessionStatus::TrialExpired,
                ..self.clone()
            };
        }
        self.clone()
    }

    /// Window always restarts from `now`, even for a session that is already premium.
    pub fn activate_premium(
        &self,
        now: DateTime<Utc>,
        policy: &SubscriptionConfig,
    ) -> Result<Self> {
        let expiry = TimeDelta::try_days(policy.premium_days)
            .and_then(|window| now.checked_add_signed(window))
            .ok_or(SessionError::ExpiryOutOfRange {
                premium_days: policy.premium_days,
            })?;

        Ok(Self {
            status: SessionStatus::Premium,
            premium_expiry_date: Some(expiry),
            ..self.clone()
        })
    }

    pub fn offer_upgrade(&self) -> bool {
        self.status != SessionStatus::Premium
    }

    pub fn check_invariants(&self) -> Result<()> {
        match (self.status, self.premium_expiry_date) {
            (SessionStatus::Trial, Some(_)) => Err(SessionError::Malformed(
                "trial session carries a premium expiry date".to_string(),
            )),
            (SessionStatus::Premium, None) => Err(SessionError::Malformed(
                "premium session has no expiry date".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Stored form of a [`Session`]. Records written before versioning existed
/// have no `version` field and load as version 1.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SessionRecord {
    #[serde(default = "legacy_record_version")]
    pub version: u32,

    #[serde(flatten)]
    pub session: Session,
}

fn legacy_record_version() -> u32 {
    1
}

impl SessionRecord {
    pub fn encode(session: &Session) -> Result<String> {
        let record = SessionRecord {
            version: SESSION_RECORD_VERSION,
            session: session.clone(),
        };
        Ok(serde_json::to_string(&record)?)
    }

    pub fn decode(raw: &str) -> Result<Session> {
        let record: SessionRecord =
            serde_json::from_str(raw).map_err(|e| SessionError::Malformed(e.to_string()))?;

        if record.version > SESSION_RECORD_VERSION {
            return Err(SessionError::UnsupportedVersion(record.version));
        }

        record.session.check_invariants()?;
        Ok(record.session)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn at(timestamp: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(timestamp)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn policy() -> SubscriptionConfig {
        SubscriptionConfig::default()
    }

    #[test]
    fn short_mobile_numbers_are_rejected() {
        for number in ["", "300", "300123456"] {
            let err =
                Session::start_trial(number, at("2024-01-01T00:00:00Z"), &policy()).unwrap_err();
            assert!(matches!(err, SessionError::Validation { min_length: 10, .. }));
        }
    }

    #[test]
    fn login_starts_a_trial_now() {
        let now = at("2024-01-01T00:00:00Z");
        let session = Session::start_trial("3001234567", now, &policy()).unwrap();

        assert_eq!(session.mobile_number, "3001234567");
        assert_eq!(session.status, SessionStatus::Trial);
        assert_eq!(session.trial_start_date, now);
        assert!(session.premium_expiry_date.is_none());
        assert!(session.offer_upgrade());
    }

    #[test]
    fn trial_expires_only_after_seven_full_days() {
        let start = at("2024-01-01T00:00:00Z");
        let session = Session::start_trial("3001234567", start, &policy()).unwrap();

        let seven_days = Duration::days(7);

        let before = session.reevaluate(start + seven_days - Duration::seconds(1), &policy());
        assert_eq!(before, session);

        let exactly = session.reevaluate(start + seven_days, &policy());
        assert_eq!(exactly.status, SessionStatus::Trial);

        let after = session.reevaluate(start + seven_days + Duration::seconds(1), &policy());
        assert_eq!(after.status, SessionStatus::TrialExpired);
        assert_eq!(after.trial_start_date, start);
        assert!(after.premium_expiry_date.is_none());
    }

    #[test]
    fn reevaluate_is_idempotent() {
        let start = at("2024-01-01T00:00:00Z");
        let now = at("2024-01-20T12:00:00Z");
        let session = Session::start_trial("3001234567", start, &policy()).unwrap();

        let once = session.reevaluate(now, &policy());
        let twice = once.reevaluate(now, &policy());
        assert_eq!(once, twice);
    }

    #[test]
    fn premium_never_expires_by_trial_age() {
        let start = at("2024-01-01T00:00:00Z");
        let session = Session::start_trial("3001234567", start, &policy())
            .unwrap()
            .activate_premium(start, &policy())
            .unwrap();

        let much_later = session.reevaluate(at("2025-06-01T00:00:00Z"), &policy());
        assert_eq!(much_later, session);
        assert!(!much_later.offer_upgrade());
    }

    #[test]
    fn activation_resets_window_from_now_for_every_status() {
        let start = at("2024-01-01T00:00:00Z");
        let now = at("2024-03-01T10:00:00Z");
        let trial = Session::start_trial("3001234567", start, &policy()).unwrap();
        let expired = trial.reevaluate(at("2024-02-01T00:00:00Z"), &policy());
        let premium = trial.activate_premium(start, &policy()).unwrap();

        for session in [trial, expired, premium] {
            let activated = session.activate_premium(now, &policy()).unwrap();
            assert_eq!(activated.status, SessionStatus::Premium);
            assert_eq!(activated.premium_expiry_date, Some(now + Duration::days(30)));
            assert_eq!(activated.trial_start_date, start);
        }
    }

    #[test]
    fn storefront_scenario() {
        let session =
            Session::start_trial("3001234567", at("2024-01-01T00:00:00Z"), &policy()).unwrap();
        assert_eq!(
            serde_json::to_value(&session).unwrap(),
            serde_json::json!({
                "mobileNumber": "3001234567",
                "status": "trial",
                "trialStartDate": "2024-01-01T00:00:00Z"
            })
        );

        let now = at("2024-01-09T00:00:01Z");
        let expired = session.reevaluate(now, &policy());
        assert_eq!(expired.status, SessionStatus::TrialExpired);

        let premium = expired.activate_premium(now, &policy()).unwrap();
        assert_eq!(premium.status, SessionStatus::Premium);
        assert_eq!(premium.premium_expiry_date, Some(at("2024-02-08T00:00:01Z")));
    }

    #[test]
    fn decode_accepts_records_without_version() {
        let raw = concat!(
            r#"{"mobileNumber":"3001234567","status":"trial","#,
            r#""trialStartDate":"2024-01-01T00:00:00.000Z"}"#
        );
        let session = SessionRecord::decode(raw).unwrap();
        assert_eq!(session.trial_start_date, at("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn encode_writes_version_and_camel_case_fields() {
        let session = Session::start_trial("3001234567", at("2024-01-01T00:00:00Z"), &policy())
            .unwrap()
            .activate_premium(at("2024-01-02T00:00:00Z"), &policy())
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&SessionRecord::encode(&session).unwrap()).unwrap();

        assert_eq!(value["version"], 1);
        assert_eq!(value["status"], "premium");
        assert_eq!(value["premiumExpiryDate"], "2024-02-01T00:00:00Z");
    }

    #[test]
    fn decode_rejects_bad_records() {
        let truncated = r#"{"mobileNumber":"3001234567","status":"tri"#;
        assert!(matches!(
            SessionRecord::decode(truncated),
            Err(SessionError::Malformed(_))
        ));

        let premium_without_expiry = concat!(
            r#"{"mobileNumber":"3001234567","status":"premium","#,
            r#""trialStartDate":"2024-01-01T00:00:00Z"}"#
        );
        assert!(matches!(
            SessionRecord::decode(premium_without_expiry),
            Err(SessionError::Malformed(_))
        ));

        let future = concat!(
            r#"{"version":9,"mobileNumber":"3001234567","status":"trial","#,
            r#""trialStartDate":"2024-01-01T00:00:00Z"}"#
        );
        assert!(matches!(
            SessionRecord::decode(future),
            Err(SessionError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn oversized_premium_window_is_an_error() {
        let now = at("2024-01-01T00:00:00Z");
        let session = Session::start_trial("3001234567", now, &policy()).unwrap();

        for premium_days in [100_000_000, 200_000_000_000_000, i64::MAX] {
            let policy = SubscriptionConfig {
                premium_days,
                ..policy()
            };
            assert!(matches!(
                session.activate_premium(now, &policy),
                Err(SessionError::ExpiryOutOfRange { .. })
            ));
        }
    }
}
