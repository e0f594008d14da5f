use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::session::{Session, SessionStatus};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    Dashboard,
    Billing,
    Inventory,
    Customers,
    Subscription,
    Reports,
}

/// What the UI shell should actually render.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Screen {
    Login,
    Dashboard,
    Billing,
    Inventory,
    Customers,
    Subscription,
    SubscriptionOffer,
}

impl From<View> for Screen {
    fn from(view: View) -> Self {
        match view {
            View::Dashboard => Screen::Dashboard,
            View::Billing => Screen::Billing,
            View::Inventory => Screen::Inventory,
            View::Customers => Screen::Customers,
            View::Subscription => Screen::Subscription,
            // no reports screen yet
            View::Reports => Screen::Dashboard,
        }
    }
}

pub fn select_screen(session: Option<&Session>, requested: View) -> Screen {
    match session {
        None => Screen::Login,
        Some(session)
            if session.status == SessionStatus::TrialExpired
                && requested != View::Subscription =>
        {
            Screen::SubscriptionOffer
        }
        Some(_) => requested.into(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::config::SubscriptionConfig;

    fn session_with(status: SessionStatus) -> Session {
        let now = Utc::now();
        let policy = SubscriptionConfig::default();
        let session = Session::start_trial("3001234567", now, &policy).unwrap();
        match status {
            SessionStatus::Trial => session,
            SessionStatus::TrialExpired => Session { status, ..session },
            SessionStatus::Premium => session.activate_premium(now, &policy).unwrap(),
        }
    }

    #[test]
    fn no_session_always_shows_login() {
        for view in [View::Dashboard, View::Subscription, View::Reports] {
            assert_eq!(select_screen(None, view), Screen::Login);
        }
    }

    #[test]
    fn expired_trial_is_forced_to_subscription_offer() {
        let expired = session_with(SessionStatus::TrialExpired);

        let gated = [
            View::Dashboard,
            View::Billing,
            View::Inventory,
            View::Customers,
            View::Reports,
        ];
        for view in gated {
            assert_eq!(select_screen(Some(&expired), view), Screen::SubscriptionOffer);
        }
        assert_eq!(
            select_screen(Some(&expired), View::Subscription),
            Screen::Subscription
        );
    }

    #[test]
    fn active_sessions_get_requested_view() {
        for status in [SessionStatus::Trial, SessionStatus::Premium] {
            let session = session_with(status);
            assert_eq!(select_screen(Some(&session), View::Billing), Screen::Billing);
            assert_eq!(select_screen(Some(&session), View::Reports), Screen::Dashboard);
        }
    }

    #[test]
    fn views_use_upper_case_names() {
        let view: View = serde_json::from_str("\"CUSTOMERS\"").unwrap();
        assert_eq!(view, View::Customers);
        assert_eq!(
            serde_json::to_string(&Screen::SubscriptionOffer).unwrap(),
            "\"SUBSCRIPTION_OFFER\""
        );
    }
}
