//! Session observation and the access gate.
//!
//! The identity provider owns a [`SessionSource`] and publishes into it.
//! Everything else holds a [`SessionObserver`]: subscribing acquires one,
//! dropping it releases the subscription. The engine never publishes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    display_name: Option<String>,
    email: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self { Self { token: token.into(), display_name: None, email: None } }
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self { self.display_name = Some(name.into()); self }
    pub fn with_email(mut self, email: impl Into<String>) -> Self { self.email = Some(email.into()); self }

    pub fn token(&self) -> &str { &self.token }
    pub fn display_name(&self) -> Option<&str> { self.display_name.as_deref() }
    pub fn email(&self) -> Option<&str> { self.email.as_deref() }

    /// Display name, else the mailbox part of the email, else the token.
    pub fn greeting_name(&self) -> &str {
        let non_empty = |s: &&str| !s.trim().is_empty();
        self.display_name()
            .filter(non_empty)
            .or_else(|| self.email().and_then(|e| e.split('@').next()).filter(non_empty))
            .unwrap_or(self.token.as_str())
    }

    /// Avatar letter.
    pub fn initial(&self) -> Option<char> {
        self.greeting_name().chars().next().map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}

/// Publisher side, held by the identity collaborator.
#[derive(Debug)]
pub struct SessionSource {
    tx: watch::Sender<Option<Session>>,
}

impl SessionSource {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn publish(&self, session: Option<Session>) { self.tx.send_replace(session); }
    pub fn sign_in(&self, session: Session) { self.publish(Some(session)); }
    pub fn sign_out(&self) { self.publish(None); }

    pub fn subscribe(&self) -> SessionObserver { SessionObserver { rx: self.tx.subscribe() } }

    /// Live subscriptions.
    pub fn observer_count(&self) -> usize { self.tx.receiver_count() }
}

impl Default for SessionSource {
    fn default() -> Self { Self::new() }
}

#[derive(Clone, Debug)]
pub struct SessionObserver {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionObserver {
    /// Observer pinned to one value with no publisher behind it.
    pub fn fixed(session: Option<Session>) -> Self {
        let (_tx, rx) = watch::channel(session);
        Self { rx }
    }

    pub fn current(&self) -> Option<Session> { self.rx.borrow().clone() }
    pub fn is_signed_in(&self) -> bool { self.rx.borrow().is_some() }

    /// Waits for the next publish. `None` once the source is gone.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// True iff somebody is signed in.
pub fn can_mutate(session: Option<&Session>) -> bool { session.is_some() }

/// Decides whether user-facing additive actions may reach the stores.
#[derive(Clone, Debug)]
pub struct AccessGate {
    observer: SessionObserver,
}

impl AccessGate {
    pub fn new(observer: SessionObserver) -> Self { Self { observer } }

    pub fn allows_mutation(&self) -> bool { can_mutate(self.observer.rx.borrow().as_ref()) }
    pub fn session(&self) -> Option<Session> { self.observer.current() }
    pub fn observer(&self) -> &SessionObserver { &self.observer }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_mutate_requires_session() {
        assert!(!can_mutate(None));
        assert!(can_mutate(Some(&Session::new("tok"))));
    }

    #[test]
    fn test_gate_follows_publisher() {
        let source = SessionSource::new();
        let gate = AccessGate::new(source.subscribe());
        assert!(!gate.allows_mutation());
        source.sign_in(Session::new("tok-1"));
        assert!(gate.allows_mutation());
        source.sign_out();
        assert!(!gate.allows_mutation());
    }

    #[test]
    fn test_dropping_observer_releases_subscription() {
        let source = SessionSource::new();
        let first = source.subscribe();
        {
            let _second = source.subscribe();
            assert_eq!(source.observer_count(), 2);
        }
        assert_eq!(source.observer_count(), 1);
        drop(first);
        assert_eq!(source.observer_count(), 0);
    }

    #[tokio::test]
    async fn test_changed_sees_next_publish() {
        let source = SessionSource::new();
        let mut observer = source.subscribe();
        source.sign_in(Session::new("tok").with_email("amal@example.com"));
        let seen = observer.changed().await.flatten();
        assert_eq!(seen.as_ref().map(Session::token), Some("tok"));
        drop(source);
        assert!(observer.changed().await.is_none());
    }

    #[test]
    fn test_greeting_name_fallbacks() {
        let named = Session::new("t").with_display_name("Noor").with_email("n@example.com");
        assert_eq!(named.greeting_name(), "Noor");
        let mailbox = Session::new("t").with_email("sam.k@example.com");
        assert_eq!(mailbox.greeting_name(), "sam.k");
        assert_eq!(mailbox.initial(), Some('S'));
        let blank = Session::new("tok").with_display_name("  ");
        assert_eq!(blank.greeting_name(), "tok");
    }

    #[test]
    fn test_fixed_observer() {
        assert!(SessionObserver::fixed(Some(Session::new("t"))).is_signed_in());
        assert!(!SessionObserver::fixed(None).is_signed_in());
    }
}
