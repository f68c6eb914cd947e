use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use secrecy::Secret;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use subtracker::configuration::get_configuration;
use subtracker::domain::{Price, Subscription, SubscriptionName, UserEmail};
use subtracker::email::Email;
use subtracker::engine::FixedClock;
use subtracker::startup::Application;
use subtracker::storage::{StorageError, SubscriptionStore};
use subtracker::telemetry::{get_subscriber, init_subscriber};

pub const CRON_SECRET: &str = "test-cron-secret";

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub email_client: Arc<FakeEmailClient>,
}

impl TestApp {
    pub async fn check_renewals(&self, secret: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(&format!(
                "{}/check-renewals?cronSecret={}",
                self.address, secret
            ))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Spawns the application with a fixed clock, an in-memory store seeded
/// with `subscriptions` and a capturing email client.
pub async fn spawn_app(now: DateTime<Utc>, subscriptions: Vec<Subscription>) -> TestApp {
    Lazy::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c.scheduler.cron_secret = Secret::new(CRON_SECRET.to_string());
        c
    };

    let store = Arc::new(InMemoryStore::new(subscriptions));
    let email_client = Arc::new(FakeEmailClient::default());
    let clock = Arc::new(FixedClock::new(now));

    let app = Application::build(&configuration, store.clone(), email_client.clone(), clock)
        .await
        .unwrap();
    let _ = tokio::spawn(app.server.launch());
    TestApp {
        address: format!("http://127.0.0.1:{}", app.port.get().await),
        store,
        email_client,
    }
}

pub fn subscription(
    id: i32,
    name: &str,
    price_cents: i64,
    renewal_date: &str,
    timezone: &str,
    user_email: &str,
) -> Subscription {
    Subscription {
        id,
        name: SubscriptionName::parse(name.into()).unwrap(),
        category: "Streaming".into(),
        price: Price::parse(Decimal::new(price_cents, 2)).unwrap(),
        renewal_date: renewal_date.parse().unwrap(),
        reminder_enabled: true,
        timezone: timezone.parse().unwrap(),
        user_email: UserEmail::parse(user_email.into()).unwrap(),
    }
}

pub fn instant(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

/// Stand-in for the Postgres store: the same trait surface over a Vec.
pub struct InMemoryStore {
    subscriptions: Mutex<Vec<Subscription>>,
    list_calls: AtomicUsize,
    fail_reads: AtomicBool,
}

impl InMemoryStore {
    pub fn new(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: Mutex::new(subscriptions),
            list_calls: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn renewal_date_of(&self, id: i32) -> NaiveDate {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.renewal_date)
            .unwrap()
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn list_reminder_eligible(&self) -> Result<Vec<Subscription>, StorageError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("connection refused".into()));
        }
        let subscriptions = self.subscriptions.lock().unwrap();
        Ok(subscriptions
            .iter()
            .filter(|s| s.reminder_enabled)
            .cloned()
            .collect())
    }

    async fn update_renewal_date(&self, id: i32, new_date: NaiveDate) -> Result<(), StorageError> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions.iter_mut().find(|s| s.id == id) {
            Some(subscription) => {
                subscription.renewal_date = new_date;
                Ok(())
            }
            None => Err(StorageError::NotFound(id)),
        }
    }
}

pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Default)]
pub struct FakeEmailClient {
    pub sent_emails: Mutex<Vec<SentEmail>>,
    fail_sends: AtomicBool,
}

impl FakeEmailClient {
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Email for FakeEmailClient {
    async fn send_email(
        &self,
        recipient: UserEmail,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), anyhow::Error> {
        if self.fail_sends.load(Ordering::SeqCst) {
            anyhow::bail!("the email transport rejected the message");
        }
        self.sent_emails.lock().unwrap().push(SentEmail {
            recipient: recipient.as_ref().to_owned(),
            subject: subject.to_owned(),
            html: html_content.to_owned(),
            text: text_content.to_owned(),
        });
        Ok(())
    }
}
