mod cron_secret;

pub use cron_secret::CronSecret;
