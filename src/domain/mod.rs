mod price;
mod subscription;
mod subscription_name;
mod user_email;

pub use price::Price;
pub use subscription::Subscription;
pub use subscription_name::SubscriptionName;
pub use user_email::UserEmail;
