mod subscription;

pub use subscription::{DataQualityError, SubscriptionRow};
