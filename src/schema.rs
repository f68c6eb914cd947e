table! {
    subscriptions (id) {
        id -> Int4,
        name -> Text,
        category -> Text,
        price -> Numeric,
        renewal_date -> Date,
        reminder_enabled -> Bool,
        user_email -> Text,
        timezone -> Nullable<Text>,
    }
}
