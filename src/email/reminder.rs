//! Rendering for the consolidated renewal reminder sent once per
//! recipient per cycle.

use crate::engine::ReminderBatch;
use std::fmt::Write;

pub fn subject(batch: &ReminderBatch) -> String {
    match batch.subscriptions.as_slice() {
        [only] => format!("Reminder: {} renews tomorrow", only.name.as_ref()),
        many => format!("Reminder: {} subscriptions renew tomorrow", many.len()),
    }
}

pub fn html_body(batch: &ReminderBatch, dashboard_url: &str) -> String {
    let mut body = String::from(
        "<div style=\"font-family: system-ui, -apple-system, sans-serif; \
         max-width: 600px; margin: 0 auto; padding: 20px; color: #333;\">\n\
         <h1 style=\"color: #1a1a1a;\">Subscription Renewal Reminder</h1>\n",
    );
    let intro = match batch.subscriptions.len() {
        1 => "Your subscription will renew tomorrow.".to_owned(),
        n => format!("{} of your subscriptions will renew tomorrow.", n),
    };
    let _ = writeln!(body, "<p style=\"color: #666;\">{}</p>", intro);

    for subscription in &batch.subscriptions {
        let _ = writeln!(
            body,
            "<div style=\"background-color: #f9fafb; border-radius: 8px; \
             padding: 24px; margin-bottom: 16px;\">\n\
             <h2 style=\"font-size: 20px; margin-bottom: 16px;\">{name}</h2>\n\
             <p style=\"margin: 4px 0;\">Category: {category}</p>\n\
             <p style=\"margin: 4px 0;\">Amount: ${amount:.2}</p>\n\
             <p style=\"margin: 4px 0;\">Renewal Date: {date}</p>\n\
             </div>",
            name = subscription.name.as_ref(),
            category = subscription.category,
            amount = subscription.price.amount(),
            date = subscription.renewal_date.format("%B %-d, %Y"),
        );
    }

    if batch.subscriptions.len() > 1 {
        let _ = writeln!(
            body,
            "<p style=\"font-weight: 500;\">Total renewing tomorrow: ${:.2}</p>",
            batch.total
        );
    }
    let _ = writeln!(
        body,
        "<p style=\"color: #666; font-size: 14px;\">To manage your subscriptions, \
         visit <a href=\"{url}/dashboard\">your dashboard</a>.</p>\n</div>",
        url = dashboard_url
    );
    body
}

pub fn text_body(batch: &ReminderBatch, dashboard_url: &str) -> String {
    let mut body = String::from("Subscription Renewal Reminder\n\n");
    match batch.subscriptions.len() {
        1 => body.push_str("Your subscription renews tomorrow:\n"),
        _ => body.push_str("The following subscriptions renew tomorrow:\n"),
    }
    for subscription in &batch.subscriptions {
        let _ = writeln!(
            body,
            "- {} ({}): ${:.2} on {}",
            subscription.name.as_ref(),
            subscription.category,
            subscription.price.amount(),
            subscription.renewal_date.format("%B %-d, %Y"),
        );
    }
    if batch.subscriptions.len() > 1 {
        let _ = writeln!(body, "Total: ${:.2}", batch.total);
    }
    let _ = write!(
        body,
        "\nManage your subscriptions at {}/dashboard.",
        dashboard_url
    );
    body
}
