//! Shared email content
//!
//! Canonical content generators for notification emails, used by both
//! production (SES) and mock email services.

/// Fallback wording when a conversation is not tied to a named listing
const UNNAMED_LISTING: &str = "your listing";

/// Escape user-supplied text before embedding it in HTML
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Subject line for a conversation-started email.
pub fn conversation_started_subject(buyer_name: &str, item_name: Option<&str>) -> String {
    match item_name {
        Some(name) => format!("{} is interested in {}", buyer_name, name),
        None => format!("{} sent you a message", buyer_name),
    }
}

/// Generate plain-text body for a conversation-started email.
pub fn conversation_started_text(
    buyer_name: &str,
    item_name: Option<&str>,
    initial_message: &str,
    listing_url: &str,
) -> String {
    format!(
        "Hi there!\n\n\
        {} contacted you about {}:\n\n\
        \"{}\"\n\n\
        Open the listing to reply:\n\
        {}\n\n\
        Thanks,\n\
        The SwapShop Team",
        buyer_name,
        item_name.unwrap_or(UNNAMED_LISTING),
        initial_message,
        listing_url
    )
}

/// Generate styled HTML body for a conversation-started email.
pub fn conversation_started_html(
    buyer_name: &str,
    item_name: Option<&str>,
    initial_message: &str,
    listing_url: &str,
) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
                <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
                    <h2 style="color: #2a7d4f;">New message about {item_name}</h2>

                    <p>Hi there!</p>

                    <p><strong>{buyer_name}</strong> contacted you about <strong>{item_name}</strong>:</p>

                    <blockquote style="border-left: 4px solid #2a7d4f; margin: 20px 0; padding: 10px 16px; background-color: #f5f5f5;">
                        {initial_message}
                    </blockquote>

                    <div style="text-align: center; margin: 30px 0;">
                        <a href="{listing_url}"
                           style="background-color: #2a7d4f; color: white; padding: 12px 24px; text-decoration: none; border-radius: 4px; display: inline-block; font-weight: bold;">
                            Reply on SwapShop
                        </a>
                    </div>

                    <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;">

                    <p style="color: #666; font-size: 12px;">
                        Thanks, The SwapShop Team
                    </p>
                </div>
            </body>
            </html>
            "#,
        item_name = escape_html(item_name.unwrap_or(UNNAMED_LISTING)),
        buyer_name = escape_html(buyer_name),
        initial_message = escape_html(initial_message),
        listing_url = escape_html(listing_url)
    )
}
