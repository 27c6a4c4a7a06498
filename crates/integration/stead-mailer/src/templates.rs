//! Inline HTML bodies.

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn newsletter_html(subject: &str, content: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #2563eb; text-align: center;">{}</h2>
  <div style="color: #334155; font-size: 16px; line-height: 1.6;">{}</div>
  <p style="color: #2563eb; font-weight: bold; text-align: center;">The Stead Team</p>
</div>"#,
        escape(subject),
        content
    )
}

pub fn waitlist_admin_html(name: &str, email: &str, user_type: &str) -> String {
    format!(
        r#"<h2>New Waitlist Registration</h2>
<p><strong>Name:</strong> {}</p>
<p><strong>Email:</strong> {}</p>
<p><strong>User Type:</strong> {}</p>"#,
        escape(name),
        escape(email),
        escape(user_type)
    )
}

pub fn waitlist_welcome_html(name: &str, user_type: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #2563eb;">Welcome to Stead!</h2>
  <p>Dear {},</p>
  <p>Thank you for joining our waitlist. You've joined as a <strong>{}</strong>.
  We'll keep you updated about our launch and you'll get early access to the platform.</p>
  <p style="color: #2563eb; font-weight: bold;">The Stead Team</p>
</div>"#,
        escape(name),
        escape(user_type)
    )
}

pub fn subscription_html() -> String {
    r#"<h2>Thank you for subscribing!</h2>
<p>You've been successfully added to our newsletter list.</p>"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waitlist_bodies_carry_registrant_details() {
        let html = waitlist_admin_html("Ada", "ada@example.com", "landlord");
        assert!(html.contains("Ada"));
        assert!(html.contains("ada@example.com"));
        assert!(html.contains("landlord"));
    }

    #[test]
    fn test_names_are_escaped() {
        let html = waitlist_welcome_html("<script>", "renter");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_newsletter_subject_is_rendered() {
        let html = newsletter_html("March update", "<p>Hello</p>");
        assert!(html.contains("March update"));
        assert!(html.contains("<p>Hello</p>"));
    }
}
