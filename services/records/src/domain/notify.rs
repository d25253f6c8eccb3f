use std::future::Future;

use chrono::NaiveDate;

/// Failure to hand a message to the mail relay. Never converted into
/// `RecordsServiceError`: dispatch cannot fail a committed write.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// An HTML email ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

impl OutgoingEmail {
    pub fn enrollment_confirmation(
        to: &str,
        full_name: &str,
        course_title: &str,
        enrollment_date: NaiveDate,
    ) -> Self {
        Self {
            to: to.to_owned(),
            subject: "Course Enrollment Confirmation".to_owned(),
            html_body: format!(
                "<h4>Hello {},</h4>\
                 <p>You have been successfully enrolled in <b>{}</b>.</p>\
                 <p>Enrollment Date: {}</p>",
                escape_html(full_name),
                escape_html(course_title),
                enrollment_date.format("%Y-%m-%d"),
            ),
        }
    }

    pub fn teacher_welcome(to: &str, full_name: &str, department: &str) -> Self {
        Self {
            to: to.to_owned(),
            subject: format!("Welcome to the Faculty - {full_name}"),
            html_body: format!(
                "<h3>Hello {},</h3>\
                 <p>Your faculty account has been created successfully in the <b>{}</b> department.</p>\
                 <p><b>Login Email:</b> {}</p>",
                escape_html(full_name),
                escape_html(department),
                escape_html(to),
            ),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Outbound email port.
pub trait Notifier: Send + Sync {
    fn send(&self, email: OutgoingEmail)
    -> impl Future<Output = Result<(), DispatchError>> + Send;
}
