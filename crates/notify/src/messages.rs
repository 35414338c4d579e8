//! Bilingual (German / English) notification message bank.
//!
//! Every [`MessageKey`] has a German and an English HTML template. Templates
//! contain `{placeholder}` markers filled from [`MessageData`]; unknown or
//! missing placeholders render as empty strings. The subject line of every
//! email is the message key itself.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Matches `{placeholder}` markers in templates.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("placeholder pattern is valid"));

// ---------------------------------------------------------------------------
// Keys and languages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    NewTimeSlot,
    NewAssignment,
    NewVolunteer,
    TimeSlotApproved,
    TimeSlotRejected,
    AccountApproved,
    AccountRejected,
    NewAdmin,
    CancellationRequest,
    CancellationApproved,
    CancellationRejected,
}

impl MessageKey {
    pub const ALL: [MessageKey; 11] = [
        Self::NewTimeSlot,
        Self::NewAssignment,
        Self::NewVolunteer,
        Self::TimeSlotApproved,
        Self::TimeSlotRejected,
        Self::AccountApproved,
        Self::AccountRejected,
        Self::NewAdmin,
        Self::CancellationRequest,
        Self::CancellationApproved,
        Self::CancellationRejected,
    ];

    /// The key's display name, used verbatim as the email subject.
    pub fn subject(self) -> &'static str {
        match self {
            Self::NewTimeSlot => "New TimeSlot",
            Self::NewAssignment => "New Assignment",
            Self::NewVolunteer => "New Volunteer",
            Self::TimeSlotApproved => "TimeSlot Approved",
            Self::TimeSlotRejected => "TimeSlot Rejected",
            Self::AccountApproved => "Account Approved",
            Self::AccountRejected => "Account Rejected",
            Self::NewAdmin => "New Admin",
            Self::CancellationRequest => "Cancellation Request",
            Self::CancellationApproved => "Cancellation Approved",
            Self::CancellationRejected => "Cancellation Rejected",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subject())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    De,
    En,
}

// ---------------------------------------------------------------------------
// Placeholder data
// ---------------------------------------------------------------------------

/// Values substituted into a template.
#[derive(Debug, Clone, Default)]
pub struct MessageData {
    pub name: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub reason: Option<String>,
}

impl MessageData {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    fn lookup(&self, placeholder: &str) -> Option<&str> {
        match placeholder {
            "name" => self.name.as_deref(),
            "date" => self.date.as_deref(),
            "time" => self.time.as_deref(),
            "reason" => self.reason.as_deref(),
            _ => None,
        }
    }
}

/// Escape text for inclusion in an HTML body.
fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Replace every `{placeholder}` in `template`. `{organization}` comes from
/// the caller; everything else from `data`. Missing values become `""`.
pub fn format_message(template: &str, organization: &str, data: &MessageData) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            let value = if key == "organization" {
                Some(organization)
            } else {
                data.lookup(key)
            };
            value.map(escape_html).unwrap_or_default()
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

const GREETING_VOLUNTEER_EN: &str = "Dear volunteer,<br><br>";
const GREETING_ADMIN_EN: &str = "Dear admins,<br><br>";
const SIGN_OFF_EN: &str = "Kind regards,<br>{organization}";

const GREETING_VOLUNTEER_DE: &str = "Liebe Freiwillige, lieber Freiwilliger,<br><br>";
const GREETING_ADMIN_DE: &str = "Liebes Admin-Team,<br><br>";
const SIGN_OFF_DE: &str = "Viele Grüße,<br>{organization}";

fn english_body(key: MessageKey) -> &'static str {
    match key {
        MessageKey::NewTimeSlot => {
            "<strong>{name}</strong> has applied for a new shift.<br>\
             Please review the application in the admin area.<br><br>Thank you!"
        }
        MessageKey::NewAssignment => {
            "You have been scheduled for a new shift.<br><br>\
             <strong>Date:</strong> {date}<br><br>\
             If this does not work for you, please get in touch with an administrator."
        }
        MessageKey::NewVolunteer => {
            "A new volunteer has registered.<br><br>\
             Name: <strong>{name}</strong><br><br>\
             Please review the registration and welcome them on board."
        }
        MessageKey::TimeSlotApproved => {
            "Good news: your shift application has been approved.<br>\
             Thank you for volunteering with us!"
        }
        MessageKey::TimeSlotRejected => {
            "Unfortunately your shift application could not be accepted.<br>\
             Reason: <strong>{reason}</strong><br><br>\
             You are very welcome to apply for a different shift.<br>\
             If you have any questions, just let us know."
        }
        MessageKey::AccountApproved => {
            "Your volunteer account has been approved.<br>\
             You can now sign in and apply for shifts.<br><br>\
             Thank you for joining us!"
        }
        MessageKey::AccountRejected => {
            "Unfortunately your volunteer registration could not be approved.<br>\
             If you think this is a mistake or have any questions, please contact us.<br><br>\
             Thank you for your interest in volunteering with us."
        }
        MessageKey::NewAdmin => {
            "Hello {name},<br><br>\
             you have been added as an administrator of the {organization} volunteer scheduling app.<br>\
             From now on you can review volunteers, applications and cancellations.<br><br>\
             Welcome to the team!"
        }
        MessageKey::CancellationRequest => {
            "A volunteer would like to cancel a scheduled shift.<br><br>\
             <strong>Volunteer:</strong> {name}<br>\
             <strong>Date:</strong> {date}<br>\
             <strong>Time:</strong> {time}<br><br>\
             <strong>Reason:</strong><br>{reason}<br><br>\
             Please approve or reject the request in the admin area."
        }
        MessageKey::CancellationApproved => {
            "Your cancellation request has been approved.<br><br>\
             <strong>Date:</strong> {date}<br>\
             <strong>Time:</strong> {time}<br><br>\
             You are no longer scheduled for this shift. Feel free to apply for another one."
        }
        MessageKey::CancellationRejected => {
            "Your cancellation request could not be approved.<br><br>\
             <strong>Date:</strong> {date}<br>\
             <strong>Time:</strong> {time}<br><br>\
             You are still scheduled for this shift. Please contact an administrator if you have questions."
        }
    }
}

fn german_body(key: MessageKey) -> &'static str {
    match key {
        MessageKey::NewTimeSlot => {
            "<strong>{name}</strong> hat sich für eine neue Schicht beworben.<br>\
             Bitte prüft die Bewerbung im Admin-Bereich.<br><br>Vielen Dank!"
        }
        MessageKey::NewAssignment => {
            "Sie wurden für eine neue Schicht eingeteilt.<br><br>\
             <strong>Datum:</strong> {date}<br><br>\
             Falls der Termin nicht passt, melden Sie sich bitte bei einer Administratorin oder einem Administrator."
        }
        MessageKey::NewVolunteer => {
            "Eine neue freiwillige Person hat sich registriert.<br><br>\
             Name: <strong>{name}</strong><br><br>\
             Bitte prüft die Registrierung und heißt sie willkommen."
        }
        MessageKey::TimeSlotApproved => {
            "Gute Nachricht: Ihre Schichtbewerbung wurde angenommen.<br>\
             Vielen Dank für Ihr Engagement!"
        }
        MessageKey::TimeSlotRejected => {
            "Leider konnte Ihre Schichtbewerbung nicht angenommen werden.<br>\
             Grund: <strong>{reason}</strong><br><br>\
             Sie können sich gern für eine andere Schicht bewerben.<br>\
             Bei Fragen melden Sie sich einfach bei uns."
        }
        MessageKey::AccountApproved => {
            "Ihr Konto wurde freigeschaltet.<br>\
             Sie können sich jetzt anmelden und für Schichten bewerben.<br><br>\
             Schön, dass Sie dabei sind!"
        }
        MessageKey::AccountRejected => {
            "Leider konnte Ihre Registrierung nicht freigeschaltet werden.<br>\
             Wenn Sie das für einen Irrtum halten oder Fragen haben, kontaktieren Sie uns bitte.<br><br>\
             Vielen Dank für Ihr Interesse."
        }
        MessageKey::NewAdmin => {
            "Hallo {name},<br><br>\
             Sie wurden als Administrator:in der Schichtplanung von {organization} hinzugefügt.<br>\
             Ab sofort können Sie Freiwillige, Bewerbungen und Stornierungen bearbeiten.<br><br>\
             Willkommen im Team!"
        }
        MessageKey::CancellationRequest => {
            "Eine freiwillige Person möchte eine geplante Schicht absagen.<br><br>\
             <strong>Freiwillige/r:</strong> {name}<br>\
             <strong>Datum:</strong> {date}<br>\
             <strong>Zeit:</strong> {time}<br><br>\
             <strong>Grund:</strong><br>{reason}<br><br>\
             Bitte genehmigt oder lehnt die Anfrage im Admin-Bereich ab."
        }
        MessageKey::CancellationApproved => {
            "Ihre Absage wurde genehmigt.<br><br>\
             <strong>Datum:</strong> {date}<br>\
             <strong>Zeit:</strong> {time}<br><br>\
             Sie sind für diese Schicht nicht mehr eingeteilt. Sie können sich gern für eine andere Schicht bewerben."
        }
        MessageKey::CancellationRejected => {
            "Ihre Absage konnte leider nicht genehmigt werden.<br><br>\
             <strong>Datum:</strong> {date}<br>\
             <strong>Zeit:</strong> {time}<br><br>\
             Sie sind weiterhin für diese Schicht eingeteilt. Bei Fragen wenden Sie sich bitte an das Admin-Team."
        }
    }
}

fn addressed_to_admins(key: MessageKey) -> bool {
    matches!(
        key,
        MessageKey::NewTimeSlot | MessageKey::NewVolunteer | MessageKey::CancellationRequest
    )
}

/// Full raw template (greeting, body, sign-off) for `key` in `language`.
pub fn template(key: MessageKey, language: Language) -> String {
    let admins = addressed_to_admins(key);
    let personal = key == MessageKey::NewAdmin;
    let (greeting, body, sign_off) = match language {
        Language::En => (
            if admins { GREETING_ADMIN_EN } else { GREETING_VOLUNTEER_EN },
            english_body(key),
            SIGN_OFF_EN,
        ),
        Language::De => (
            if admins { GREETING_ADMIN_DE } else { GREETING_VOLUNTEER_DE },
            german_body(key),
            SIGN_OFF_DE,
        ),
    };
    let greeting = if personal { "" } else { greeting };
    format!("{greeting}{body}<br><br>{sign_off}")
}

/// Render one language's message with placeholders filled.
pub fn render(
    key: MessageKey,
    language: Language,
    organization: &str,
    data: &MessageData,
) -> String {
    format_message(&template(key, language), organization, data)
}

/// The full HTML email body: German block, divider, "English" heading,
/// English block.
pub fn render_bilingual_html(key: MessageKey, organization: &str, data: &MessageData) -> String {
    let german = render(key, Language::De, organization, data);
    let english = render(key, Language::En, organization, data);
    format!(
        "<html>\n<body style=\"font-family: Arial, sans-serif;\">\n\
         <p>{german}</p>\n\
         <hr style=\"margin: 24px 0; border: none; border-top: 1px solid #e5e7eb;\" />\n\
         <p style=\"font-weight: 600;\">English</p>\n\
         <p>{english}</p>\n\
         </body>\n</html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subjects_are_the_key_names() {
        assert_eq!(MessageKey::NewTimeSlot.subject(), "New TimeSlot");
        assert_eq!(MessageKey::CancellationRejected.to_string(), "Cancellation Rejected");
        let mut subjects: Vec<_> = MessageKey::ALL.iter().map(|k| k.subject()).collect();
        subjects.sort();
        subjects.dedup();
        assert_eq!(subjects.len(), 11);
    }

    #[test]
    fn placeholders_are_filled_and_missing_ones_blank() {
        let data = MessageData::default().with_name("Grete Hansen");
        let out = format_message("Hi {name}, on {date} at {unknown}", "Museum", &data);
        assert_eq!(out, "Hi Grete Hansen, on  at ");
    }

    #[test]
    fn organization_placeholder_uses_configured_name() {
        let out = format_message("Regards, {organization}", "Overbeck Museum", &MessageData::default());
        assert_eq!(out, "Regards, Overbeck Museum");
    }

    #[test]
    fn values_are_html_escaped() {
        let data = MessageData::default().with_reason("<script>alert('x')</script> & more");
        let out = format_message("{reason}", "Museum", &data);
        assert_eq!(
            out,
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"
        );
    }

    #[test]
    fn every_key_has_both_languages() {
        for key in MessageKey::ALL {
            let en = render(key, Language::En, "Museum", &MessageData::default());
            let de = render(key, Language::De, "Museum", &MessageData::default());
            assert!(!en.is_empty() && !de.is_empty(), "{key} is missing a template");
            assert!(!en.contains('{'), "{key} left a placeholder unfilled");
            assert!(en.ends_with("Museum"));
        }
    }

    #[test]
    fn bilingual_body_puts_german_first() {
        let data = MessageData::default()
            .with_name("Grete Hansen")
            .with_date("Saturday, March 8, 2025")
            .with_time("11:00 - 14:00")
            .with_reason("Illness");
        let html = render_bilingual_html(MessageKey::CancellationRequest, "Overbeck Museum", &data);

        let german_at = html.find("Liebes Admin-Team").unwrap();
        let divider_at = html.find("<hr").unwrap();
        let english_heading_at = html.find(">English<").unwrap();
        let english_at = html.find("Dear admins").unwrap();
        assert!(german_at < divider_at);
        assert!(divider_at < english_heading_at);
        assert!(english_heading_at < english_at);
        assert_eq!(html.matches("Grete Hansen").count(), 2);
        assert!(html.contains("Saturday, March 8, 2025"));
        assert!(html.contains("Illness"));
    }

    #[test]
    fn new_admin_message_is_addressed_by_name() {
        let data = MessageData::default().with_name("Fritz Overbeck");
        let en = render(MessageKey::NewAdmin, Language::En, "Overbeck Museum", &data);
        assert!(en.starts_with("Hello Fritz Overbeck"));
        assert!(en.contains("administrator of the Overbeck Museum"));
    }
}
