//! Browser-side delivery: user-agent capability, data-URI downloads and
//! object-URL scripts.

use std::io;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;

use script_planner::DeliveryRuntime;

use crate::html::{embed_json, escape_html};

pub const PDF_MIME: &str = "application/pdf";
pub const PNG_MIME: &str = "image/png";

/// `data:<mime>;base64,<payload>`.
pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

pub fn pdf_data_uri(bytes: &[u8]) -> String {
    data_uri(PDF_MIME, bytes)
}

/// `(mime, payload)` of a base64 data URI.
fn split_base64_data_uri(href: &str) -> Option<(&str, &str)> {
    let (header, payload) = href.strip_prefix("data:")?.split_once(',')?;
    Some((header.strip_suffix(";base64")?, payload))
}

/// JSON string literal safe inside a `<script>` element.
fn js_string(value: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(value).map(|json| embed_json(&json))
}

/// Whether a browser can save a generated file by name.
///
/// Safari (a `safari` token without `chrome`) and iOS devices cannot.
pub fn supports_direct_save(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    let safari = ua.contains("safari") && !ua.contains("chrome");
    let ios = ["iphone", "ipad", "ipod"]
        .iter()
        .any(|device| ua.contains(device));
    !(safari || ios)
}

/// Action the page performs to hand the PDF to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrowserAction {
    /// Anchor with a `download` attribute pointing at the bytes.
    Save { file_name: String, href: String },
    /// Object URL clicked through an anchor, revoked after the delay.
    ObjectUrl {
        file_name: String,
        href: String,
        revoke_after_ms: u64,
    },
}

impl BrowserAction {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Save { file_name, .. } | Self::ObjectUrl { file_name, .. } => file_name,
        }
    }

    /// Markup that hands the PDF to the user.
    ///
    /// `Save` is a download anchor. `ObjectUrl` is a script that rebuilds the
    /// bytes as a `Blob`, clicks a generated anchor on its object URL and
    /// revokes the URL after `revoke_after_ms`.
    pub fn to_html(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Save { file_name, href } => Ok(anchor_html(file_name, href)),
            Self::ObjectUrl {
                file_name,
                href,
                revoke_after_ms,
            } => object_url_script(file_name, href, *revoke_after_ms),
        }
    }
}

fn anchor_html(file_name: &str, href: &str) -> String {
    format!(
        r#"<a href="{}" download="{}">{}</a>"#,
        escape_html(href),
        escape_html(file_name),
        escape_html(file_name)
    )
}

fn object_url_script(
    file_name: &str,
    href: &str,
    revoke_after_ms: u64,
) -> Result<String, serde_json::Error> {
    // Anything but a data URI is already a URL the browser can open.
    let Some((mime, payload)) = split_base64_data_uri(href) else {
        return Ok(anchor_html(file_name, href));
    };
    Ok(format!(
        r#"<script class="object-url-download">
(function () {{
  var binary = atob({payload});
  var bytes = new Uint8Array(binary.length);
  for (var i = 0; i < binary.length; i++) {{
    bytes[i] = binary.charCodeAt(i);
  }}
  var url = URL.createObjectURL(new Blob([bytes], {{ type: {mime} }}));
  var link = document.createElement("a");
  link.href = url;
  link.download = {file_name};
  document.body.appendChild(link);
  link.click();
  link.remove();
  setTimeout(function () {{
    URL.revokeObjectURL(url);
  }}, {revoke_after_ms});
}})();
</script>"#,
        payload = js_string(payload)?,
        mime = js_string(mime)?,
        file_name = js_string(file_name)?,
        revoke_after_ms = revoke_after_ms,
    ))
}

/// Delivery runtime for a browser identified by its user agent.
///
/// Delivered PDFs are recorded as [`BrowserAction`]s for the page to run.
#[derive(Clone, Debug, Default)]
pub struct BrowserRuntime {
    user_agent: String,
    actions: Vec<BrowserAction>,
}

impl BrowserRuntime {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            actions: Vec::new(),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn actions(&self) -> &[BrowserAction] {
        &self.actions
    }

    pub fn take_actions(&mut self) -> Vec<BrowserAction> {
        std::mem::take(&mut self.actions)
    }
}

impl DeliveryRuntime for BrowserRuntime {
    fn supports_direct_save(&self) -> bool {
        supports_direct_save(&self.user_agent)
    }

    fn save_file(&mut self, file_name: &str, pdf: &[u8]) -> io::Result<()> {
        self.actions.push(BrowserAction::Save {
            file_name: file_name.to_string(),
            href: pdf_data_uri(pdf),
        });
        Ok(())
    }

    fn open_object_url(
        &mut self,
        file_name: &str,
        pdf: &[u8],
        revoke_after: Duration,
    ) -> io::Result<()> {
        let revoke_after_ms = u64::try_from(revoke_after.as_millis()).unwrap_or(u64::MAX);
        log::debug!(
            "object url for {} revoked after {} ms",
            file_name,
            revoke_after_ms
        );
        self.actions.push(BrowserAction::ObjectUrl {
            file_name: file_name.to_string(),
            href: pdf_data_uri(pdf),
            revoke_after_ms,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
        (KHTML, like Gecko) Version/17.5 Safari/605.1.15";
    const CHROME_IOS: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/126.0 Mobile/15E148 Safari/604.1";
    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0";

    #[test]
    fn safari_and_ios_use_object_urls() {
        assert!(supports_direct_save(CHROME_MAC));
        assert!(supports_direct_save(FIREFOX));
        assert!(!supports_direct_save(SAFARI_MAC));
        assert!(!supports_direct_save(CHROME_IOS));
        assert!(!supports_direct_save("Mozilla/5.0 (iPad; CPU OS 17_5 like Mac OS X)"));
    }

    #[test]
    fn data_uri_is_base64() {
        assert_eq!(pdf_data_uri(b"%PDF"), "data:application/pdf;base64,JVBERg==");
        assert_eq!(data_uri(PNG_MIME, b""), "data:image/png;base64,");
    }

    #[test]
    fn runtime_records_the_chosen_action() {
        let mut runtime = BrowserRuntime::new(SAFARI_MAC);
        let method = script_planner::export::deliver(
            &mut runtime,
            "2_소방관_1차시.pdf",
            b"%PDF",
            Duration::from_millis(100),
        )
        .expect("deliver");
        assert_eq!(method, script_planner::DeliveryMethod::ObjectUrl);
        assert_eq!(
            runtime.actions(),
            &[BrowserAction::ObjectUrl {
                file_name: "2_소방관_1차시.pdf".to_string(),
                href: "data:application/pdf;base64,JVBERg==".to_string(),
                revoke_after_ms: 100,
            }]
        );
    }

    #[test]
    fn save_is_a_plain_download_anchor() {
        let action = BrowserAction::Save {
            file_name: "a\"b.pdf".to_string(),
            href: "data:application/pdf;base64,".to_string(),
        };
        let html = action.to_html().expect("html");
        assert!(html.contains(r#"download="a&quot;b.pdf""#));
        assert!(!html.contains("<script"));
        assert_eq!(action.file_name(), "a\"b.pdf");
    }

    #[test]
    fn object_url_builds_a_blob_and_revokes_it_after_the_delay() {
        let action = BrowserAction::ObjectUrl {
            file_name: "2_소방관_1차시.pdf".to_string(),
            href: pdf_data_uri(b"%PDF"),
            revoke_after_ms: 250,
        };
        let html = action.to_html().expect("html");
        assert!(html.starts_with(r#"<script class="object-url-download">"#));
        assert!(html.contains(r#"atob("JVBERg==")"#));
        assert!(html.contains(r#"new Blob([bytes], { type: "application/pdf" })"#));
        assert!(html.contains("URL.createObjectURL("));
        assert!(html.contains(r#"link.download = "2_소방관_1차시.pdf";"#));
        assert!(html.contains("link.click();"));
        assert!(html.contains("URL.revokeObjectURL(url);\n  }, 250);"));
        assert!(!html.contains("href=\"data:"));
    }

    #[test]
    fn object_url_script_cannot_be_closed_by_the_file_name() {
        let action = BrowserAction::ObjectUrl {
            file_name: "x</script><b>.pdf".to_string(),
            href: pdf_data_uri(b""),
            revoke_after_ms: 100,
        };
        let html = action.to_html().expect("html");
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r#""x<\/script><b>.pdf""#));
    }

    #[test]
    fn object_url_with_a_plain_url_falls_back_to_an_anchor() {
        let action = BrowserAction::ObjectUrl {
            file_name: "a.pdf".to_string(),
            href: "https://example.com/a.pdf".to_string(),
            revoke_after_ms: 100,
        };
        assert_eq!(
            action.to_html().expect("html"),
            r#"<a href="https://example.com/a.pdf" download="a.pdf">a.pdf</a>"#
        );
        assert_eq!(
            split_base64_data_uri("data:image/png;base64,AAAA"),
            Some(("image/png", "AAAA"))
        );
        assert_eq!(split_base64_data_uri("data:text/plain,hi"), None);
    }
}
